pub mod icmp;
pub mod transport;
