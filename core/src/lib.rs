pub mod network;
pub mod pinger;
