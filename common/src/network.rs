pub mod address;
pub mod numeral;
pub mod stats;
pub mod target;
