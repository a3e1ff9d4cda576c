//! Status logging shared by every crate.
//!
//! All output goes through `tracing`; the CLI formatter picks the marker
//! (`[+]`, `[!]`, `[-]`) from the level and the target.

/// Target used for lines that should be printed without any marker.
pub const PRINT_TARGET: &str = "pingiv::print";
/// Target used for successful outcomes.
pub const SUCCESS_TARGET: &str = "pingiv::success";

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: $crate::macros::SUCCESS_TARGET, $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!($($arg)*)
    };
}
