pub mod config;
pub mod macros;
pub mod network;

#[doc(hidden)]
pub use tracing as __tracing;
