//! Wire-level helpers for the line telemetry protocol

pub mod framing;
pub mod lenient;

pub use framing::{Line, LineFramer};
pub use lenient::lenient_int;
