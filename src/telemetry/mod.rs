//! Shared telemetry model: decoded state and navigation text wrapping

pub mod state;
pub mod wrap;

pub use state::{TelemetrySnapshot, TelemetryState};
pub use wrap::{wrap, NavText};
