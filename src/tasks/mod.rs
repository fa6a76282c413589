//! Embassy tasks module
//!
//! Long-running async tasks for the firmware. The firmware binary wraps
//! each one in a concrete `#[embassy_executor::task]`.

pub mod ble;
pub mod hud;

pub use ble::ble_task;
pub use hud::hud_task;
