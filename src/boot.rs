//! Start-up failure reporting
//!
//! Every bring-up step is fatal: a HUD with one transport or one panel
//! missing is not run. Steps tag their result with the [`BootError`] for
//! that step, and the firmware halts on the first one.

use core::fmt::Debug;

use log::error;

/// Bring-up step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootError {
    /// Shared SPI bus or a panel's chip select
    Bus,
    /// Panel reset, init or orientation
    Panel,
    /// First flush of the waiting view
    WaitingView,
    /// SPP bridge UART or module setup
    Spp,
    /// Radio driver or BLE connector
    Radio,
    /// GATT server or advertising data
    Ble,
}

impl BootError {
    /// Tag the result of this step, logging the underlying cause at
    /// `error` before it is dropped.
    pub fn check<T, E: Debug>(self, result: Result<T, E>) -> Result<T, BootError> {
        result.map_err(|cause| {
            error!("boot: {:?} step failed: {:?}", self, cause);
            self
        })
    }
}
