//! SPP port trait for abstraction and testability
//!
//! The HUD only needs three things from its Serial Port Profile link:
//! announce a device name, pull whatever bytes have arrived, and send a
//! reply. The UART bridge driver and the test mock both implement this.

use core::future::Future;

/// Errors raised by a transport link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// Link could not be brought up
    Setup,
    /// Receive error
    Read,
    /// Transmit error
    Write,
}

/// Abstract SPP link interface
pub trait SppPort {
    /// Bring the link up under the given device name
    fn begin(&mut self, device_name: &str) -> impl Future<Output = Result<(), LinkError>>;

    /// Read bytes that have already arrived
    ///
    /// Never waits for new data: returns `Ok(0)` when nothing is pending.
    fn read_available(&mut self, buf: &mut [u8]) -> impl Future<Output = Result<usize, LinkError>>;

    /// Write all bytes to the connected peer
    fn write_all(&mut self, data: &[u8]) -> impl Future<Output = Result<(), LinkError>>;
}
