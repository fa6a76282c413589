//! UART-attached SPP bridge
//!
//! The ESP32-S3 radio has no Bluetooth Classic, so the SPP link is an
//! HC-05 class module on a UART. Whatever the paired host sends arrives
//! as plain bytes; whatever we write goes back over RFCOMM.
//!
//! The module's KEY input selects command mode. It is driven high only
//! while `begin` renames the module, so telemetry never reaches the AT
//! parser and AT traffic never reaches the paired host.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_io::ReadReady;
use embedded_io_async::{Read, Write};
use log::{debug, warn};

use crate::config::spp::{AT_MODE_SETTLE_MS, AT_POLL_INTERVAL_MS, AT_REPLY_TIMEOUT_MS};
use crate::protocol::framing::LineFramer;
use crate::spp::traits::{LinkError, SppPort};

/// Reply an HC-05 sends for an accepted command
const AT_OK: &[u8] = b"OK";

/// SPP link over a UART bridge module
pub struct UartSppBridge<U, K, D> {
    uart: U,
    key: K,
    delay: D,
}

impl<U, K, D> UartSppBridge<U, K, D>
where
    U: Read + Write + ReadReady,
    K: OutputPin,
    D: DelayNs,
{
    /// `key` is the module's KEY line, `delay` paces the AT exchange.
    pub fn new(uart: U, key: K, delay: D) -> Self {
        Self { uart, key, delay }
    }

    pub fn into_parts(self) -> (U, K, D) {
        (self.uart, self.key, self.delay)
    }

    async fn send_name(&mut self, device_name: &str) -> Result<(), LinkError> {
        for part in [b"AT+NAME=".as_slice(), device_name.as_bytes(), b"\r\n".as_slice()] {
            self.uart.write_all(part).await.map_err(|e| {
                warn!("SPP: name command failed: {:?}", e);
                LinkError::Setup
            })?;
        }
        self.uart.flush().await.map_err(|_| LinkError::Setup)?;

        self.await_ok().await
    }

    /// Wait for the module's first reply line; only `OK` is success.
    async fn await_ok(&mut self) -> Result<(), LinkError> {
        let mut framer = LineFramer::new();
        let mut chunk = [0u8; 16];

        for _ in 0..AT_REPLY_TIMEOUT_MS / AT_POLL_INTERVAL_MS {
            if !self.uart.read_ready().map_err(|_| LinkError::Setup)? {
                self.delay.delay_ms(AT_POLL_INTERVAL_MS).await;
                continue;
            }

            let n = self.uart.read(&mut chunk).await.map_err(|_| LinkError::Setup)?;
            if let Some(reply) = framer.feed(&chunk[..n]).next() {
                if reply.as_slice() == AT_OK {
                    return Ok(());
                }
                warn!(
                    "SPP: module rejected name: {}",
                    core::str::from_utf8(&reply).unwrap_or("<binary>")
                );
                return Err(LinkError::Setup);
            }
        }

        warn!("SPP: no reply from module within {} ms", AT_REPLY_TIMEOUT_MS);
        Err(LinkError::Setup)
    }
}

impl<U, K, D> SppPort for UartSppBridge<U, K, D>
where
    U: Read + Write + ReadReady,
    K: OutputPin,
    D: DelayNs,
{
    /// Renames the module with `AT+NAME=<name>` in command mode.
    ///
    /// Fails with [`LinkError::Setup`] unless the module answers `OK`
    /// within `AT_REPLY_TIMEOUT_MS`. KEY is released on every path.
    async fn begin(&mut self, device_name: &str) -> Result<(), LinkError> {
        self.key.set_high().map_err(|_| LinkError::Setup)?;
        self.delay.delay_ms(AT_MODE_SETTLE_MS).await;

        let result = self.send_name(device_name).await;

        self.key.set_low().map_err(|_| LinkError::Setup)?;
        self.delay.delay_ms(AT_MODE_SETTLE_MS).await;

        if result.is_ok() {
            debug!("SPP: module renamed to '{}'", device_name);
        }
        result
    }

    async fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        if !self.uart.read_ready().map_err(|_| LinkError::Read)? {
            return Ok(0);
        }
        self.uart.read(buf).await.map_err(|_| LinkError::Read)
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<(), LinkError> {
        self.uart.write_all(data).await.map_err(|_| LinkError::Write)?;
        self.uart.flush().await.map_err(|_| LinkError::Write)
    }
}
