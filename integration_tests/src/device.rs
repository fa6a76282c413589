//! SPP device client.
//!
//! The HUD's SPP link appears on the host as a serial port once paired
//! (`/dev/rfcomm0` on Linux, a COM port on Windows).

#![allow(dead_code)]

use std::io::{Read, Write};
use std::time::{Duration, Instant};

use anyhow::Result;
use serialport::SerialPort;

use crate::protocol;

/// Find a paired RFCOMM port.
pub fn find_spp_port() -> Result<String> {
    let ports = serialport::available_ports()?;
    match ports.into_iter().find(|p| p.port_name.contains("rfcomm")) {
        Some(port) => Ok(port.port_name),
        None => anyhow::bail!("No RFCOMM port found - pair the HUD and bind it first"),
    }
}

/// Resolve a port argument - returns the port path if not "auto", otherwise auto-detects.
pub fn resolve_port(port_arg: &str) -> Result<String> {
    if port_arg == "auto" {
        find_spp_port()
    } else {
        Ok(port_arg.to_string())
    }
}

/// Client for the HUD's SPP link.
pub struct SppClient {
    port: Box<dyn SerialPort>,
    timeout: Duration,
    /// Bytes received past the last returned line
    pending: Vec<u8>,
}

impl SppClient {
    pub fn new(port_name: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(Duration::from_millis(50))
            .open()?;

        Ok(Self {
            port,
            timeout: Duration::from_secs(2),
            pending: Vec::new(),
        })
    }

    /// Set the reply timeout.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Discard anything buffered on either side.
    pub fn clear_buffer(&mut self) -> Result<()> {
        self.port.clear(serialport::ClearBuffer::All)?;
        self.pending.clear();
        Ok(())
    }

    /// Send raw bytes as-is.
    pub fn send(&mut self, data: &[u8]) -> Result<()> {
        self.port.write_all(data)?;
        self.port.flush()?;
        Ok(())
    }

    /// Send PING and return the raw reply line including its terminator.
    pub fn ping(&mut self) -> Result<Vec<u8>> {
        self.send(&protocol::ping())?;
        self.read_reply(self.timeout)
    }

    /// Read bytes until a complete `\n`-terminated reply arrives.
    pub fn read_reply(&mut self, timeout: Duration) -> Result<Vec<u8>> {
        let start = Instant::now();
        let mut buf = [0u8; 64];

        loop {
            if let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
                let reply: Vec<u8> = self.pending.drain(..=pos).collect();
                return Ok(reply);
            }
            if start.elapsed() >= timeout {
                anyhow::bail!(
                    "Timeout waiting for reply, got {} bytes: {:?}",
                    self.pending.len(),
                    String::from_utf8_lossy(&self.pending)
                );
            }

            match self.port.read(&mut buf) {
                Ok(n) => self.pending.extend_from_slice(&buf[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Return every byte that arrives within `window`.
    pub fn collect_for(&mut self, window: Duration) -> Result<Vec<u8>> {
        let start = Instant::now();
        let mut buf = [0u8; 64];

        while start.elapsed() < window {
            match self.port.read(&mut buf) {
                Ok(n) => self.pending.extend_from_slice(&buf[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(std::mem::take(&mut self.pending))
    }
}
