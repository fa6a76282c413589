//! Nordic UART Service (NUS) definition
//!
//! - Service UUID: 6E400001-B5A3-F393-E0A9-E50E24DCCA9E
//! - RX Characteristic: 6E400002-... (write, write without response)
//! - TX Characteristic: 6E400003-... (notify)

use trouble_host::prelude::*;

/// Largest single write accepted on RX (ATT MTU 247 minus header)
pub const NUS_RX_SIZE: usize = 244;

/// TX carries exactly one `PONG\n` per notification
pub const NUS_TX_SIZE: usize = 5;

/// Service UUID in advertising byte order (little-endian)
pub const NUS_SERVICE_UUID_LE: [u8; 16] = [
    0x9E, 0xCA, 0xDC, 0x24, 0x0E, 0xE5, 0xA9, 0xE0, 0x93, 0xF3, 0xA3, 0xB5, 0x01, 0x00, 0x40, 0x6E,
];

/// Nordic UART Service
///
/// The phone writes telemetry lines to RX in chunks of any size; replies
/// are notified on TX.
#[gatt_service(uuid = "6e400001-b5a3-f393-e0a9-e50e24dcca9e")]
pub struct NordicUartService {
    /// RX Characteristic - client writes text lines here
    #[characteristic(uuid = "6e400002-b5a3-f393-e0a9-e50e24dcca9e", write, write_without_response, value = [0u8; 244])]
    pub rx: [u8; NUS_RX_SIZE],

    /// TX Characteristic - server notifies replies here
    #[characteristic(uuid = "6e400003-b5a3-f393-e0a9-e50e24dcca9e", notify, value = [0u8; 5])]
    pub tx: [u8; NUS_TX_SIZE],
}
