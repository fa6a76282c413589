//! Hardware and protocol configuration constants for the ESP32-S3 HUD

/// Shared SPI bus for both OLED panels (write-only, no MISO)
pub mod spi {
    pub const SCLK: u8 = 12;
    pub const MOSI: u8 = 11;
    /// Bus clock in MHz (SSD1306 tolerates up to 10 MHz)
    pub const FREQUENCY_MHZ: u32 = 8;
}

/// Left OLED (navigation panel) control pins
pub mod left_panel {
    pub const DC: u8 = 4;
    pub const CS: u8 = 5;
    pub const RST: u8 = 6;
}

/// Right OLED (zone panel) control pins
pub mod right_panel {
    pub const DC: u8 = 7;
    pub const CS: u8 = 15;
    pub const RST: u8 = 16;
}

/// UART link to the Bluetooth SPP bridge module
pub mod spp {
    pub const TX: u8 = 17;
    pub const RX: u8 = 18;
    /// HC-05 class modules ship configured for 9600 baud
    pub const BAUD_RATE: u32 = 9600;
    /// Name the bridge advertises to the paired host
    pub const DEVICE_NAME: &str = "ESP32-SUDOSPEED";
    /// Bytes pulled from the UART per read
    pub const READ_CHUNK: usize = 64;

    /// Module KEY input. Holding it high after power-up puts an HC-05 into
    /// its command mode at the data baud rate; low returns it to data mode.
    /// Modules that only take commands in the 38400 baud boot mode need
    /// KEY strapped high at power-on and `BAUD_RATE` changed to match.
    pub const KEY: u8 = 21;
    /// Time the module needs to switch modes after KEY changes
    pub const AT_MODE_SETTLE_MS: u32 = 50;
    /// How long `begin` waits for the module to answer `OK`
    pub const AT_REPLY_TIMEOUT_MS: u32 = 1000;
    /// Idle poll interval while waiting for the reply
    pub const AT_POLL_INTERVAL_MS: u32 = 10;
}

/// BLE identity
pub mod ble {
    pub const DEVICE_NAME: &str = "MotorHUD BLE";
    /// Static random address, little-endian (MSB 0xE7 carries the static-address bits)
    pub const ADDRESS: [u8; 6] = [0x48, 0x55, 0x44, 0x1E, 0x83, 0xE7];
}

/// Line protocol constants
pub mod protocol {
    /// Per-transport line buffer capacity; older bytes are evicted beyond this
    pub const LINE_CAPACITY: usize = 256;

    /// Characters per navigation display line
    pub const NAV_LINE_CHARS: usize = 20;

    /// Byte capacity of one wrapped navigation line (worst case 4-byte chars)
    pub const NAV_LINE_BYTES: usize = NAV_LINE_CHARS * 4;

    /// Navigation text after `|` expansion (each pipe grows to three bytes)
    pub const NAV_TEXT_BYTES: usize = LINE_CAPACITY * 3;

    /// Accepted zone limits are strictly between these bounds
    pub const ZONE_MIN_EXCLUSIVE: i32 = 0;
    pub const ZONE_MAX_EXCLUSIVE: i32 = 200;

    /// Largest encoded reply
    pub const MAX_REPLY_SIZE: usize = 8;
}

/// Render cadence, in milliseconds
pub mod cadence {
    /// Overspeed ring toggle period
    pub const BLINK_PERIOD_MS: u64 = 450;
    /// Full redraw period for both panels
    pub const DRAW_PERIOD_MS: u64 = 120;
    /// Yield at the end of each control-loop iteration
    pub const LOOP_YIELD_MS: u64 = 4;
}

/// Panel geometry and layout
pub mod display {
    pub const WIDTH: u32 = 128;
    pub const HEIGHT: u32 = 64;

    /// Navigation text rows (top edge of each line)
    pub const NAV_LINE1_Y: i32 = 8;
    pub const NAV_LINE2_Y: i32 = 36;

    /// Horizontal advance of one zone numeral glyph
    pub const ZONE_GLYPH_ADVANCE: u32 = 18;
    /// Top edge of the zone numeral
    pub const ZONE_Y: i32 = 16;

    /// Overspeed ring
    pub const RING_CENTER_X: i32 = 64;
    pub const RING_CENTER_Y: i32 = 32;
    pub const RING_RADIUS: u32 = 27;

    /// Waiting view title rule
    pub const RULE_Y: i32 = 10;

    pub const NAV_READY_TEXT: &str = "Navigation ready";
    pub const ZONE_READY_TEXT: &str = "Speed check ready";
}
