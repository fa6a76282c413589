//! SSD1306 panels over SPI
//!
//! Both panels are 128x64 SSD1306 modules in buffered graphics mode,
//! sharing one SPI bus with a chip-select each.

use display_interface_spi::SPIInterface;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::Ssd1306;

use crate::display::panel::{Panel, PanelOrientation};

/// A buffered 128x64 SSD1306 on an SPI device
pub type Oled<SPI, DC> =
    Ssd1306<SPIInterface<SPI, DC>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Panel bring-up failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelError {
    /// Reset line could not be driven
    Reset,
    /// Controller did not accept the init sequence
    Init,
    /// Mirror setting rejected
    Orientation,
}

impl<SPI, DC> Panel for Oled<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ssd1306::flush(self)
    }
}

/// Reset, initialise and orient one panel.
pub fn init_panel<SPI, DC, RST, D>(
    spi: SPI,
    dc: DC,
    rst: &mut RST,
    delay: &mut D,
    orientation: PanelOrientation,
) -> Result<Oled<SPI, DC>, PanelError>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    let (rotate180, mirror) = orientation.resolve();
    let rotation = if rotate180 {
        DisplayRotation::Rotate180
    } else {
        DisplayRotation::Rotate0
    };

    let mut oled = Ssd1306::new(SPIInterface::new(spi, dc), DisplaySize128x64, rotation)
        .into_buffered_graphics_mode();

    oled.reset(rst, delay).map_err(|_| PanelError::Reset)?;
    oled.init().map_err(|_| PanelError::Init)?;
    if mirror {
        oled.set_mirror(true).map_err(|_| PanelError::Orientation)?;
    }

    Ok(oled)
}
