//! Panel trait for abstraction and testability
//!
//! A panel is an `embedded-graphics` draw target with an explicit flush,
//! so the renderer works the same on an SSD1306 and on a host framebuffer.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::DrawTarget;

/// Monochrome panel with a frame buffer that is pushed out by `flush`.
pub trait Panel: DrawTarget<Color = BinaryColor> {
    /// Send the frame buffer to the glass
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// How a panel is mounted, applied once at init.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelOrientation {
    pub rotate180: bool,
    pub mirror_x: bool,
    pub mirror_y: bool,
}

impl PanelOrientation {
    /// Reduce to the rotation and horizontal mirror a driver exposes.
    ///
    /// A vertical mirror equals a 180 degree turn plus a horizontal mirror.
    /// Returns `(rotate180, mirror_x)`.
    pub fn resolve(&self) -> (bool, bool) {
        (
            self.rotate180 ^ self.mirror_y,
            self.mirror_x ^ self.mirror_y,
        )
    }
}

#[cfg(test)]
pub mod mock {
    //! Host framebuffer panel for testing

    use super::*;
    use crate::config::display::{HEIGHT, WIDTH};
    use core::convert::Infallible;
    use embedded_graphics::prelude::*;

    const W: usize = WIDTH as usize;
    const H: usize = HEIGHT as usize;

    /// In-memory 128x64 panel
    pub struct TestPanel {
        /// Pixels as drawn, before flush
        pixels: [[bool; W]; H],
        /// Pixels as of the last flush
        shown: [[bool; W]; H],
        /// Number of flushes
        flushes: usize,
    }

    impl TestPanel {
        pub fn new() -> Self {
            Self {
                pixels: [[false; W]; H],
                shown: [[false; W]; H],
                flushes: 0,
            }
        }

        /// Pixel state on the glass
        pub fn is_lit(&self, x: usize, y: usize) -> bool {
            self.shown[y][x]
        }

        /// Number of lit pixels on the glass within rows `y0..y1`
        pub fn lit_in_rows(&self, y0: usize, y1: usize) -> usize {
            self.shown[y0..y1]
                .iter()
                .map(|row| row.iter().filter(|&&p| p).count())
                .sum()
        }

        /// Leftmost lit column on the glass within rows `y0..y1`
        pub fn first_lit_column(&self, y0: usize, y1: usize) -> Option<usize> {
            (0..W).find(|&x| (y0..y1).any(|y| self.shown[y][x]))
        }

        pub fn flushes(&self) -> usize {
            self.flushes
        }

        pub fn frame(&self) -> [[bool; W]; H] {
            self.shown
        }
    }

    impl Default for TestPanel {
        fn default() -> Self {
            Self::new()
        }
    }

    impl OriginDimensions for TestPanel {
        fn size(&self) -> Size {
            Size::new(WIDTH, HEIGHT)
        }
    }

    impl DrawTarget for TestPanel {
        type Color = BinaryColor;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                if (0..W as i32).contains(&point.x) && (0..H as i32).contains(&point.y) {
                    self.pixels[point.y as usize][point.x as usize] = color.is_on();
                }
            }
            Ok(())
        }
    }

    impl Panel for TestPanel {
        fn flush(&mut self) -> Result<(), Self::Error> {
            self.shown = self.pixels;
            self.flushes += 1;
            Ok(())
        }
    }

    /// Bus error reported by [`UnpluggedPanel`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BusFault;

    /// Panel with nothing on the other end of the bus: drawing into the
    /// buffer works, every flush fails
    pub struct UnpluggedPanel;

    impl OriginDimensions for UnpluggedPanel {
        fn size(&self) -> Size {
            Size::new(WIDTH, HEIGHT)
        }
    }

    impl DrawTarget for UnpluggedPanel {
        type Color = BinaryColor;
        type Error = BusFault;

        fn draw_iter<I>(&mut self, _pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            Ok(())
        }
    }

    impl Panel for UnpluggedPanel {
        fn flush(&mut self) -> Result<(), Self::Error> {
            Err(BusFault)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_passthrough() {
        let o = PanelOrientation::default();
        assert_eq!(o.resolve(), (false, false));

        let o = PanelOrientation {
            rotate180: true,
            mirror_x: true,
            mirror_y: false,
        };
        assert_eq!(o.resolve(), (true, true));
    }

    #[test]
    fn test_vertical_mirror_folds_into_rotation() {
        let o = PanelOrientation {
            rotate180: false,
            mirror_x: false,
            mirror_y: true,
        };
        assert_eq!(o.resolve(), (true, true));

        // Both mirrors cancel to a plain half turn
        let o = PanelOrientation {
            rotate180: false,
            mirror_x: true,
            mirror_y: true,
        };
        assert_eq!(o.resolve(), (true, false));
    }
}
