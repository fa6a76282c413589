//! HUD panels: the drawing seam and the two panel layouts

pub mod panel;
pub mod render;
#[cfg(feature = "embedded")]
pub mod oled;

pub use panel::{Panel, PanelOrientation};
pub use render::{HudDisplay, PassReport};
