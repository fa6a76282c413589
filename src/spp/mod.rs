pub mod bridge;
pub mod reader;
pub mod traits;

pub use bridge::UartSppBridge;
pub use reader::SppReader;
pub use traits::{LinkError, SppPort};
