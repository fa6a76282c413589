pub mod parser;
pub mod serialiser;
pub mod types;

pub use parser::LineParser;
pub use serialiser::ReplySerialiser;
pub use types::{Command, Rejection, Reply, ReplyMessage, TransportId};
