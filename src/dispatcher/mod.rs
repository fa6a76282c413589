pub mod handler;

pub use handler::LineDispatcher;
