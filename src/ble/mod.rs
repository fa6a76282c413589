//! Bluetooth Low Energy module
//!
//! Exposes the HUD's line protocol over the Nordic UART Service (NUS),
//! alongside the SPP bridge.

pub mod service;

pub use service::NordicUartService;
