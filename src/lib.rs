#![cfg_attr(not(test), no_std)]

pub mod boot;
pub mod cadence;
pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod display;
pub mod hud;
pub mod protocol;
pub mod spp;
pub mod telemetry;

// These modules depend on the radio stack and embassy timers, only
// available with the embedded feature
#[cfg(feature = "embedded")]
pub mod ble;
#[cfg(feature = "embedded")]
pub mod tasks;
