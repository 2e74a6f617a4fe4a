//! raidwatch relay library entry.
//!
//! Wires the API connection, the per-account attack listeners, and the
//! status/control services into one supervised runtime. Consumed by the
//! binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod services;
pub mod tasks;
pub mod telemetry;
pub mod transport;
