//! SmartAC fan controller firmware library.
//!
//! Exposes the control units and their ports for integration testing. All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module; on the host every adapter has a simulation branch.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod pins;
pub mod state;

pub mod adapters;
pub mod drivers;
pub mod sensors;
