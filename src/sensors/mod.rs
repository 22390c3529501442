//! Sensor drivers.
//!
//! Each driver implements [`ClimateSensor`](crate::app::ports::ClimateSensor)
//! on top of `embedded-hal` bus traits, so it is testable on the host with
//! a mock bus.

pub mod sht31;
