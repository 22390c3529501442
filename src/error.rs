//! Unified error type for the SmartAC firmware.
//!
//! Each subsystem keeps its own small error enum; this module funnels them
//! into a single `Error` so boot code can treat them uniformly and hand them
//! to `anyhow`. The control loops themselves never propagate errors upward:
//! they log and retry.

use core::fmt;

use crate::app::ports::{ConnectivityError, TransportError};

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The climate sensor could not be read.
    Sensor(SensorError),
    /// The radio could not associate.
    Radio(ConnectivityError),
    /// The telemetry transport failed.
    Transport(TransportError),
    /// Peripheral initialisation failed (ESP-IDF return code).
    Init(&'static str, i32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Radio(e) => write!(f, "radio: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Init(what, rc) => write!(f, "init: {what} (rc={rc})"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The I²C transaction was not acknowledged or aborted.
    Bus,
    /// A measurement word failed its CRC-8 check.
    Crc,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "I2C transaction failed"),
            Self::Crc => write!(f, "CRC mismatch"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

impl From<ConnectivityError> for Error {
    fn from(e: ConnectivityError) -> Self {
        Self::Radio(e)
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
