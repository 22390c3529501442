//! Port traits: the hexagonal boundary between the control loops and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ConnectionManager / TelemetryClient / StatusIndicator
//! ```
//!
//! Driven adapters (NVS, Wi-Fi, HTTP, PWM, LED strip, sensor, clock) implement
//! these traits. The control units consume them via generics, so the core
//! never touches ESP-IDF directly and runs unchanged against host mocks.

use core::fmt;
use std::sync::Arc;

use super::events::DeviceEvent;
use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Configuration store (driven adapter: core ← persistent config)
// ───────────────────────────────────────────────────────────────

/// Namespaced string key/value store, read-only from the core's side.
///
/// Consumed keys: `("wifi", "ssid")`, `("wifi", "passwd")`,
/// `("config", "server")`. The core re-reads them on every use; there is
/// no change notification.
pub trait ConfigStore {
    /// `None` if the key has never been written.
    fn get_str(&self, namespace: &str, key: &str) -> Option<String>;
}

impl<T: ConfigStore + ?Sized> ConfigStore for Arc<T> {
    fn get_str(&self, namespace: &str, key: &str) -> Option<String> {
        (**self).get_str(namespace, key)
    }
}

// ───────────────────────────────────────────────────────────────
// Radio port (driven adapter: core ↔ Wi-Fi station)
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityError {
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
            Self::ConnectionFailed => write!(f, "association failed"),
        }
    }
}

pub trait RadioPort {
    /// True while the station is associated and has an IP.
    fn is_connected(&self) -> bool;

    /// Start one association attempt with the given credentials.
    fn associate(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError>;
}

// ───────────────────────────────────────────────────────────────
// HTTP transport (driven adapter: core → telemetry server)
// ───────────────────────────────────────────────────────────────

/// A completed HTTP exchange, whatever its status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Failures below HTTP: no status code was ever received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The URL could not be parsed or has an unsupported scheme.
    InvalidUrl,
    /// DNS, TCP or TLS setup failed.
    Connect,
    /// The request could not be written.
    Send,
    /// The response could not be read.
    Receive,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl => write!(f, "invalid URL"),
            Self::Connect => write!(f, "connection refused"),
            Self::Send => write!(f, "send payload failed"),
            Self::Receive => write!(f, "read response failed"),
        }
    }
}

pub trait HttpTransport {
    /// Perform one POST with `body` and a single `Content-Type` header.
    /// No retries, no timeout beyond what the transport itself imposes.
    fn post(
        &mut self,
        url: &str,
        content_type: &str,
        body: &[u8],
    ) -> Result<HttpResponse, TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Climate sensor (driven adapter: hardware → core)
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

pub trait ClimateSensor {
    fn read(&mut self) -> Result<ClimateReading, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuators (driven adapters: core → hardware)
// ───────────────────────────────────────────────────────────────

/// Fan PWM output. Takes `&self` so the fan controller can be shared with
/// the console while the telemetry unit also commands it.
pub trait PwmPort {
    fn set_duty(&self, duty: u8);
}

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

/// Addressable LED strip: one colour per pixel plus a global brightness.
pub trait LedStrip {
    fn write(&mut self, pixels: &[Rgb], brightness: u8);
}

// ───────────────────────────────────────────────────────────────
// Clock (driven adapter: monotonic time + scheduler-yielding sleep)
// ───────────────────────────────────────────────────────────────

/// Uptime counters wrap like Arduino's `millis()`/`micros()`; compare with
/// `wrapping_sub`, never with `<`.
pub trait Clock {
    fn now_ms(&self) -> u32;
    fn now_us(&self) -> u32;
    /// Block the calling task, yielding to the scheduler.
    fn sleep_ms(&self, ms: u32);
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }

    fn now_us(&self) -> u32 {
        (**self).now_us()
    }

    fn sleep_ms(&self, ms: u32) {
        (**self).sleep_ms(ms);
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: core → logging)
// ───────────────────────────────────────────────────────────────

/// The core reports what it is doing through this port. Adapters decide
/// where it goes (serial console, tests).
pub trait EventSink {
    fn emit(&mut self, event: &DeviceEvent);
}
