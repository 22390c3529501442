//! Outbound device events.
//!
//! The control units emit these through the
//! [`EventSink`](super::ports::EventSink) port instead of formatting log
//! lines themselves. The `Display` text is what ends up on the console.

use core::fmt;

use super::ports::TransportError;

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// No SSID is configured yet; polling the store.
    WaitingForCredentials,
    /// Starting an association attempt.
    Connecting { ssid: String },
    /// The link is up.
    Connected { ssid: String },
    /// The server answered 200; carries the setpoint it applied, if any.
    HeartbeatAccepted { setpoint: Option<f32> },
    /// The server answered with something other than 200.
    HeartbeatRejected { status: u16 },
    /// No HTTP status was received at all.
    HeartbeatFailed { error: TransportError },
}

impl fmt::Display for DeviceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WaitingForCredentials => write!(f, "Waiting for WiFi credentials to be configured..."),
            Self::Connecting { ssid } => write!(f, "Connecting to WiFi: {ssid}"),
            Self::Connected { ssid } => write!(f, "WiFi connected: {ssid}"),
            Self::HeartbeatAccepted { setpoint: Some(p) } => write!(f, "Heartbeat ok, fan power {p}"),
            Self::HeartbeatAccepted { setpoint: None } => write!(f, "Heartbeat ok"),
            Self::HeartbeatRejected { status } => write!(f, "Heartbeat response code: {status}"),
            Self::HeartbeatFailed { error } => write!(f, "Heartbeat failed: {error}"),
        }
    }
}
