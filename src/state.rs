//! Shared device state: the only channel between execution units.
//!
//! ```text
//!  sensor/tach sampling ─▶ temperature, humidity, fan_rpm ─┐
//!  ConnectionManager    ─▶ wifi_connected                  ├─▶ StatusIndicator
//!  TelemetryClient      ─▶ last_heartbeat                  │   (snapshot reads)
//!  FanController        ─▶ fan_setpoint                   ─┘
//! ```
//!
//! Every field is a word-sized atomic with exactly one producer, so no
//! multi-field atomicity exists or is needed: each value is independently
//! valid, and a reader may see a mix of old and new fields for one tick.
//! Timestamps are 32-bit wrapping milliseconds since boot.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// `f32` stored as its bit pattern in an [`AtomicU32`].
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Acquire))
    }

    pub fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Release);
    }
}

/// Point-in-time copy of every shared field, e.g. for a console `status` command.
#[derive(Debug, Clone, Copy)]
pub struct StatusSnapshot {
    pub temperature: f32,
    pub humidity: f32,
    pub fan_rpm: f32,
    pub fan_setpoint: f32,
    pub wifi_connected: bool,
    pub last_heartbeat_ms: u32,
}

/// The process-lifetime record shared by all units (wrap it in an `Arc`).
#[derive(Debug)]
pub struct DeviceState {
    temperature: AtomicF32,
    humidity: AtomicF32,
    fan_rpm: AtomicF32,
    fan_setpoint: AtomicF32,
    wifi_connected: AtomicBool,
    last_heartbeat_ms: AtomicU32,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceState {
    /// Boot values: no readings yet, no link, fan commanded off.
    pub fn new() -> Self {
        Self {
            temperature: AtomicF32::new(f32::NAN),
            humidity: AtomicF32::new(f32::NAN),
            fan_rpm: AtomicF32::new(0.0),
            fan_setpoint: AtomicF32::new(0.0),
            wifi_connected: AtomicBool::new(false),
            last_heartbeat_ms: AtomicU32::new(0),
        }
    }

    // ── Sensor / tachometer producer ──────────────────────────

    pub fn publish_readings(&self, temperature: f32, humidity: f32, fan_rpm: f32) {
        self.temperature.store(temperature);
        self.humidity.store(humidity);
        self.fan_rpm.store(fan_rpm);
    }

    pub fn temperature(&self) -> f32 {
        self.temperature.load()
    }

    pub fn humidity(&self) -> f32 {
        self.humidity.load()
    }

    pub fn fan_rpm(&self) -> f32 {
        self.fan_rpm.load()
    }

    // ── FanController producer ────────────────────────────────

    pub(crate) fn store_fan_setpoint(&self, setpoint: f32) {
        self.fan_setpoint.store(setpoint);
    }

    /// Current setpoint; NaN means no external command is active.
    pub fn fan_setpoint(&self) -> f32 {
        self.fan_setpoint.load()
    }

    // ── ConnectionManager producer ────────────────────────────

    pub fn set_wifi_connected(&self, connected: bool) {
        self.wifi_connected.store(connected, Ordering::Release);
    }

    pub fn wifi_connected(&self) -> bool {
        self.wifi_connected.load(Ordering::Acquire)
    }

    // ── TelemetryClient producer ──────────────────────────────

    pub fn record_heartbeat(&self, now_ms: u32) {
        self.last_heartbeat_ms.store(now_ms, Ordering::Release);
    }

    pub fn last_heartbeat_ms(&self) -> u32 {
        self.last_heartbeat_ms.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            temperature: self.temperature(),
            humidity: self.humidity(),
            fan_rpm: self.fan_rpm(),
            fan_setpoint: self.fan_setpoint(),
            wifi_connected: self.wifi_connected(),
            last_heartbeat_ms: self.last_heartbeat_ms(),
        }
    }
}
