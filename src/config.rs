//! Device tuning parameters
//!
//! Timing and scaling constants for every unit of the SmartAC controller.
//! Network settings (SSID, password, server URL) are *not* here: they live in
//! the persistent key/value store and are re-read every cycle.

use serde::{Deserialize, Serialize};

/// Core device configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    // --- Connection ---
    /// Poll interval while no SSID is configured (milliseconds)
    pub credential_poll_interval_ms: u32,
    /// Pause between failed association attempts (milliseconds)
    pub association_retry_interval_ms: u32,

    // --- Telemetry ---
    /// Sleep between telemetry exchanges (milliseconds)
    pub telemetry_interval_ms: u32,
    /// Age after which the last heartbeat counts as stale (milliseconds)
    pub heartbeat_timeout_ms: u32,

    // --- Fan ---
    /// Tachometer pulses per fan revolution
    pub pulses_per_revolution: u32,
    /// LEDC base frequency for the fan PWM output
    pub fan_pwm_freq_hz: u32,

    // --- Status LED ---
    /// Nominal animation frame period (milliseconds, ~60 Hz)
    pub animation_period_ms: u32,
    /// Maximum hue slew, in hue units per second
    pub hue_rate_per_sec: f32,
    /// Hue shown at full fan power (0.0 = red, 0.667 = blue)
    pub max_power_hue: f32,
    /// Half period of the disconnected blink (milliseconds)
    pub blink_half_period_ms: u32,
    /// Full period of the breathing waveform (milliseconds)
    pub breathing_period_ms: u32,
    /// Number of pixels on the strip
    pub led_count: usize,
    /// Global strip brightness (0-255)
    pub led_brightness: u8,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            // Connection
            credential_poll_interval_ms: 2000,
            association_retry_interval_ms: 1000,

            // Telemetry
            telemetry_interval_ms: 1000,
            heartbeat_timeout_ms: 2000,

            // Fan
            pulses_per_revolution: 2,
            fan_pwm_freq_hz: 25_000, // inaudible

            // Status LED
            animation_period_ms: 16, // 60 Hz
            hue_rate_per_sec: 0.5,
            max_power_hue: 0.667,
            blink_half_period_ms: 100, // 5 Hz full cycle
            breathing_period_ms: 1000, // 1 Hz
            led_count: 8,
            led_brightness: 192,
        }
    }
}
