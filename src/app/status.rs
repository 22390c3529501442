//! Status LED animation.
//!
//! Colour encodes fan power (hue), brightness encodes connectivity:
//!
//! | Condition                                   | Brightness                     |
//! |---------------------------------------------|--------------------------------|
//! | Wi-Fi down                                  | square wave 1.0 / 0.1, 5 Hz    |
//! | No setpoint (NaN) or heartbeat older than 2 s | 1 Hz sine "breathing"        |
//! | Otherwise                                   | steady 1.0                     |
//!
//! Hue slews toward `setpoint * 0.667` (red at 0 %, blue at 100 %; red when
//! NaN) at no more than 0.5 hue units per second, always taking the short
//! way around the colour circle. All timing derives from wall-clock phase and
//! measured frame deltas, so jitter never accumulates.
//!
//! The animation never blocks and only snapshot-reads [`DeviceState`].

use core::f32::consts::PI;
use std::sync::Arc;

use super::ports::{Clock, LedStrip, Rgb};
use crate::config::DeviceConfig;
use crate::state::DeviceState;

/// Which brightness waveform is in force this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indication {
    /// No link: fast blink.
    Blink,
    /// Linked, but no active remote control.
    Breathing,
    /// Linked and under fresh remote control.
    Steady,
}

/// Hue the animation converges to for a given setpoint.
pub fn target_hue(setpoint: f32, max_hue: f32) -> f32 {
    if setpoint.is_nan() { 0.0 } else { setpoint * max_hue }
}

/// Move `current` toward `target` by at most `max_change`, around the
/// shorter arc, and wrap the result into `[0, 1)`.
pub fn step_hue(current: f32, target: f32, max_change: f32) -> f32 {
    let mut diff = target - current;
    if diff > 0.5 {
        diff -= 1.0;
    }
    if diff <= -0.5 {
        diff += 1.0;
    }

    let next = if diff.abs() <= max_change {
        target
    } else {
        current + max_change.copysign(diff)
    };
    if (0.0..1.0).contains(&next) {
        return next;
    }
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs.
    let wrapped = next.rem_euclid(1.0);
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Milliseconds since the last heartbeat.
///
/// The telemetry unit may stamp a heartbeat just after this frame read
/// `now_ms`. A stamp up to `window_ms` ahead of `now_ms` counts as age 0
/// instead of wrapping to ~49 days.
pub fn heartbeat_age(now_ms: u32, heartbeat_ms: u32, window_ms: u32) -> u32 {
    if heartbeat_ms.wrapping_sub(now_ms) <= window_ms {
        0
    } else {
        now_ms.wrapping_sub(heartbeat_ms)
    }
}

pub fn indication(wifi_connected: bool, setpoint: f32, heartbeat_age_ms: u32, timeout_ms: u32) -> Indication {
    if !wifi_connected {
        Indication::Blink
    } else if setpoint.is_nan() || heartbeat_age_ms > timeout_ms {
        Indication::Breathing
    } else {
        Indication::Steady
    }
}

/// Square wave: 1.0 for the first half period, 0.1 for the second.
pub fn blink_brightness(now_ms: u32, half_period_ms: u32) -> f32 {
    if now_ms % (2 * half_period_ms) < half_period_ms { 1.0 } else { 0.1 }
}

/// Sine centred at 0.5, one full cycle per `period_ms`.
pub fn breathing_brightness(now_ms: u32, period_ms: u32) -> f32 {
    let phase = (now_ms % period_ms) as f32 / period_ms as f32 * 2.0 * PI;
    (phase.sin() + 1.0) / 2.0
}

/// HSL (each 0.0–1.0) to 8-bit RGB, truncating each channel.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Rgb {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match (h * 6.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let channel = |v: f32| ((v + m) * 255.0) as u8;
    (channel(r), channel(g), channel(b))
}

pub struct StatusIndicator<L, C> {
    strip: L,
    clock: C,
    state: Arc<DeviceState>,
    config: DeviceConfig,
    pixels: Vec<Rgb>,
    current_hue: f32,
    last_update_ms: u32,
}

impl<L: LedStrip, C: Clock> StatusIndicator<L, C> {
    pub fn new(strip: L, clock: C, state: Arc<DeviceState>, config: &DeviceConfig) -> Self {
        let last_update_ms = clock.now_ms();
        Self {
            strip,
            clock,
            state,
            pixels: vec![(0, 0, 0); config.led_count],
            config: config.clone(),
            current_hue: 0.0,
            last_update_ms,
        }
    }

    pub fn current_hue(&self) -> f32 {
        self.current_hue
    }

    pub fn strip(&self) -> &L {
        &self.strip
    }

    /// Animate forever at the configured frame period.
    pub fn run(&mut self) -> ! {
        loop {
            self.tick();
            self.clock.sleep_ms(self.config.animation_period_ms);
        }
    }

    /// Render one frame and return the colour written to every pixel.
    pub fn tick(&mut self) -> Rgb {
        let now = self.clock.now_ms();
        let dt = now.wrapping_sub(self.last_update_ms) as f32 / 1000.0;
        self.last_update_ms = now;

        let setpoint = self.state.fan_setpoint();
        let target = target_hue(setpoint, self.config.max_power_hue);
        self.current_hue = step_hue(self.current_hue, target, self.config.hue_rate_per_sec * dt);

        let brightness = self.brightness(now, setpoint);
        let colour = hsl_to_rgb(self.current_hue, 1.0, brightness / 2.0);

        self.pixels.fill(colour);
        self.strip.write(&self.pixels, self.config.led_brightness);
        colour
    }

    /// Brightness for this frame from the shared-state snapshot.
    pub fn brightness(&self, now_ms: u32, setpoint: f32) -> f32 {
        let timeout = self.config.heartbeat_timeout_ms;
        let age = heartbeat_age(now_ms, self.state.last_heartbeat_ms(), timeout);
        match indication(self.state.wifi_connected(), setpoint, age, timeout) {
            Indication::Blink => blink_brightness(now_ms, self.config.blink_half_period_ms),
            Indication::Breathing => breathing_brightness(now_ms, self.config.breathing_period_ms),
            Indication::Steady => 1.0,
        }
    }
}
