//! Fan power setpoint, PWM output, and tachometer RPM sampling.
//!
//! The tachometer pulls its line low twice per revolution. A GPIO ISR
//! calls [`PulseCounter::record_edge`] on every falling edge; the telemetry
//! unit calls [`FanController::sample_rpm`] once per cycle, which drains the
//! counter (read-and-zero as one atomic step) and converts the count over
//! the elapsed interval into RPM.
//!
//! ## Setpoint contract
//!
//! The setpoint is either a value in `[0, 1]` or NaN ("no external
//! command"). PWM duty always follows it: `round(setpoint * 255)`, or 0 for
//! NaN. The setpoint is published into [`DeviceState`] so the status LED can
//! read it without touching the controller.

use std::sync::{Arc, Mutex, PoisonError};
use core::sync::atomic::{AtomicU8, AtomicU32, Ordering};

use crate::app::ports::{Clock, PwmPort};
use crate::state::DeviceState;

/// Tachometer edges since the last drain, plus the drain timestamp.
///
/// `record_edge` may preempt `drain` at any point; the `swap` makes the
/// drain a single indivisible read-and-reset, so every edge is counted in
/// exactly one sample.
#[derive(Debug)]
pub struct PulseCounter {
    count: AtomicU32,
    last_sample_us: AtomicU32,
}

impl PulseCounter {
    pub fn new(now_us: u32) -> Self {
        Self {
            count: AtomicU32::new(0),
            last_sample_us: AtomicU32::new(now_us),
        }
    }

    /// ISR-safe: called on every falling tachometer edge.
    pub fn record_edge(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Edges recorded since the last drain (does not reset).
    pub fn pending(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Take the edge count and the time since the previous drain, resetting both.
    pub fn drain(&self, now_us: u32) -> (u32, u32) {
        let count = self.count.swap(0, Ordering::AcqRel);
        let last = self.last_sample_us.swap(now_us, Ordering::AcqRel);
        (count, now_us.wrapping_sub(last))
    }
}

/// Convert a drained pulse count into RPM.
///
/// A near-zero interval yields a very large (or non-finite) rate; that is a
/// property of the sampling method, which relies on a bounded call cadence.
pub fn pulses_to_rpm(count: u32, elapsed_us: u32, pulses_per_revolution: u32) -> f32 {
    let elapsed_secs = elapsed_us as f32 / 1_000_000.0;
    60.0 * (count as f32 / elapsed_secs) / pulses_per_revolution as f32
}

/// Map a setpoint to an 8-bit PWM duty.
pub fn setpoint_to_duty(setpoint: f32) -> u8 {
    if setpoint.is_nan() {
        0
    } else {
        (setpoint.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

pub struct FanController<P: PwmPort, C: Clock> {
    pwm: P,
    clock: C,
    pulses: Arc<PulseCounter>,
    state: Arc<DeviceState>,
    duty: AtomicU8,
    /// Serialises `set_power` callers so the stored setpoint and the PWM
    /// duty always come from the same call.
    command: Mutex<()>,
    pulses_per_revolution: u32,
}

impl<P: PwmPort, C: Clock> FanController<P, C> {
    /// Takes over the PWM output and drives it to match the boot setpoint.
    pub fn new(
        pwm: P,
        clock: C,
        pulses: Arc<PulseCounter>,
        state: Arc<DeviceState>,
        pulses_per_revolution: u32,
    ) -> Self {
        let duty = setpoint_to_duty(state.fan_setpoint());
        pwm.set_duty(duty);
        Self {
            pwm,
            clock,
            pulses,
            state,
            duty: AtomicU8::new(duty),
            command: Mutex::new(()),
            pulses_per_revolution,
        }
    }

    /// Command a new fan power. NaN releases external control (fan off);
    /// anything else is clamped into `[0, 1]`. Returns the stored setpoint.
    ///
    /// Safe to call from the console and the telemetry unit at once: the
    /// last caller wins for both the setpoint and the duty.
    pub fn set_power(&self, power: f32) -> f32 {
        let setpoint = if power.is_nan() { f32::NAN } else { power.clamp(0.0, 1.0) };
        let duty = setpoint_to_duty(setpoint);
        let _guard = self.command.lock().unwrap_or_else(PoisonError::into_inner);
        self.state.store_fan_setpoint(setpoint);
        self.pwm.set_duty(duty);
        self.duty.store(duty, Ordering::Relaxed);
        log::debug!("fan: setpoint={} duty={}", setpoint, duty);
        setpoint
    }

    /// The last stored setpoint, verbatim (may be NaN).
    pub fn get_power(&self) -> f32 {
        self.state.fan_setpoint()
    }

    /// Duty most recently written to the PWM output.
    pub fn duty(&self) -> u8 {
        self.duty.load(Ordering::Relaxed)
    }

    /// Drain the tachometer counter and return RPM over the interval since
    /// the previous call.
    pub fn sample_rpm(&self) -> f32 {
        let (count, elapsed_us) = self.pulses.drain(self.clock.now_us());
        pulses_to_rpm(count, elapsed_us, self.pulses_per_revolution)
    }
}
