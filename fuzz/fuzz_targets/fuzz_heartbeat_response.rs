//! Fuzz target: heartbeat response body → fan setpoint
//!
//! Feeds arbitrary server response bodies through `decode_setpoint` and
//! `FanController::set_power`, exactly as a 200 reply is applied.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - The stored setpoint is NaN or within `[0, 1]`
//! - The PWM duty always equals `setpoint_to_duty(stored)`
//!
//! cargo fuzz run fuzz_heartbeat_response

#![no_main]

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use smartac::app::ports::{Clock, PwmPort};
use smartac::app::telemetry::decode_setpoint;
use smartac::drivers::fan::{setpoint_to_duty, FanController, PulseCounter};
use smartac::state::DeviceState;

struct LatchPwm(AtomicU8);

impl PwmPort for LatchPwm {
    fn set_duty(&self, duty: u8) {
        self.0.store(duty, Ordering::Relaxed);
    }
}

struct FrozenClock;

impl Clock for FrozenClock {
    fn now_ms(&self) -> u32 {
        0
    }
    fn now_us(&self) -> u32 {
        0
    }
    fn sleep_ms(&self, _ms: u32) {}
}

fuzz_target!(|data: &[u8]| {
    let fan = FanController::new(
        LatchPwm(AtomicU8::new(0)),
        FrozenClock,
        Arc::new(PulseCounter::new(0)),
        Arc::new(DeviceState::new()),
        2,
    );

    let Some(p) = decode_setpoint(data) else {
        assert!(data.len() < 4);
        return;
    };
    fan.set_power(p);

    let stored = fan.get_power();
    assert!(stored.is_nan() || (0.0..=1.0).contains(&stored), "setpoint escaped: {stored}");
    assert_eq!(fan.duty(), setpoint_to_duty(stored));
});
