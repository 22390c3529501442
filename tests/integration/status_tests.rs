//! StatusIndicator rendering against shared state and a mock strip.

use std::sync::Arc;

use smartac::app::ports::Clock;
use smartac::app::status::StatusIndicator;
use smartac::config::DeviceConfig;
use smartac::drivers::fan::{FanController, PulseCounter};
use smartac::state::DeviceState;

use crate::mock_hw::{ManualClock, MockPwm, MockStrip};

const EPS: f32 = 1e-4;
const RED: (u8, u8, u8) = (255, 0, 0);

struct Rig {
    led: StatusIndicator<MockStrip, ManualClock>,
    strip: MockStrip,
    clock: ManualClock,
    state: Arc<DeviceState>,
    fan: FanController<MockPwm, ManualClock>,
}

fn rig() -> Rig {
    let strip = MockStrip::new();
    let clock = ManualClock::new();
    let state = Arc::new(DeviceState::new());
    let fan = FanController::new(
        MockPwm::new(),
        clock.clone(),
        Arc::new(PulseCounter::new(0)),
        state.clone(),
        2,
    );
    let led = StatusIndicator::new(strip.clone(), clock.clone(), state.clone(), &DeviceConfig::default());
    Rig {
        led,
        strip,
        clock,
        state,
        fan,
    }
}

/// Advance to absolute time `t_ms` and render one frame.
fn tick_at(r: &mut Rig, t_ms: u32) -> (u8, u8, u8) {
    let now = r.clock.now_ms();
    r.clock.advance_ms(u64::from(t_ms - now));
    r.led.tick()
}

#[test]
fn every_pixel_gets_the_colour_at_global_brightness() {
    let mut r = rig();
    let colour = tick_at(&mut r, 50);

    let (pixels, brightness) = r.strip.last().unwrap();
    assert_eq!(pixels.len(), 8);
    assert!(pixels.iter().all(|&p| p == colour));
    assert_eq!(brightness, 192);
}

#[test]
fn disconnected_blinks_at_five_hertz() {
    let mut r = rig();
    assert_eq!(tick_at(&mut r, 50), RED);
    assert_eq!(tick_at(&mut r, 150), (25, 0, 0));
    assert_eq!(tick_at(&mut r, 250), RED);
}

#[test]
fn stale_heartbeat_breathes() {
    let mut r = rig();
    r.state.set_wifi_connected(true);
    // never heard from the server: heartbeat stamp 0 is >2 s old at t=10 s
    assert_eq!(tick_at(&mut r, 10_250), RED);
    assert_eq!(tick_at(&mut r, 10_750), (0, 0, 0));
}

#[test]
fn released_control_breathes_even_with_fresh_heartbeat() {
    let mut r = rig();
    r.state.set_wifi_connected(true);
    r.fan.set_power(f32::NAN);
    r.clock.advance_ms(5_000);
    r.state.record_heartbeat(r.clock.now_ms());

    assert_eq!(tick_at(&mut r, 5_250), RED);
    assert_eq!(tick_at(&mut r, 5_750), (0, 0, 0));
}

#[test]
fn fresh_heartbeat_is_steady() {
    let mut r = rig();
    r.state.set_wifi_connected(true);
    r.state.record_heartbeat(100);
    // exactly at the timeout still counts as fresh
    assert_eq!(tick_at(&mut r, 2_100), RED);
    // past it: breathing, here at its trough
    assert_eq!(tick_at(&mut r, 2_750), (0, 0, 0));
}

#[test]
fn heartbeat_stamped_just_after_the_frame_clock_stays_steady() {
    let mut r = rig();
    r.state.set_wifi_connected(true);
    r.fan.set_power(0.5);
    // telemetry on the other core stamped 5001 after this frame read 5000
    r.state.record_heartbeat(5_001);
    assert_eq!(r.led.brightness(5_000, r.fan.get_power()), 1.0);

    r.clock.advance_ms(5_000);
    let colour = r.led.tick();
    assert_ne!(colour, (0, 0, 0));
}

#[test]
fn hue_slews_toward_full_power_blue_the_short_way() {
    let mut r = rig();
    r.state.set_wifi_connected(true);
    r.fan.set_power(1.0);

    for step in 1..=20u32 {
        r.state.record_heartbeat(r.clock.now_ms());
        tick_at(&mut r, step * 100);
        if step == 1 {
            // red -> blue is 0.333 downward through 0, not 0.667 upward
            assert!((r.led.current_hue() - 0.95).abs() < EPS, "hue {}", r.led.current_hue());
        }
    }
    assert_eq!(r.led.current_hue(), 0.667);
    let (red, green, blue) = r.strip.last().unwrap().0[0];
    assert!(red <= 1 && green == 0 && blue == 255);
}

#[test]
fn dropping_to_zero_wraps_through_magenta() {
    let mut r = rig();
    r.state.set_wifi_connected(true);
    r.fan.set_power(1.0);
    for step in 1..=20u32 {
        tick_at(&mut r, step * 100);
    }
    assert_eq!(r.led.current_hue(), 0.667);

    r.fan.set_power(0.0);
    tick_at(&mut r, 2_100);
    // 0.667 -> 0.0 is 0.333 upward through 1.0, not 0.667 downward
    assert!((r.led.current_hue() - 0.717).abs() < EPS, "hue {}", r.led.current_hue());

    for step in 22..=30u32 {
        tick_at(&mut r, step * 100);
        let h = r.led.current_hue();
        assert!(h > 0.667 || h == 0.0, "took the long way: {h}");
    }
    assert_eq!(r.led.current_hue(), 0.0);
}

#[test]
fn losing_wifi_switches_to_blink() {
    let mut r = rig();
    r.state.set_wifi_connected(true);
    r.state.record_heartbeat(0);
    assert_eq!(tick_at(&mut r, 150), RED);

    r.state.set_wifi_connected(false);
    assert_eq!(tick_at(&mut r, 160), (25, 0, 0));
}
