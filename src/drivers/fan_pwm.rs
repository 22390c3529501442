//! Fan PWM output on an LEDC channel.
//!
//! The timer and channel are configured once by
//! [`hw_init::init_fan_pwm`](super::hw_init::init_fan_pwm); this type only
//! writes duty. 8-bit resolution, so the setpoint duty maps 1:1.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::app::ports::PwmPort;

/// LEDC channel carrying the fan PWM.
pub const LEDC_CH_FAN: u32 = 0;
/// LEDC timer driving [`LEDC_CH_FAN`].
pub const LEDC_TIMER_FAN: u32 = 0;

pub struct LedcFanPwm {
    channel: u32,
    last_duty: AtomicU8,
}

impl LedcFanPwm {
    pub fn new(channel: u32) -> Self {
        Self {
            channel,
            last_duty: AtomicU8::new(0),
        }
    }

    /// Duty most recently written to the channel.
    pub fn last_duty(&self) -> u8 {
        self.last_duty.load(Ordering::Relaxed)
    }
}

impl PwmPort for LedcFanPwm {
    fn set_duty(&self, duty: u8) {
        ledc_set(self.channel, duty);
        self.last_duty.store(duty, Ordering::Relaxed);
    }
}

#[cfg(target_os = "espidf")]
fn ledc_set(channel: u32, duty: u8) {
    use esp_idf_svc::sys::{ledc_mode_t_LEDC_LOW_SPEED_MODE, ledc_set_duty, ledc_update_duty};
    // SAFETY: the channel was configured in init_fan_pwm(). set+update is
    // two register writes; concurrent callers at worst apply the later duty
    // one PWM period late.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, u32::from(duty));
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
fn ledc_set(channel: u32, duty: u8) {
    log::trace!("ledc(sim): ch{} duty={}", channel, duty);
}
