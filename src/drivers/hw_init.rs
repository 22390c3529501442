//! One-shot hardware peripheral initialization.
//!
//! Configures the fan LEDC timer/channel and the tachometer input with its
//! falling-edge interrupt, using raw ESP-IDF sys calls. Called once from
//! `main()` before the control tasks start.

use std::sync::Arc;

use crate::drivers::fan::PulseCounter;
use crate::error::Result;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::drivers::fan_pwm::{LEDC_CH_FAN, LEDC_TIMER_FAN};
#[cfg(target_os = "espidf")]
use crate::error::Error;
#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
fn check(what: &'static str, rc: esp_err_t) -> Result<()> {
    if rc == ESP_OK as esp_err_t {
        Ok(())
    } else {
        Err(Error::Init(what, rc))
    }
}

// ── LEDC PWM ─────────────────────────────────────────────────

/// Timer 0 at `freq_hz`, 8-bit; channel 0 on the fan pin, duty 0.
#[cfg(target_os = "espidf")]
pub fn init_fan_pwm(freq_hz: u32) -> Result<()> {
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: LEDC_TIMER_FAN,
        duty_resolution: pins::PWM_RESOLUTION_BITS as ledc_timer_bit_t,
        freq_hz,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    // SAFETY: called once from the main task before any PWM writes.
    check("LEDC timer config", unsafe { ledc_timer_config(&timer) })?;

    let channel = ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: LEDC_CH_FAN,
        timer_sel: LEDC_TIMER_FAN,
        gpio_num: pins::FAN_PWM_GPIO,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    };
    check("LEDC channel config", unsafe { ledc_channel_config(&channel) })?;

    info!("hw_init: fan PWM on GPIO{} ({} Hz, 8-bit)", pins::FAN_PWM_GPIO, freq_hz);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_fan_pwm(freq_hz: u32) -> Result<()> {
    log::info!("hw_init(sim): fan PWM init skipped ({} Hz)", freq_hz);
    Ok(())
}

// ── Tachometer ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tach_gpio_isr(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` is the leaked Arc<PulseCounter> registered below; it is
    // never freed, and record_edge is a single atomic add.
    let pulses = unsafe { &*(arg as *const PulseCounter) };
    pulses.record_edge();
}

/// Tachometer pin as input with pull-up, falling-edge ISR feeding `pulses`.
///
/// The counter reference is leaked into the ISR registration and lives for
/// the rest of the program.
#[cfg(target_os = "espidf")]
pub fn init_tachometer(pulses: Arc<PulseCounter>) -> Result<()> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::FAN_TACH_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
    };
    // SAFETY: one-time configuration from the main task.
    check("tach GPIO config", unsafe { gpio_config(&cfg) })?;

    // ESP_ERR_INVALID_STATE: the service is already installed.
    let rc = unsafe { gpio_install_isr_service(0) };
    if rc != ESP_OK as esp_err_t && rc != ESP_ERR_INVALID_STATE as esp_err_t {
        return Err(Error::Init("GPIO ISR service install", rc));
    }

    let arg = Arc::into_raw(pulses) as *mut core::ffi::c_void;
    let rc = unsafe { gpio_isr_handler_add(pins::FAN_TACH_GPIO, Some(tach_gpio_isr), arg) };
    if rc != ESP_OK as esp_err_t {
        // SAFETY: the handler was not registered, so we still own the only raw reference.
        drop(unsafe { Arc::from_raw(arg as *const PulseCounter) });
        return Err(Error::Init("tach ISR handler add", rc));
    }
    check("tach interrupt enable", unsafe { gpio_intr_enable(pins::FAN_TACH_GPIO) })?;

    info!("hw_init: tachometer ISR on GPIO{} (falling edge)", pins::FAN_TACH_GPIO);
    Ok(())
}

/// Simulation: nothing generates edges; tests call `record_edge` directly.
#[cfg(not(target_os = "espidf"))]
pub fn init_tachometer(pulses: Arc<PulseCounter>) -> Result<()> {
    log::info!("hw_init(sim): tachometer ISR skipped ({} pending)", pulses.pending());
    Ok(())
}
