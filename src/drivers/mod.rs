//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod fan;
pub mod fan_pwm;
pub mod hw_init;
pub mod task_pin;
pub mod ws2812;
