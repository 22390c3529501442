//! GPIO / peripheral pin assignments for the SmartAC board (Arduino Nano ESP32).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers. Silkscreen labels are given next to each GPIO.

// ---------------------------------------------------------------------------
// Fan (4-wire PWM fan)
// ---------------------------------------------------------------------------

/// LEDC PWM output driving the fan speed input. Silkscreen D3.
pub const FAN_PWM_GPIO: i32 = 6;
/// Open-collector tachometer input, falling-edge triggered. Silkscreen D2.
pub const FAN_TACH_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Status LED strip (WS2812B)
// ---------------------------------------------------------------------------

/// RMT data line for the NeoPixel strip. Silkscreen D6.
pub const LED_DATA_GPIO: i32 = 9;

// ---------------------------------------------------------------------------
// I²C bus (SHT31 temperature/humidity sensor)
// ---------------------------------------------------------------------------

/// Silkscreen A4.
pub const I2C_SDA_GPIO: i32 = 11;
/// Silkscreen A5.
pub const I2C_SCL_GPIO: i32 = 12;

/// I²C bus speed for the SHT31.
pub const I2C_BAUD_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits). 8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
