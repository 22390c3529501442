//! Sensirion SHT31 temperature/humidity sensor over I²C.
//!
//! Single-shot mode, high repeatability, no clock stretching (`0x24 0x00`).
//! The sensor answers with two 16-bit words, each followed by a CRC-8
//! (poly 0x31, init 0xFF):
//!
//! ```text
//!  T_msb T_lsb T_crc RH_msb RH_lsb RH_crc
//! ```
//!
//! Generic over `embedded-hal` 1.0 traits so the same driver runs on
//! `esp-idf-hal`'s `I2cDriver` and on host mocks.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::app::ports::{ClimateReading, ClimateSensor};
use crate::error::SensorError;

/// ADDR pin low.
pub const DEFAULT_ADDRESS: u8 = 0x44;

const CMD_MEASURE_HIGH_REP: [u8; 2] = [0x24, 0x00];
/// Max measurement duration at high repeatability.
const MEASURE_WAIT_MS: u32 = 15;

/// CRC-8 as specified by Sensirion: polynomial 0x31, init 0xFF, no reflection.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0xFF;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 { (crc << 1) ^ 0x31 } else { crc << 1 };
        }
    }
    crc
}

pub fn raw_to_celsius(raw: u16) -> f32 {
    -45.0 + 175.0 * f32::from(raw) / 65535.0
}

pub fn raw_to_humidity(raw: u16) -> f32 {
    100.0 * f32::from(raw) / 65535.0
}

/// Check both CRCs and convert a 6-byte measurement frame.
pub fn decode_measurement(frame: &[u8; 6]) -> Result<ClimateReading, SensorError> {
    if crc8(&frame[0..2]) != frame[2] || crc8(&frame[3..5]) != frame[5] {
        return Err(SensorError::Crc);
    }
    let t_raw = u16::from_be_bytes([frame[0], frame[1]]);
    let rh_raw = u16::from_be_bytes([frame[3], frame[4]]);
    Ok(ClimateReading {
        temperature_c: raw_to_celsius(t_raw),
        humidity_pct: raw_to_humidity(rh_raw),
    })
}

pub struct Sht31<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C: I2c, D: DelayNs> Sht31<I2C, D> {
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_address(i2c, delay, DEFAULT_ADDRESS)
    }

    pub fn with_address(i2c: I2C, delay: D, address: u8) -> Self {
        Self { i2c, delay, address }
    }

    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C: I2c, D: DelayNs> ClimateSensor for Sht31<I2C, D> {
    fn read(&mut self) -> Result<ClimateReading, SensorError> {
        self.i2c
            .write(self.address, &CMD_MEASURE_HIGH_REP)
            .map_err(|_| SensorError::Bus)?;
        self.delay.delay_ms(MEASURE_WAIT_MS);

        let mut frame = [0u8; 6];
        self.i2c.read(self.address, &mut frame).map_err(|_| SensorError::Bus)?;
        decode_measurement(&frame)
    }
}
