//! WS2812B ("NeoPixel") strip driver.
//!
//! Implements [`LedStrip`]. Pixels go out in GRB order, MSB first; global
//! brightness is applied per channel with `scale8` before encoding, the
//! same 8-bit scaling the Arduino NeoPixel/FastLED libraries use.
//!
//! - **`target_os = "espidf"`**: bit-banged through an RMT TX channel at
//!   40 MHz (25 ns ticks).
//! - **all other targets**: keeps the last encoded frame in memory.

use crate::app::ports::{LedStrip, Rgb};

#[cfg(target_os = "espidf")]
use esp_idf_hal::{
    gpio::OutputPin,
    peripheral::Peripheral,
    rmt::{
        config::TransmitConfig, PinState, Pulse, PulseTicks, RmtChannel, TxRmtDriver,
        VariableLengthSignal,
    },
};

/// `value * (scale + 1) / 256`: 255 is identity, 0 is off.
pub fn scale8(value: u8, scale: u8) -> u8 {
    ((u16::from(value) * (u16::from(scale) + 1)) >> 8) as u8
}

/// Wire bytes for a frame: 3 per pixel, GRB, brightness-scaled.
pub fn encode_grb(pixels: &[Rgb], brightness: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len() * 3);
    for &(r, g, b) in pixels {
        out.push(scale8(g, brightness));
        out.push(scale8(r, brightness));
        out.push(scale8(b, brightness));
    }
    out
}

// ── RMT backend ──────────────────────────────────────────────

/// 80 MHz APB / 2.
#[cfg(target_os = "espidf")]
const RMT_CLOCK_DIVIDER: u8 = 2;
// Bit timings in 25 ns ticks (datasheet: T0H 0.4 µs, T0L 0.85 µs, T1H 0.8 µs, T1L 0.45 µs).
#[cfg(target_os = "espidf")]
const T0H: u16 = 16;
#[cfg(target_os = "espidf")]
const T0L: u16 = 34;
#[cfg(target_os = "espidf")]
const T1H: u16 = 32;
#[cfg(target_os = "espidf")]
const T1L: u16 = 18;

#[cfg(target_os = "espidf")]
pub struct Ws2812Strip {
    tx: TxRmtDriver<'static>,
    bit0: [Pulse; 2],
    bit1: [Pulse; 2],
}

#[cfg(target_os = "espidf")]
impl Ws2812Strip {
    pub fn new<C, P>(
        channel: impl Peripheral<P = C> + 'static,
        pin: impl Peripheral<P = P> + 'static,
    ) -> anyhow::Result<Self>
    where
        C: RmtChannel,
        P: OutputPin,
    {
        use anyhow::Context;

        let config = TransmitConfig::new()
            .clock_divider(RMT_CLOCK_DIVIDER)
            .idle(Some(PinState::Low));
        let tx = TxRmtDriver::new(channel, pin, &config).context("failed to init RMT LED driver")?;

        let pulse = |state: PinState, ticks: u16| -> anyhow::Result<Pulse> {
            Ok(Pulse::new(state, PulseTicks::new(ticks).context("invalid WS2812 pulse width")?))
        };
        Ok(Self {
            tx,
            bit0: [pulse(PinState::High, T0H)?, pulse(PinState::Low, T0L)?],
            bit1: [pulse(PinState::High, T1H)?, pulse(PinState::Low, T1L)?],
        })
    }

    fn transmit(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        let mut signal = VariableLengthSignal::with_capacity(bytes.len() * 8 * 2);
        for &byte in bytes {
            for bit in (0..8).rev() {
                let pulses = if byte & (1 << bit) != 0 { &self.bit1 } else { &self.bit0 };
                signal.push(pulses.iter())?;
            }
        }
        self.tx.start_blocking(&signal)?;
        Ok(())
    }
}

#[cfg(target_os = "espidf")]
impl LedStrip for Ws2812Strip {
    fn write(&mut self, pixels: &[Rgb], brightness: u8) {
        let bytes = encode_grb(pixels, brightness);
        if let Err(e) = self.transmit(&bytes) {
            log::debug!("ws2812: frame dropped: {:#}", e);
        }
    }
}

// ── Simulation ───────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
pub struct Ws2812Strip {
    frame: Vec<u8>,
    frames_written: u32,
}

#[cfg(not(target_os = "espidf"))]
impl Ws2812Strip {
    pub fn new() -> Self {
        Self::default()
    }

    /// GRB bytes of the last frame.
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    pub fn frames_written(&self) -> u32 {
        self.frames_written
    }
}

#[cfg(not(target_os = "espidf"))]
impl LedStrip for Ws2812Strip {
    fn write(&mut self, pixels: &[Rgb], brightness: u8) {
        self.frame = encode_grb(pixels, brightness);
        self.frames_written = self.frames_written.wrapping_add(1);
    }
}
