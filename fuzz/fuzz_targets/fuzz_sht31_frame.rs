//! Fuzz target: SHT31 measurement frame decoder
//!
//! Generates arbitrary 6-byte frames as they would arrive over I²C.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - A frame that passes both CRCs converts into the sensor's physical range
//!   (-45..=130 °C, 0..=100 %RH)
//!
//! cargo fuzz run fuzz_sht31_frame

#![no_main]

use libfuzzer_sys::fuzz_target;
use smartac::sensors::sht31::decode_measurement;

fuzz_target!(|data: &[u8]| {
    let Ok(frame) = <[u8; 6]>::try_from(data) else {
        return;
    };
    if let Ok(r) = decode_measurement(&frame) {
        assert!((-45.0..=130.0).contains(&r.temperature_c));
        assert!((0.0..=100.0).contains(&r.humidity_pct));
    }
});
