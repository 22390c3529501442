//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below exercises one control unit against the mock adapters
//! in `mock_hw`. Everything runs on the host with no hardware attached.

mod connection_tests;
mod mock_hw;
mod status_tests;
