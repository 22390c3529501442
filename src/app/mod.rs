//! Application core: the device control loop, zero direct I/O.
//!
//! Three independently scheduled units live here: the connection state
//! machine and telemetry exchange (one blocking unit) and the status LED
//! animation (a non-blocking 60 Hz unit). They cooperate only through
//! [`DeviceState`](crate::state::DeviceState). All hardware and network
//! access goes through the **port traits** in [`ports`].

pub mod connection;
pub mod events;
pub mod ports;
pub mod status;
pub mod telemetry;
