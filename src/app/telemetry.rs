//! Periodic telemetry exchange with the remote server.
//!
//! One cycle:
//!
//! ```text
//!  ensure_connected ─▶ read server URL ─▶ sample sensor + RPM ─▶ POST 12 bytes
//!        ─▶ 200? apply setpoint, stamp heartbeat ─▶ sleep 1 s ─▶ repeat
//! ```
//!
//! ## Wire format
//!
//! Request body: three little-endian IEEE-754 `f32`s, packed:
//! `temperature | humidity | fan_rpm` (12 bytes). Response: on HTTP 200,
//! the first 4 body bytes, if present, are a little-endian `f32` fan
//! setpoint. Little-endian is the target's native order.
//!
//! Every failure is absorbed: logged through the event sink, state left
//! untouched, and the next cycle tries again from scratch.

use std::sync::Arc;

use super::connection::ConnectionManager;
use super::events::DeviceEvent;
use super::ports::{Clock, ClimateSensor, ConfigStore, EventSink, HttpTransport, PwmPort, RadioPort};
use crate::config::DeviceConfig;
use crate::drivers::fan::FanController;
use crate::state::DeviceState;

pub const CONFIG_NAMESPACE: &str = "config";
pub const SERVER_KEY: &str = "server";
pub const CONTENT_TYPE: &str = "application/octet-stream";

/// Size of an encoded [`TelemetryRecord`].
pub const RECORD_LEN: usize = 12;

/// The sensor/fan snapshot sent upstream each cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryRecord {
    pub temperature: f32,
    pub humidity: f32,
    pub fan_rpm: f32,
}

impl TelemetryRecord {
    pub fn encode(&self) -> [u8; RECORD_LEN] {
        let mut buf = [0u8; RECORD_LEN];
        buf[0..4].copy_from_slice(&self.temperature.to_le_bytes());
        buf[4..8].copy_from_slice(&self.humidity.to_le_bytes());
        buf[8..12].copy_from_slice(&self.fan_rpm.to_le_bytes());
        buf
    }

    pub fn decode(buf: &[u8; RECORD_LEN]) -> Self {
        let word = |i: usize| f32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]);
        Self {
            temperature: word(0),
            humidity: word(4),
            fan_rpm: word(8),
        }
    }
}

/// First four bytes of a response body as a setpoint; `None` if the body is too short.
pub fn decode_setpoint(body: &[u8]) -> Option<f32> {
    let word: [u8; 4] = body.get(..4)?.try_into().ok()?;
    Some(f32::from_le_bytes(word))
}

/// How a single cycle ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleOutcome {
    /// No server URL configured; no network I/O was done.
    Skipped,
    /// HTTP 200. Carries the setpoint now in force if the body held one.
    Accepted(Option<f32>),
    /// HTTP status other than 200.
    Rejected(u16),
    /// No HTTP status at all.
    Failed,
}

pub struct TelemetryClient<R, S, C, H, T, P: PwmPort, FC: Clock> {
    connection: ConnectionManager<R, S, C>,
    store: S,
    clock: C,
    http: H,
    sensor: T,
    fan: Arc<FanController<P, FC>>,
    state: Arc<DeviceState>,
    interval_ms: u32,
}

impl<R, S, C, H, T, P, FC> TelemetryClient<R, S, C, H, T, P, FC>
where
    R: RadioPort,
    S: ConfigStore + Clone,
    C: Clock + Clone,
    H: HttpTransport,
    T: ClimateSensor,
    P: PwmPort,
    FC: Clock,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        radio: R,
        store: S,
        clock: C,
        http: H,
        sensor: T,
        fan: Arc<FanController<P, FC>>,
        state: Arc<DeviceState>,
        config: &DeviceConfig,
    ) -> Self {
        let connection = ConnectionManager::new(radio, store.clone(), clock.clone(), state.clone(), config);
        Self {
            connection,
            store,
            clock,
            http,
            sensor,
            fan,
            state,
            interval_ms: config.telemetry_interval_ms,
        }
    }

    pub fn connection(&self) -> &ConnectionManager<R, S, C> {
        &self.connection
    }

    /// Run forever at the configured cadence.
    pub fn run(&mut self, sink: &mut impl EventSink) -> ! {
        loop {
            self.cycle(sink);
        }
    }

    /// One full iteration, including the trailing sleep.
    pub fn cycle(&mut self, sink: &mut impl EventSink) -> CycleOutcome {
        self.connection.ensure_connected(sink);
        let outcome = self.exchange(sink);
        self.clock.sleep_ms(self.interval_ms);
        outcome
    }

    /// Sample, POST and apply the response. Assumes the link is up.
    pub fn exchange(&mut self, sink: &mut impl EventSink) -> CycleOutcome {
        let url = self.store.get_str(CONFIG_NAMESPACE, SERVER_KEY).unwrap_or_default();
        if url.is_empty() {
            return CycleOutcome::Skipped;
        }

        let record = self.sample();
        let body = record.encode();

        match self.http.post(&url, CONTENT_TYPE, &body) {
            Ok(response) if response.status == 200 => {
                let setpoint = decode_setpoint(&response.body).map(|p| self.fan.set_power(p));
                self.state.record_heartbeat(self.clock.now_ms());
                sink.emit(&DeviceEvent::HeartbeatAccepted { setpoint });
                CycleOutcome::Accepted(setpoint)
            }
            Ok(response) => {
                sink.emit(&DeviceEvent::HeartbeatRejected {
                    status: response.status,
                });
                CycleOutcome::Rejected(response.status)
            }
            Err(error) => {
                sink.emit(&DeviceEvent::HeartbeatFailed { error });
                CycleOutcome::Failed
            }
        }
    }

    /// Read the sensor and drain the tachometer, publishing both into shared state.
    pub fn sample(&mut self) -> TelemetryRecord {
        let (temperature, humidity) = match self.sensor.read() {
            Ok(r) => (r.temperature_c, r.humidity_pct),
            Err(e) => {
                log::debug!("climate sensor read failed: {}", e);
                (f32::NAN, f32::NAN)
            }
        };
        let fan_rpm = self.fan.sample_rpm();
        self.state.publish_readings(temperature, humidity, fan_rpm);
        TelemetryRecord {
            temperature,
            humidity,
            fan_rpm,
        }
    }
}
