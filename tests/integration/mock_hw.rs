//! Mock adapters for integration tests.
//!
//! Every mock is a cheap `Clone` handle over shared state, so a test can
//! hand one copy to the unit under test and keep another to script
//! behaviour and inspect the call history.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use smartac::app::events::DeviceEvent;
use smartac::app::ports::{
    ClimateReading, ClimateSensor, Clock, ConfigStore, ConnectivityError, EventSink, HttpResponse,
    HttpTransport, LedStrip, PwmPort, RadioPort, Rgb, TransportError,
};
use smartac::error::SensorError;

// ── ManualClock ───────────────────────────────────────────────

type SleepHook = Box<dyn FnMut(usize) + Send>;

/// Time only moves when someone sleeps (or the test advances it).
#[derive(Clone, Default)]
pub struct ManualClock {
    now_us: Arc<AtomicU64>,
    sleeps: Arc<Mutex<Vec<u32>>>,
    hook: Arc<Mutex<Option<SleepHook>>>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at_ms(ms: u64) -> Self {
        let clock = Self::default();
        clock.now_us.store(ms * 1000, Ordering::SeqCst);
        clock
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now_us.fetch_add(ms * 1000, Ordering::SeqCst);
    }

    /// Every sleep duration requested so far, in order.
    pub fn sleeps(&self) -> Vec<u32> {
        self.sleeps.lock().unwrap().clone()
    }

    /// Run `f(n)` after the n-th sleep (1-based) returns.
    pub fn on_sleep(&self, f: impl FnMut(usize) + Send + 'static) {
        *self.hook.lock().unwrap() = Some(Box::new(f));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        (self.now_us.load(Ordering::SeqCst) / 1000) as u32
    }

    fn now_us(&self) -> u32 {
        self.now_us.load(Ordering::SeqCst) as u32
    }

    fn sleep_ms(&self, ms: u32) {
        self.advance_ms(u64::from(ms));
        let n = {
            let mut sleeps = self.sleeps.lock().unwrap();
            sleeps.push(ms);
            sleeps.len()
        };
        assert!(n < 10_000, "runaway loop: {n} sleeps");
        if let Some(hook) = self.hook.lock().unwrap().as_mut() {
            hook(n);
        }
    }
}

// ── MockStore ─────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockStore {
    entries: Arc<Mutex<HashMap<(String, String), String>>>,
    reads: Arc<Mutex<Vec<(String, String)>>>,
}

#[allow(dead_code)]
impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, namespace: &str, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert((namespace.into(), key.into()), value.into());
    }

    pub fn clear(&self, namespace: &str, key: &str) {
        self.entries.lock().unwrap().remove(&(namespace.into(), key.into()));
    }

    pub fn reads_of(&self, namespace: &str, key: &str) -> usize {
        self.reads
            .lock()
            .unwrap()
            .iter()
            .filter(|(n, k)| n == namespace && k == key)
            .count()
    }
}

impl ConfigStore for MockStore {
    fn get_str(&self, namespace: &str, key: &str) -> Option<String> {
        self.reads.lock().unwrap().push((namespace.into(), key.into()));
        self.entries
            .lock()
            .unwrap()
            .get(&(namespace.into(), key.into()))
            .cloned()
    }
}

// ── MockRadio ─────────────────────────────────────────────────

/// Associates only with the configured access point.
#[derive(Clone, Default)]
pub struct MockRadio {
    access_point: Arc<Mutex<Option<(String, String)>>>,
    link: Arc<AtomicBool>,
    attempts: Arc<Mutex<Vec<(String, String)>>>,
}

#[allow(dead_code)]
impl MockRadio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_access_point(ssid: &str, password: &str) -> Self {
        let radio = Self::default();
        radio.set_access_point(ssid, password);
        radio
    }

    pub fn set_access_point(&self, ssid: &str, password: &str) {
        *self.access_point.lock().unwrap() = Some((ssid.into(), password.into()));
    }

    pub fn set_link(&self, up: bool) {
        self.link.store(up, Ordering::SeqCst);
    }

    pub fn attempts(&self) -> Vec<(String, String)> {
        self.attempts.lock().unwrap().clone()
    }
}

impl RadioPort for MockRadio {
    fn is_connected(&self) -> bool {
        self.link.load(Ordering::SeqCst)
    }

    fn associate(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        self.attempts.lock().unwrap().push((ssid.into(), password.into()));
        let reachable = self.access_point.lock().unwrap().as_ref()
            == Some(&(ssid.to_owned(), password.to_owned()));
        self.link.store(reachable, Ordering::SeqCst);
        if reachable {
            Ok(())
        } else {
            Err(ConnectivityError::ConnectionFailed)
        }
    }
}

// ── MockHttp ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct PostCall {
    pub url: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Replies from a queue; an empty queue answers `200` with no body.
#[derive(Clone, Default)]
pub struct MockHttp {
    replies: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
    calls: Arc<Mutex<Vec<PostCall>>>,
}

#[allow(dead_code)]
impl MockHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, status: u16, body: &[u8]) {
        self.replies.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: body.to_vec(),
        }));
    }

    pub fn fail(&self, error: TransportError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn calls(&self) -> Vec<PostCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl HttpTransport for MockHttp {
    fn post(
        &mut self,
        url: &str,
        content_type: &str,
        body: &[u8],
    ) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push(PostCall {
            url: url.into(),
            content_type: content_type.into(),
            body: body.to_vec(),
        });
        self.replies.lock().unwrap().pop_front().unwrap_or(Ok(HttpResponse {
            status: 200,
            body: Vec::new(),
        }))
    }
}

// ── MockSensor ────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockSensor {
    reading: Arc<Mutex<Result<ClimateReading, SensorError>>>,
}

#[allow(dead_code)]
impl MockSensor {
    pub fn reading(temperature_c: f32, humidity_pct: f32) -> Self {
        Self {
            reading: Arc::new(Mutex::new(Ok(ClimateReading {
                temperature_c,
                humidity_pct,
            }))),
        }
    }

    pub fn set_failing(&self, error: SensorError) {
        *self.reading.lock().unwrap() = Err(error);
    }
}

impl ClimateSensor for MockSensor {
    fn read(&mut self) -> Result<ClimateReading, SensorError> {
        *self.reading.lock().unwrap()
    }
}

// ── MockPwm ───────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockPwm {
    duties: Arc<Mutex<Vec<u8>>>,
}

#[allow(dead_code)]
impl MockPwm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duties(&self) -> Vec<u8> {
        self.duties.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<u8> {
        self.duties.lock().unwrap().last().copied()
    }
}

impl PwmPort for MockPwm {
    fn set_duty(&self, duty: u8) {
        self.duties.lock().unwrap().push(duty);
    }
}

// ── MockStrip ─────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockStrip {
    frames: Arc<Mutex<Vec<(Vec<Rgb>, u8)>>>,
}

#[allow(dead_code)]
impl MockStrip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<(Vec<Rgb>, u8)> {
        self.frames.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<(Vec<Rgb>, u8)> {
        self.frames.lock().unwrap().last().cloned()
    }
}

impl LedStrip for MockStrip {
    fn write(&mut self, pixels: &[Rgb], brightness: u8) {
        self.frames.lock().unwrap().push((pixels.to_vec(), brightness));
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<DeviceEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&DeviceEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &DeviceEvent) {
        self.events.push(event.clone());
    }
}
