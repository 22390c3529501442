//! SmartAC Firmware: Main Entry Point
//!
//! Two control units share one [`DeviceState`]:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  WifiAdapter   HttpClientAdapter   NvsStore   Esp32Time      │
//! │  (RadioPort)   (HttpTransport)     (Config)   (Clock)        │
//! │  Sht31         LedcFanPwm          Ws2812Strip LogEventSink  │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  core 0: TelemetryClient ─┬─ ConnectionManager               │
//! │                           └─ FanController ◀── tach ISR      │
//! │  main:   StatusIndicator  (reads DeviceState only)           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use esp_idf_hal::{
    delay::FreeRtos,
    i2c::{I2cConfig, I2cDriver},
    prelude::*,
};
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    nvs::EspDefaultNvsPartition,
    wifi::{BlockingWifi, EspWifi},
};
use log::info;

use smartac::adapters::device_id;
use smartac::adapters::http::HttpClientAdapter;
use smartac::adapters::log_sink::LogEventSink;
use smartac::adapters::nvs::NvsStore;
use smartac::adapters::time::Esp32TimeAdapter;
use smartac::adapters::wifi::WifiAdapter;
use smartac::app::ports::Clock;
use smartac::app::status::StatusIndicator;
use smartac::app::telemetry::TelemetryClient;
use smartac::config::DeviceConfig;
use smartac::drivers::fan::{FanController, PulseCounter};
use smartac::drivers::fan_pwm::{LedcFanPwm, LEDC_CH_FAN};
use smartac::drivers::hw_init;
use smartac::drivers::task_pin::{spawn_on_core, Core};
use smartac::drivers::ws2812::Ws2812Strip;
use smartac::pins;
use smartac::sensors::sht31::Sht31;
use smartac::state::DeviceState;

/// Same stack the telemetry task has always had.
const TELEMETRY_STACK_BYTES: usize = 8192;
const TELEMETRY_PRIORITY: u8 = 1;
const HTTP_TIMEOUT: Duration = Duration::from_secs(5);

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  SmartAC v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");
    info!("MAC Address: {}", device_id::format_mac(&device_id::read_mac()));

    let config = DeviceConfig::default();
    let peripherals = Peripherals::take().context("peripherals already taken")?;
    let sys_loop = EspSystemEventLoop::take()?;
    let nvs_partition = EspDefaultNvsPartition::take()?;

    // ── 2. Persistent configuration ───────────────────────────
    let store = Arc::new(NvsStore::new(nvs_partition.clone()));

    // ── 3. Shared state + fan ─────────────────────────────────
    let clock = Esp32TimeAdapter::new();
    let state = Arc::new(DeviceState::new());
    let pulses = Arc::new(PulseCounter::new(clock.now_us()));

    hw_init::init_fan_pwm(config.fan_pwm_freq_hz)?;
    hw_init::init_tachometer(pulses.clone())?;
    let fan = Arc::new(FanController::new(
        LedcFanPwm::new(LEDC_CH_FAN),
        clock,
        pulses,
        state.clone(),
        config.pulses_per_revolution,
    ));

    // ── 4. Sensor, radio, transport, LEDs ─────────────────────
    // Peripheral handles must match the GPIO numbers in `pins`.
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio11,
        peripherals.pins.gpio12,
        &I2cConfig::new().baudrate(pins::I2C_BAUD_HZ.Hz()),
    )
    .context("I2C init failed")?;
    let sensor = Sht31::new(i2c, FreeRtos);

    let esp_wifi = EspWifi::new(peripherals.modem, sys_loop.clone(), Some(nvs_partition))?;
    let radio = WifiAdapter::new(BlockingWifi::wrap(esp_wifi, sys_loop)?);
    let http = HttpClientAdapter::new(HTTP_TIMEOUT);

    let strip = Ws2812Strip::new(peripherals.rmt.channel0, peripherals.pins.gpio9)?;

    // ── 5. Telemetry unit (core 0) ────────────────────────────
    let mut telemetry = TelemetryClient::new(
        radio,
        store,
        clock,
        http,
        sensor,
        fan,
        state.clone(),
        &config,
    );
    spawn_on_core(
        Core::Pro,
        TELEMETRY_PRIORITY,
        TELEMETRY_STACK_BYTES,
        "telemetry\0",
        move || {
            let mut sink = LogEventSink::new();
            telemetry.run(&mut sink)
        },
    )
    .context("failed to spawn telemetry task")?;

    // ── 6. Status LED animation (main task) ───────────────────
    info!("Boot complete, entering LED loop");
    let mut status = StatusIndicator::new(strip, clock, state, &config);
    status.run()
}
