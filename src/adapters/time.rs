//! ESP32 time adapter.
//!
//! Implements [`Clock`] with 32-bit wrapping uptime counters.
//!
//! - **`target_os = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer. Sleeping goes through `std::thread::sleep`,
//!   which ESP-IDF maps onto `vTaskDelay`, yielding to other FreeRTOS tasks.
//! - **`not(target_os = "espidf")`**: uses a process-wide `std::time::Instant`
//!   epoch so every adapter instance agrees on "now" (heartbeat stamps are
//!   written by one thread and compared by another).

use std::time::Duration;

use crate::app::ports::Clock;

#[cfg(not(target_os = "espidf"))]
static BOOT: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();

/// Time adapter for the ESP32-S3 platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct Esp32TimeAdapter;

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        #[cfg(not(target_os = "espidf"))]
        BOOT.get_or_init(std::time::Instant::now);
        Self
    }

    /// Microseconds since boot (monotonic, 64-bit).
    #[cfg(target_os = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since boot (monotonic, 64-bit).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        BOOT.get_or_init(std::time::Instant::now).elapsed().as_micros() as u64
    }
}

impl Clock for Esp32TimeAdapter {
    fn now_ms(&self) -> u32 {
        (self.uptime_us() / 1000) as u32
    }

    fn now_us(&self) -> u32 {
        self.uptime_us() as u32
    }

    fn sleep_ms(&self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
