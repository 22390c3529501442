//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements     | Connects to                   |
//! |-------------|----------------|-------------------------------|
//! | `http`      | HttpTransport  | ESP-IDF HTTP client           |
//! | `log_sink`  | EventSink      | Serial log output             |
//! | `nvs`       | ConfigStore    | NVS / in-memory store         |
//! | `time`      | Clock          | ESP32 high-resolution timer   |
//! | `wifi`      | RadioPort      | ESP-IDF WiFi STA              |
//! | `device_id` | -              | eFuse factory MAC             |
//!
//! Each adapter has an ESP-IDF branch and a host simulation branch.

pub mod device_id;
pub mod http;
pub mod log_sink;
pub mod nvs;
pub mod time;
pub mod wifi;
