//! WiFi station-mode adapter.
//!
//! Implements [`RadioPort`], the hexagonal boundary for network
//! connectivity. Each `associate` call is one attempt: configure, connect,
//! wait for the netif to come up. Retry pacing belongs to the
//! `ConnectionManager`, not here.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via `BlockingWifi<EspWifi>`.
//! - **all other targets**: simulation for host-side tests.

use log::{info, warn};

use crate::app::ports::{ConnectivityError, RadioPort};

#[cfg(target_os = "espidf")]
use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};
#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

pub(crate) fn validate_ssid(ssid: &str) -> Result<heapless::String<32>, ConnectivityError> {
    if ssid.is_empty() || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    let mut out = heapless::String::new();
    out.push_str(ssid).map_err(|_| ConnectivityError::InvalidSsid)?;
    Ok(out)
}

/// Empty means an open network; otherwise WPA2 needs 8-64 bytes.
pub(crate) fn validate_password(password: &str) -> Result<heapless::String<64>, ConnectivityError> {
    if !password.is_empty() && password.len() < 8 {
        return Err(ConnectivityError::InvalidPassword);
    }
    let mut out = heapless::String::new();
    out.push_str(password).map_err(|_| ConnectivityError::InvalidPassword)?;
    Ok(out)
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter (ESP-IDF)
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub struct WifiAdapter {
    wifi: BlockingWifi<EspWifi<'static>>,
    started: bool,
}

#[cfg(target_os = "espidf")]
impl WifiAdapter {
    pub fn new(wifi: BlockingWifi<EspWifi<'static>>) -> Self {
        Self { wifi, started: false }
    }

    fn try_associate(
        &mut self,
        ssid: heapless::String<32>,
        password: heapless::String<64>,
    ) -> anyhow::Result<()> {
        let auth_method = if password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPAWPA2Personal
        };

        if self.started {
            let _ = self.wifi.disconnect();
        }
        self.wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid,
            password,
            auth_method,
            ..Default::default()
        }))?;
        if !self.started {
            self.wifi.start()?;
            self.started = true;
        }
        self.wifi.connect()?;
        self.wifi.wait_netif_up()?;
        Ok(())
    }
}

#[cfg(target_os = "espidf")]
impl RadioPort for WifiAdapter {
    fn is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false) && self.wifi.is_up().unwrap_or(false)
    }

    fn associate(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        let ssid_buf = validate_ssid(ssid)?;
        let password_buf = validate_password(password)?;
        info!("WiFi: associating with '{}'", ssid);
        self.try_associate(ssid_buf, password_buf).map_err(|e| {
            warn!("WiFi: association failed: {:#}", e);
            ConnectivityError::ConnectionFailed
        })
    }
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter (simulation)
// ───────────────────────────────────────────────────────────────

/// Simulated station. Associates with the one access point it is told
/// about; anything else fails like an out-of-range AP.
#[cfg(not(target_os = "espidf"))]
pub struct WifiAdapter {
    access_point: Option<(heapless::String<32>, heapless::String<64>)>,
    connected: bool,
    attempts: u32,
}

#[cfg(not(target_os = "espidf"))]
impl WifiAdapter {
    pub fn new() -> Self {
        Self {
            access_point: None,
            connected: false,
            attempts: 0,
        }
    }

    /// Make an access point with these credentials reachable.
    pub fn with_access_point(mut self, ssid: &str, password: &str) -> Self {
        if let (Ok(s), Ok(p)) = (validate_ssid(ssid), validate_password(password)) {
            self.access_point = Some((s, p));
        }
        self
    }

    /// Simulate the AP going away.
    pub fn drop_link(&mut self) {
        if self.connected {
            info!("WiFi(sim): link lost");
        }
        self.connected = false;
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_os = "espidf"))]
impl RadioPort for WifiAdapter {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn associate(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        let ssid = validate_ssid(ssid)?;
        let password = validate_password(password)?;
        self.attempts = self.attempts.wrapping_add(1);

        match &self.access_point {
            Some((ap_ssid, ap_password)) if *ap_ssid == ssid && *ap_password == password => {
                self.connected = true;
                info!("WiFi(sim): connected to '{}' (attempt {})", ssid, self.attempts);
                Ok(())
            }
            _ => {
                self.connected = false;
                warn!("WiFi(sim): '{}' not reachable (attempt {})", ssid, self.attempts);
                Err(ConnectivityError::ConnectionFailed)
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
