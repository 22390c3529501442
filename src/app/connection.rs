//! Wi-Fi connection state machine.
//!
//! [`ConnectionManager::ensure_connected`] blocks until the radio reports an
//! associated link. It may block forever: there is no retry cap and no
//! backoff growth.
//!
//! ```text
//!   NoCredentials ──(SSID found)──▶ Connecting ──(link up)──▶ Connected
//!        ▲                              │   ▲                     │
//!        └──────(SSID cleared)──────────┘   └──────(link drop)────┘
//! ```
//!
//! Credentials are re-read from the store before every attempt, so an edit
//! made through the console takes effect on the next retry without a reboot.
//! Missing credentials, a wrong password and an absent AP are all retried
//! identically.

use std::sync::Arc;

use super::events::DeviceEvent;
use super::ports::{Clock, ConfigStore, EventSink, RadioPort};
use crate::config::DeviceConfig;
use crate::state::DeviceState;

pub const WIFI_NAMESPACE: &str = "wifi";
pub const SSID_KEY: &str = "ssid";
pub const PASSWORD_KEY: &str = "passwd";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    NoCredentials,
    Connecting,
    Connected,
}

/// SSID and password as currently stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub ssid: String,
    pub password: String,
}

impl Credentials {
    /// `None` while no SSID is configured; an empty password means an open network.
    pub fn load(store: &impl ConfigStore) -> Option<Self> {
        let ssid = store.get_str(WIFI_NAMESPACE, SSID_KEY).unwrap_or_default();
        if ssid.is_empty() {
            return None;
        }
        let password = store.get_str(WIFI_NAMESPACE, PASSWORD_KEY).unwrap_or_default();
        Some(Self { ssid, password })
    }
}

pub struct ConnectionManager<R, S, C> {
    radio: R,
    store: S,
    clock: C,
    state: Arc<DeviceState>,
    link: ConnectionState,
    credential_poll_ms: u32,
    retry_ms: u32,
}

impl<R: RadioPort, S: ConfigStore, C: Clock> ConnectionManager<R, S, C> {
    pub fn new(radio: R, store: S, clock: C, state: Arc<DeviceState>, config: &DeviceConfig) -> Self {
        Self {
            radio,
            store,
            clock,
            state,
            link: ConnectionState::NoCredentials,
            credential_poll_ms: config.credential_poll_interval_ms,
            retry_ms: config.association_retry_interval_ms,
        }
    }

    /// State reached by the last call to [`ensure_connected`](Self::ensure_connected).
    pub fn link_state(&self) -> ConnectionState {
        self.link
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    /// Return once the radio reports an active link.
    ///
    /// Already connected: returns immediately with no side effect. Otherwise
    /// clears `wifi_connected`, runs the retry loop, and sets it again on
    /// success.
    pub fn ensure_connected(&mut self, sink: &mut impl EventSink) {
        if self.radio.is_connected() {
            self.link = ConnectionState::Connected;
            return;
        }

        self.state.set_wifi_connected(false);
        self.link = ConnectionState::NoCredentials;

        loop {
            match self.link {
                ConnectionState::NoCredentials => {
                    if Credentials::load(&self.store).is_some() {
                        self.link = ConnectionState::Connecting;
                    } else {
                        sink.emit(&DeviceEvent::WaitingForCredentials);
                        self.clock.sleep_ms(self.credential_poll_ms);
                    }
                }
                ConnectionState::Connecting => {
                    if self.radio.is_connected() {
                        self.link = ConnectionState::Connected;
                        continue;
                    }
                    // Reload on each retry; the SSID may have been edited or cleared.
                    let Some(creds) = Credentials::load(&self.store) else {
                        self.link = ConnectionState::NoCredentials;
                        continue;
                    };
                    self.attempt(&creds, sink);
                }
                ConnectionState::Connected => {
                    self.state.set_wifi_connected(true);
                    return;
                }
            }
        }
    }

    fn attempt(&mut self, creds: &Credentials, sink: &mut impl EventSink) {
        sink.emit(&DeviceEvent::Connecting {
            ssid: creds.ssid.clone(),
        });
        match self.radio.associate(&creds.ssid, &creds.password) {
            Ok(()) if self.radio.is_connected() => {
                sink.emit(&DeviceEvent::Connected {
                    ssid: creds.ssid.clone(),
                });
                self.link = ConnectionState::Connected;
            }
            Ok(()) => self.clock.sleep_ms(self.retry_ms),
            Err(error) => {
                // Only the attempt line goes to the sink so retries fold into one counter.
                log::debug!("association with {} failed: {}", creds.ssid, error);
                self.clock.sleep_ms(self.retry_ms);
            }
        }
    }
}
