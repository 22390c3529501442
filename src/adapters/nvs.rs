//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`ConfigStore`] over namespaced string keys. The core only
//! reads; `put_str` / `remove` / `clear_namespace` exist for the serial
//! console and provisioning code, which write the same keys the
//! connection and telemetry units poll.
//!
//! - **`target_os = "espidf"`**: `EspNvs` handles opened per call on the
//!   default NVS partition. Opening per call means a write from the console
//!   is visible to the next read from the telemetry task.
//! - **all other targets**: an in-memory map behind a `Mutex`.

use core::fmt;

use log::info;

use crate::app::ports::ConfigStore;

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;
#[cfg(not(target_os = "espidf"))]
use std::sync::Mutex;

#[cfg(target_os = "espidf")]
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs};

/// Longest string value the store hands back (NVS limits strings to 4000 bytes).
#[cfg(target_os = "espidf")]
const MAX_VALUE_LEN: usize = 4000;

/// NVS namespace names are limited to 15 characters.
const MAX_NAMESPACE_LEN: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Namespace name is empty or longer than 15 bytes.
    InvalidNamespace,
    /// The flash backend rejected the operation.
    IoError,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNamespace => write!(f, "namespace must be 1-15 bytes"),
            Self::IoError => write!(f, "NVS I/O error"),
        }
    }
}

impl std::error::Error for StorageError {}

fn check_namespace(namespace: &str) -> Result<(), StorageError> {
    if namespace.is_empty() || namespace.len() > MAX_NAMESPACE_LEN {
        return Err(StorageError::InvalidNamespace);
    }
    Ok(())
}

pub struct NvsStore {
    #[cfg(target_os = "espidf")]
    partition: EspDefaultNvsPartition,
    #[cfg(not(target_os = "espidf"))]
    entries: Mutex<HashMap<String, String>>,
}

#[cfg(target_os = "espidf")]
impl NvsStore {
    pub fn new(partition: EspDefaultNvsPartition) -> Self {
        info!("NvsStore: ESP-IDF default partition");
        Self { partition }
    }

    fn open(&self, namespace: &str) -> Result<EspNvs<esp_idf_svc::nvs::NvsDefault>, StorageError> {
        check_namespace(namespace)?;
        EspNvs::new(self.partition.clone(), namespace, true).map_err(|e| {
            log::warn!("NVS: open '{}' failed: {:?}", namespace, e);
            StorageError::IoError
        })
    }

    pub fn put_str(&self, namespace: &str, key: &str, value: &str) -> Result<(), StorageError> {
        let mut nvs = self.open(namespace)?;
        nvs.set_str(key, value).map_err(|_| StorageError::IoError)
    }

    /// Returns whether the key existed.
    pub fn remove(&self, namespace: &str, key: &str) -> Result<bool, StorageError> {
        let mut nvs = self.open(namespace)?;
        nvs.remove(key).map_err(|_| StorageError::IoError)
    }

    pub fn clear_namespace(&self, namespace: &str, keys: &[&str]) -> Result<(), StorageError> {
        let mut nvs = self.open(namespace)?;
        for key in keys {
            nvs.remove(key).map_err(|_| StorageError::IoError)?;
        }
        info!("NVS: cleared '{}'", namespace);
        Ok(())
    }
}

#[cfg(target_os = "espidf")]
impl ConfigStore for NvsStore {
    fn get_str(&self, namespace: &str, key: &str) -> Option<String> {
        let nvs = self.open(namespace).ok()?;
        let mut buf = vec![0u8; MAX_VALUE_LEN];
        match nvs.get_str(key, &mut buf) {
            Ok(value) => value.map(str::to_owned),
            Err(e) => {
                log::debug!("NVS: read {}/{} failed: {:?}", namespace, key, e);
                None
            }
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl NvsStore {
    pub fn new() -> Self {
        info!("NvsStore: simulation backend");
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panicking writer cannot leave a HashMap<String, String> half-updated.
        self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub fn put_str(&self, namespace: &str, key: &str, value: &str) -> Result<(), StorageError> {
        check_namespace(namespace)?;
        self.entries()
            .insert(Self::composite_key(namespace, key), value.to_owned());
        Ok(())
    }

    /// Returns whether the key existed.
    pub fn remove(&self, namespace: &str, key: &str) -> Result<bool, StorageError> {
        check_namespace(namespace)?;
        Ok(self.entries().remove(&Self::composite_key(namespace, key)).is_some())
    }

    pub fn clear_namespace(&self, namespace: &str, keys: &[&str]) -> Result<(), StorageError> {
        check_namespace(namespace)?;
        let mut entries = self.entries();
        for key in keys {
            entries.remove(&Self::composite_key(namespace, key));
        }
        info!("NVS(sim): cleared '{}'", namespace);
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for NvsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_os = "espidf"))]
impl ConfigStore for NvsStore {
    fn get_str(&self, namespace: &str, key: &str) -> Option<String> {
        self.entries().get(&Self::composite_key(namespace, key)).cloned()
    }
}
