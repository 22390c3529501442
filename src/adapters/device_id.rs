//! Factory MAC address.
//!
//! Printed in the boot banner so a unit on the bench can be matched to its
//! DHCP lease. The MAC is burned into eFuse and stable across reboots.

use core::fmt::Write;

pub type MacAddress = [u8; 6];

/// `AA:BB:CC:DD:EE:FF`, 17 chars.
pub type MacString = heapless::String<17>;

/// Base MAC burned into eFuse at manufacture. Zeroes if the read fails.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac = MacAddress::default();
    // SAFETY: the buffer is exactly the 6 bytes the call writes.
    let rc = unsafe { esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr()) };
    if rc != esp_idf_svc::sys::ESP_OK as i32 {
        log::warn!("device_id: eFuse MAC read failed (rc={})", rc);
    }
    mac
}

/// Host builds have no eFuse; every run reports the same address.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

/// Colon-separated uppercase hex.
pub fn format_mac(mac: &MacAddress) -> MacString {
    let mut s = MacString::new();
    let _ = write!(
        s,
        "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
        mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    );
    s
}
