//! ConnectionManager against mock radio, store and clock.

use std::sync::{Arc, Mutex};

use smartac::adapters::log_sink::RepeatFolder;
use smartac::app::connection::{
    ConnectionManager, ConnectionState, PASSWORD_KEY, SSID_KEY, WIFI_NAMESPACE,
};
use smartac::app::events::DeviceEvent;
use smartac::config::DeviceConfig;
use smartac::state::DeviceState;

use crate::mock_hw::{ManualClock, MockRadio, MockStore, RecordingSink};

struct Rig {
    manager: ConnectionManager<MockRadio, MockStore, ManualClock>,
    radio: MockRadio,
    store: MockStore,
    clock: ManualClock,
    state: Arc<DeviceState>,
    sink: RecordingSink,
}

fn rig(radio: MockRadio) -> Rig {
    let store = MockStore::new();
    let clock = ManualClock::new();
    let state = Arc::new(DeviceState::new());
    let manager = ConnectionManager::new(
        radio.clone(),
        store.clone(),
        clock.clone(),
        state.clone(),
        &DeviceConfig::default(),
    );
    Rig {
        manager,
        radio,
        store,
        clock,
        state,
        sink: RecordingSink::new(),
    }
}

fn store_credentials(store: &MockStore, ssid: &str, password: &str) {
    store.put(WIFI_NAMESPACE, SSID_KEY, ssid);
    store.put(WIFI_NAMESPACE, PASSWORD_KEY, password);
}

#[test]
fn connected_link_returns_without_side_effects() {
    let mut r = rig(MockRadio::new());
    r.radio.set_link(true);
    r.state.set_wifi_connected(true);

    r.manager.ensure_connected(&mut r.sink);

    assert!(r.sink.events.is_empty());
    assert!(r.clock.sleeps().is_empty());
    assert!(r.radio.attempts().is_empty());
    assert_eq!(r.store.reads_of(WIFI_NAMESPACE, SSID_KEY), 0);
    assert_eq!(r.manager.link_state(), ConnectionState::Connected);
}

#[test]
fn first_attempt_succeeds() {
    let mut r = rig(MockRadio::with_access_point("HomeNet", "hunter22"));
    store_credentials(&r.store, "HomeNet", "hunter22");

    r.manager.ensure_connected(&mut r.sink);

    assert!(r.state.wifi_connected());
    assert_eq!(r.manager.link_state(), ConnectionState::Connected);
    assert_eq!(
        r.sink.events,
        vec![
            DeviceEvent::Connecting { ssid: "HomeNet".into() },
            DeviceEvent::Connected { ssid: "HomeNet".into() },
        ]
    );
    assert!(r.clock.sleeps().is_empty());
}

#[test]
fn waits_for_credentials_every_two_seconds() {
    let mut r = rig(MockRadio::with_access_point("HomeNet", "hunter22"));
    let store = r.store.clone();
    r.clock.on_sleep(move |n| {
        if n == 3 {
            store_credentials(&store, "HomeNet", "hunter22");
        }
    });

    r.manager.ensure_connected(&mut r.sink);

    assert_eq!(r.clock.sleeps(), vec![2000, 2000, 2000]);
    assert_eq!(
        r.sink.count(|e| matches!(e, DeviceEvent::WaitingForCredentials)),
        3
    );
    assert!(r.state.wifi_connected());
}

#[test]
fn open_network_uses_empty_password() {
    let mut r = rig(MockRadio::with_access_point("Cafe", ""));
    r.store.put(WIFI_NAMESPACE, SSID_KEY, "Cafe");

    r.manager.ensure_connected(&mut r.sink);

    assert_eq!(r.radio.attempts(), vec![("Cafe".to_string(), String::new())]);
    assert!(r.state.wifi_connected());
}

#[test]
fn password_edit_takes_effect_on_next_retry() {
    let mut r = rig(MockRadio::with_access_point("HomeNet", "correct-horse"));
    store_credentials(&r.store, "HomeNet", "wrong-pass");
    let store = r.store.clone();
    r.clock.on_sleep(move |n| {
        if n == 2 {
            store.put(WIFI_NAMESPACE, PASSWORD_KEY, "correct-horse");
        }
    });

    r.manager.ensure_connected(&mut r.sink);

    assert_eq!(r.clock.sleeps(), vec![1000, 1000]);
    let passwords: Vec<String> = r.radio.attempts().into_iter().map(|(_, p)| p).collect();
    assert_eq!(passwords, vec!["wrong-pass", "wrong-pass", "correct-horse"]);
    assert_eq!(
        r.sink.count(|e| matches!(e, DeviceEvent::Connecting { .. })),
        3
    );
    assert!(r.state.wifi_connected());
}

#[test]
fn failing_retry_loop_folds_into_one_counted_line() {
    let mut r = rig(MockRadio::with_access_point("HomeNet", "hunter22"));
    store_credentials(&r.store, "HomeNet", "not-the-password");
    let store = r.store.clone();
    r.clock.on_sleep(move |n| {
        if n == 4 {
            store.put(WIFI_NAMESPACE, PASSWORD_KEY, "hunter22");
        }
    });

    r.manager.ensure_connected(&mut r.sink);

    let mut folder = RepeatFolder::new();
    let lines: Vec<String> = r.sink.events.iter().map(|e| folder.fold(e.to_string())).collect();
    assert_eq!(
        lines,
        vec![
            "Connecting to WiFi: HomeNet",
            "Connecting to WiFi: HomeNet (2)",
            "Connecting to WiFi: HomeNet (3)",
            "Connecting to WiFi: HomeNet (4)",
            "Connecting to WiFi: HomeNet (5)",
            "WiFi connected: HomeNet",
        ]
    );
}

#[test]
fn cleared_ssid_falls_back_to_waiting() {
    let mut r = rig(MockRadio::with_access_point("HomeNet", "hunter22"));
    store_credentials(&r.store, "Elsewhere", "hunter22");
    let store = r.store.clone();
    r.clock.on_sleep(move |n| match n {
        1 => store.clear(WIFI_NAMESPACE, SSID_KEY),
        3 => store.put(WIFI_NAMESPACE, SSID_KEY, "HomeNet"),
        _ => {}
    });

    r.manager.ensure_connected(&mut r.sink);

    // one failed association, two credential polls, then success
    assert_eq!(r.clock.sleeps(), vec![1000, 2000, 2000]);
    assert_eq!(
        r.sink.count(|e| matches!(e, DeviceEvent::WaitingForCredentials)),
        2
    );
    assert!(r.state.wifi_connected());
}

#[test]
fn link_drop_clears_flag_while_retrying() {
    let mut r = rig(MockRadio::with_access_point("HomeNet", "hunter22"));
    store_credentials(&r.store, "HomeNet", "hunter22");
    r.manager.ensure_connected(&mut r.sink);
    assert!(r.state.wifi_connected());

    // AP goes away; comes back after two retries.
    r.radio.set_link(false);
    r.radio.set_access_point("HomeNet", "changed-on-router");
    let seen_during_retry = Arc::new(Mutex::new(Vec::new()));
    let (radio, state, seen) = (r.radio.clone(), r.state.clone(), seen_during_retry.clone());
    r.clock.on_sleep(move |n| {
        seen.lock().unwrap().push(state.wifi_connected());
        if n == 2 {
            radio.set_access_point("HomeNet", "hunter22");
        }
    });

    r.manager.ensure_connected(&mut r.sink);

    assert_eq!(*seen_during_retry.lock().unwrap(), vec![false, false]);
    assert!(r.state.wifi_connected());
    assert_eq!(r.radio.attempts().len(), 4);
}
