//! Integration Tests für die Taster-Abfrage

mod common;
use common::*;

use embassy_futures::block_on;
use embassy_time::Duration;
use fenster_core::{
    ButtonEdge, EdgeDetector, HardwareIoError, InputWatcher, LinkController, LinkState, Watcher,
};

const HIGH: bool = true;
const LOW: bool = false;

fn poll_times<W: Watcher>(watcher: &mut W, times: usize) {
    for _ in 0..times {
        block_on(watcher.resume()).unwrap();
    }
}

// ============================================================================
// Tests: Flankenerkennung
// ============================================================================

#[test]
fn test_edges_from_level_sequence() {
    let mut edges = EdgeDetector::new();
    let seen: Vec<ButtonEdge> = [HIGH, HIGH, LOW, LOW, HIGH]
        .into_iter()
        .map(|level| edges.update(level))
        .collect();

    assert_eq!(
        seen,
        [
            ButtonEdge::None,
            ButtonEdge::None,
            ButtonEdge::Pressed,
            ButtonEdge::None,
            ButtonEdge::Released,
        ]
    );
}

#[test]
fn test_held_button_toggles_once() {
    let mut link = LinkController::new(MockPeripheral::new(), TEST_CREDENTIALS);
    let mut watcher = InputWatcher::new(
        &mut link,
        ScriptedPin::new(&[HIGH, LOW]),
        RecordingSink::default(),
    );

    // Pin bleibt danach auf Low
    poll_times(&mut watcher, 10);
    drop(watcher);

    assert_eq!(link.peripheral().count("connect"), 1);
    assert_eq!(link.state(), LinkState::Connected);
}

#[test]
fn test_greeting_published_first() {
    let mut link = LinkController::new(MockPeripheral::new(), TEST_CREDENTIALS);
    let mut watcher =
        InputWatcher::new(&mut link, ScriptedPin::new(&[HIGH]), RecordingSink::default());

    poll_times(&mut watcher, 3);

    let messages = &watcher.sink().messages;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text(), "LED Controller\nWifi Connected:\n     false");
    assert_eq!(messages[0].x(), 23);
}

// ============================================================================
// Tests: Umschalten
// ============================================================================

#[test]
fn test_press_connects_when_disconnected() {
    let mut link = LinkController::new(MockPeripheral::new(), TEST_CREDENTIALS);
    let mut watcher = InputWatcher::new(
        &mut link,
        ScriptedPin::new(&[HIGH, LOW, HIGH]),
        RecordingSink::default(),
    );

    poll_times(&mut watcher, 3);

    let sink = watcher.sink();
    assert_eq!(sink.messages.len(), 2);
    assert_eq!(sink.last_text(), Some("Connected to 46C992"));
    assert_eq!(sink.messages[1].x(), 8);
    assert_eq!(watcher.link().state(), LinkState::Connected);
}

#[test]
fn test_press_reports_failed_connect() {
    let mut peripheral = MockPeripheral::new();
    peripheral.connect_failures = 1;
    let mut link = LinkController::new(peripheral, TEST_CREDENTIALS);
    let mut watcher = InputWatcher::new(
        &mut link,
        ScriptedPin::new(&[HIGH, LOW]),
        RecordingSink::default(),
    );

    poll_times(&mut watcher, 2);

    assert_eq!(watcher.sink().last_text(), Some("Unable to connect WiFi"));
    assert_eq!(watcher.link().state(), LinkState::ConnectFailed);
}

#[test]
fn test_press_disconnects_when_connected() {
    let mut link = LinkController::new(MockPeripheral::connected(), TEST_CREDENTIALS);
    block_on(link.query_status());
    let mut watcher = InputWatcher::new(
        &mut link,
        ScriptedPin::new(&[HIGH, LOW]),
        RecordingSink::default(),
    );

    poll_times(&mut watcher, 2);

    let sink = watcher.sink();
    assert_eq!(
        sink.messages[0].text(),
        "LED Controller\nWifi Connected:\n     true"
    );
    assert_eq!(sink.last_text(), Some("Disconnected Wifi"));
    assert_eq!(sink.messages[1].x(), 16);
    assert_eq!(watcher.link().state(), LinkState::Disconnected);
}

#[test]
fn test_press_reports_failed_disconnect() {
    let mut peripheral = MockPeripheral::connected();
    peripheral.disconnect_ignored = true;
    let mut link = LinkController::new(peripheral, TEST_CREDENTIALS);
    block_on(link.query_status());
    let mut watcher = InputWatcher::new(
        &mut link,
        ScriptedPin::new(&[HIGH, LOW]),
        RecordingSink::default(),
    );

    poll_times(&mut watcher, 2);

    assert_eq!(watcher.sink().last_text(), Some("Unable to disconnect WiFi"));
    assert_eq!(watcher.sink().messages[1].x(), 0);
    assert_eq!(watcher.link().state(), LinkState::Connected);
}

#[test]
fn test_second_press_toggles_back() {
    let mut link = LinkController::new(MockPeripheral::new(), TEST_CREDENTIALS);
    let mut watcher = InputWatcher::new(
        &mut link,
        ScriptedPin::new(&[HIGH, LOW, HIGH, LOW, HIGH]),
        RecordingSink::default(),
    );

    poll_times(&mut watcher, 5);

    let texts: Vec<&str> = watcher.sink().messages.iter().map(|m| m.text()).collect();
    assert_eq!(texts[1..], ["Connected to 46C992", "Disconnected Wifi"]);
}

// ============================================================================
// Tests: Scheduler-Schnittstelle
// ============================================================================

#[test]
fn test_resume_requests_poll_interval() {
    let mut link = LinkController::new(MockPeripheral::new(), TEST_CREDENTIALS);
    let mut watcher =
        InputWatcher::new(&mut link, ScriptedPin::new(&[HIGH]), RecordingSink::default());

    let request = block_on(watcher.resume()).unwrap();
    assert_eq!(request.duration(), Duration::from_millis(100));

    let mut slow = watcher.with_interval(Duration::from_millis(250));
    let request = block_on(slow.resume()).unwrap();
    assert_eq!(request.duration(), Duration::from_millis(250));
}

#[test]
fn test_pin_error_is_bus_fault() {
    let mut link = LinkController::new(MockPeripheral::new(), TEST_CREDENTIALS);
    let mut pin = ScriptedPin::new(&[HIGH]);
    pin.fail = true;
    let mut watcher = InputWatcher::new(&mut link, pin, RecordingSink::default());

    assert_eq!(block_on(watcher.poll_once()), Err(HardwareIoError::Bus));
}
