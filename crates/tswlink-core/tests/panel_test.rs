#![allow(clippy::unwrap_used)]
// Integration tests for `Panel` and `PollingCoordinator` against a mock panel.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tswlink_core::snapshot::DEFAULT_MODEL;
use tswlink_core::{CoreError, Panel, PanelConfig, Refresh, ValuePath};

// ── Helpers ─────────────────────────────────────────────────────────

fn device_state() -> serde_json::Value {
    json!({
        "Device": {
            "DeviceInfo": { "Model": "TSW-760", "SerialNumber": "SN1", "MacAddress": "AA:BB" },
            "Display": { "CurrentState": "Awake" }
        },
        "CertificateStore": { "secret": 1 }
    })
}

fn config_for(server: &MockServer, poll_interval: Duration) -> PanelConfig {
    let mut config = PanelConfig::new(Url::parse(&server.uri()).unwrap(), "Lobby Panel");
    config.poll_interval = poll_interval;
    config.timeout = Duration::from_secs(2);
    config
}

async fn mount_state(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/Device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap().len()
}

// ── Refresh and publication ─────────────────────────────────────────

#[tokio::test]
async fn test_refresh_filters_tree_and_derives_identity() {
    let server = MockServer::start().await;
    mount_state(&server, device_state()).await;

    let panel = Panel::new(config_for(&server, Duration::ZERO)).unwrap();
    assert_eq!(panel.refresh().await.unwrap(), Refresh::Published);

    let snap = panel.snapshot();
    assert!(snap.last_fetch_succeeded());
    assert_eq!(snap.identity().model, "TSW-760");
    assert_eq!(snap.identity().serial_number, "SN1");
    assert!(snap.tree().get("CertificateStore").is_none());

    let status: ValuePath = "Device.Display.CurrentState".parse().unwrap();
    assert_eq!(snap.get(&status), Some(&json!("Awake")));
    assert!(snap.fetched_at().is_some());
}

#[tokio::test]
async fn test_missing_model_uses_default() {
    let server = MockServer::start().await;
    mount_state(
        &server,
        json!({ "Device": { "DeviceInfo": { "SerialNumber": "SN1", "MacAddress": "AA:BB" } } }),
    )
    .await;

    let panel = Panel::new(config_for(&server, Duration::ZERO)).unwrap();
    panel.refresh().await.unwrap();

    assert_eq!(panel.snapshot().identity().model, DEFAULT_MODEL);
    assert_eq!(panel.snapshot().identity().serial_number, "SN1");
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_tree() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_state()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Device"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let panel = Panel::new(config_for(&server, Duration::ZERO)).unwrap();
    panel.refresh().await.unwrap();
    let before = panel.snapshot();

    let err = panel.refresh().await.unwrap_err();
    assert!(matches!(err, CoreError::Device { status: 503, .. }));

    let after = panel.snapshot();
    assert!(!after.last_fetch_succeeded());
    assert_eq!(after.tree(), before.tree());
    assert_eq!(after.identity(), before.identity());
    assert!(!panel.coordinator().last_fetch_succeeded());
}

#[tokio::test]
async fn test_malformed_body_is_a_failed_poll() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Device"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
        .mount(&server)
        .await;

    let panel = Panel::new(config_for(&server, Duration::ZERO)).unwrap();
    let err = panel.refresh().await.unwrap_err();

    assert!(matches!(err, CoreError::MalformedResponse { .. }));
    assert!(!panel.snapshot().last_fetch_succeeded());
    assert_eq!(panel.snapshot().identity().model, DEFAULT_MODEL);
}

#[tokio::test]
async fn test_overlapping_refresh_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Device"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(device_state())
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let panel = Panel::new(config_for(&server, Duration::ZERO)).unwrap();
    let (first, second) = tokio::join!(panel.refresh(), panel.refresh());

    let mut outcomes = [first.unwrap(), second.unwrap()];
    outcomes.sort_by_key(|r| *r == Refresh::Skipped);
    assert_eq!(outcomes, [Refresh::Published, Refresh::Skipped]);
}

#[tokio::test]
async fn test_subscribers_see_each_publication() {
    let server = MockServer::start().await;
    mount_state(&server, device_state()).await;

    let panel = Panel::new(config_for(&server, Duration::ZERO)).unwrap();
    let mut updates = panel.subscribe();
    assert!(!updates.current().last_fetch_succeeded());

    panel.refresh().await.unwrap();
    let snap = updates.changed().await.unwrap();
    assert_eq!(snap.identity().model, "TSW-760");
    assert!(updates.current().last_fetch_succeeded());
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_connect_fails_when_first_fetch_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Device"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let panel = Panel::new(config_for(&server, Duration::from_millis(20))).unwrap();
    assert!(panel.connect().await.is_err());

    // No background task was spawned.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_connect_polls_until_disconnect() {
    let server = MockServer::start().await;
    mount_state(&server, device_state()).await;

    let panel = Panel::new(config_for(&server, Duration::from_millis(40))).unwrap();
    panel.connect().await.unwrap();
    assert_eq!(panel.snapshot().identity().model, "TSW-760");

    tokio::time::sleep(Duration::from_millis(200)).await;
    panel.disconnect().await;
    let polled = request_count(&server).await;
    assert!(polled >= 2, "expected periodic polls, saw {polled}");

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(request_count(&server).await, polled);
}

#[tokio::test]
async fn test_reconnect_after_disconnect() {
    let server = MockServer::start().await;
    mount_state(&server, device_state()).await;

    let panel = Panel::new(config_for(&server, Duration::from_millis(40))).unwrap();
    panel.connect().await.unwrap();
    panel.disconnect().await;
    let after_first = request_count(&server).await;

    panel.connect().await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    panel.disconnect().await;
    assert!(request_count(&server).await > after_first + 1);
}

#[tokio::test]
async fn test_connect_twice_then_disconnect() {
    let server = MockServer::start().await;
    mount_state(&server, device_state()).await;

    let panel = Panel::new(config_for(&server, Duration::from_millis(20))).unwrap();
    panel.connect().await.unwrap();
    panel.connect().await.unwrap();

    tokio::time::timeout(Duration::from_secs(2), panel.disconnect())
        .await
        .expect("disconnect should join every refresh task");

    let polled = request_count(&server).await;
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(request_count(&server).await, polled);
}

#[tokio::test]
async fn test_dropping_panel_stops_polling() {
    let server = MockServer::start().await;
    mount_state(&server, device_state()).await;

    let panel = Panel::new(config_for(&server, Duration::from_millis(20))).unwrap();
    panel.connect().await.unwrap();
    drop(panel);

    // Let the task observe the cancellation and finish any in-flight fetch.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let polled = request_count(&server).await;
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(request_count(&server).await, polled);
}

#[tokio::test]
async fn test_snapshot_stream_yields_current_then_updates() {
    use tokio_stream::StreamExt;

    let server = MockServer::start().await;
    mount_state(&server, device_state()).await;

    let panel = Panel::new(config_for(&server, Duration::ZERO)).unwrap();
    let mut stream = panel.subscribe().into_stream();

    let initial = stream.next().await.unwrap();
    assert!(!initial.last_fetch_succeeded());

    panel.refresh().await.unwrap();
    let published = stream.next().await.unwrap();
    assert!(published.last_fetch_succeeded());
    assert_eq!(published.identity().model, "TSW-760");
}

#[tokio::test]
async fn test_probe_returns_identity() {
    let server = MockServer::start().await;
    mount_state(&server, device_state()).await;

    let identity = Panel::probe(&config_for(&server, Duration::ZERO)).await.unwrap();
    assert_eq!(identity.model, "TSW-760");
    assert_eq!(identity.mac_address, "AA:BB");
}

#[tokio::test]
async fn test_probe_rejects_unparseable_reply() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Device"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = Panel::probe(&config_for(&server, Duration::ZERO)).await;
    assert!(matches!(result, Err(CoreError::MalformedResponse { .. })));
}
