//! End-to-end subscription tests.
//!
//! A wiremock server plays the storage host (well-known document, gateway
//! and connection endpoint) while a local WebSocket server plays the
//! notification channel.

use serde_json::json;
use solidnotify_client::{
    ConnectionStatus, EventKind, FeatureOptions, LiveNotification, NotificationEvent,
    NotificationOptions, WebsocketNotification,
};
use solidnotify_integration_tests::WsServer;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_storage(
    storage: &MockServer,
    negotiation_body: serde_json::Value,
    connection_body: serde_json::Value,
    ws_endpoint: &url::Url,
) {
    let base = storage.uri();

    Mock::given(method("GET"))
        .and(path("/.well-known/solid"))
        .and(header("accept", "application/ld+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@context": { "solid": "http://www.w3.org/ns/solid/terms#" },
            "solid:notificationGateway": { "@id": format!("{}/notifications/", base) }
        })))
        .expect(1)
        .mount(storage)
        .await;

    Mock::given(method("POST"))
        .and(path("/notifications/"))
        .and(body_json(negotiation_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "endpoint": format!("{}/some-endpoint", base),
            "protocol": "ws"
        })))
        .expect(1)
        .mount(storage)
        .await;

    Mock::given(method("POST"))
        .and(path("/some-endpoint"))
        .and(body_json(connection_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "endpoint": ws_endpoint,
            "protocol": "ws",
            "subprotocol": "solid-0.2"
        })))
        .expect(1)
        .mount(storage)
        .await;
}

fn record(notification: &WebsocketNotification) -> mpsc::UnboundedReceiver<NotificationEventSummary> {
    let (tx, rx) = mpsc::unbounded_channel();
    for kind in [
        EventKind::Connected,
        EventKind::Message,
        EventKind::Error,
        EventKind::Closed,
    ] {
        let tx = tx.clone();
        notification.on(kind, move |event| {
            let summary = match event {
                NotificationEvent::Message(value) => NotificationEventSummary::Message(value.clone()),
                other => NotificationEventSummary::Other(other.kind()),
            };
            let _ = tx.send(summary);
        });
    }
    rx
}

#[derive(Debug, PartialEq)]
enum NotificationEventSummary {
    Message(serde_json::Value),
    Other(EventKind),
}

async fn next(rx: &mut mpsc::UnboundedReceiver<NotificationEventSummary>) -> NotificationEventSummary {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("emitter dropped")
}

#[tokio::test]
async fn test_connect_negotiates_and_subscribes() {
    let activity = json!({
        "@context": "https://www.w3.org/ns/activitystreams",
        "id": "urn:uuid:1",
        "type": "Update",
        "object": "https://fake.url/some-resource"
    });
    let ws = WsServer::start(vec![Message::Text(activity.to_string())]).await;
    let ws_endpoint = ws.url("/some-resource?extraInfo=some-code");

    let storage = MockServer::start().await;
    let topic = format!("{}/some-resource", storage.uri());
    mount_storage(
        &storage,
        json!({ "protocols": ["ws"], "features": [] }),
        json!({ "topic": topic }),
        &ws_endpoint,
    )
    .await;

    let notification = WebsocketNotification::parse(&topic, NotificationOptions::new()).unwrap();
    let mut rx = record(&notification);
    assert_eq!(notification.status(), ConnectionStatus::Closed);

    notification.connect(None, None).await.unwrap();

    assert_eq!(notification.status(), ConnectionStatus::Connected);
    assert_eq!(notification.endpoint(), Some(ws_endpoint));
    assert_eq!(notification.subprotocol().as_deref(), Some("solid-0.2"));
    assert_eq!(
        notification.gateway().unwrap().as_str(),
        format!("{}/notifications/", storage.uri())
    );

    assert_eq!(next(&mut rx).await, NotificationEventSummary::Other(EventKind::Connected));
    assert_eq!(next(&mut rx).await, NotificationEventSummary::Message(activity));

    notification.disconnect().unwrap();
    assert_eq!(next(&mut rx).await, NotificationEventSummary::Other(EventKind::Closed));
    assert_eq!(notification.status(), ConnectionStatus::Closed);

    let handshake = ws.finished().await.unwrap();
    assert_eq!(handshake.path_and_query, "/some-resource?extraInfo=some-code");
    assert_eq!(handshake.subprotocol.as_deref(), Some("solid-0.2"));
}

#[tokio::test]
async fn test_features_flow_through_negotiation() {
    let ws = WsServer::start(vec![]).await;
    let ws_endpoint = ws.url("/channel");

    let storage = MockServer::start().await;
    let topic = format!("{}/some-resource", storage.uri());
    mount_storage(
        &storage,
        json!({ "protocols": ["ws"], "features": ["state", "ttl", "filter"] }),
        json!({ "topic": topic, "state": "etag-1", "ttl": 3600, "filter": "Update" }),
        &ws_endpoint,
    )
    .await;

    let features = FeatureOptions::new()
        .with_state("etag-1")
        .with_ttl(3600)
        .with_filter("Update");
    let notification = WebsocketNotification::parse(
        &topic,
        NotificationOptions::new().with_features(features),
    )
    .unwrap();
    let mut rx = record(&notification);

    notification.connect(None, None).await.unwrap();
    assert_eq!(next(&mut rx).await, NotificationEventSummary::Other(EventKind::Connected));

    notification.disconnect().unwrap();
    assert_eq!(next(&mut rx).await, NotificationEventSummary::Other(EventKind::Closed));
    assert!(ws.finished().await.is_some());
}

#[tokio::test]
async fn test_reconnect_reuses_discovered_gateway() {
    let first = WsServer::start(vec![]).await;
    let second = WsServer::start(vec![]).await;

    let storage = MockServer::start().await;
    let base = storage.uri();
    let topic = format!("{}/some-resource", base);

    Mock::given(method("GET"))
        .and(path("/.well-known/solid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notificationGateway": format!("{}/notifications/", base)
        })))
        .expect(1)
        .mount(&storage)
        .await;
    Mock::given(method("POST"))
        .and(path("/notifications/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "endpoint": format!("{}/some-endpoint", base)
        })))
        .expect(2)
        .mount(&storage)
        .await;
    Mock::given(method("POST"))
        .and(path("/some-endpoint"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "endpoint": first.url("/one") })),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&storage)
        .await;
    Mock::given(method("POST"))
        .and(path("/some-endpoint"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "endpoint": second.url("/two") })),
        )
        .expect(1)
        .mount(&storage)
        .await;

    let notification = WebsocketNotification::parse(&topic, NotificationOptions::new()).unwrap();
    let mut rx = record(&notification);

    notification.connect(None, None).await.unwrap();
    assert_eq!(next(&mut rx).await, NotificationEventSummary::Other(EventKind::Connected));
    notification.disconnect().unwrap();
    assert_eq!(next(&mut rx).await, NotificationEventSummary::Other(EventKind::Closed));

    notification.connect(None, None).await.unwrap();
    assert_eq!(next(&mut rx).await, NotificationEventSummary::Other(EventKind::Connected));
    assert_eq!(notification.endpoint(), Some(second.url("/two")));
    notification.disconnect().unwrap();
    assert_eq!(next(&mut rx).await, NotificationEventSummary::Other(EventKind::Closed));

    assert_eq!(first.finished().await.unwrap().path_and_query, "/one");
    assert_eq!(second.finished().await.unwrap().path_and_query, "/two");
}

#[tokio::test]
async fn test_missing_gateway_is_capability_gap() {
    let storage = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/solid"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&storage)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&storage)
        .await;

    let notification = WebsocketNotification::parse(
        &format!("{}/some-resource", storage.uri()),
        NotificationOptions::new(),
    )
    .unwrap();

    let err = notification.connect(None, None).await.unwrap_err();
    assert!(err.is_capability_gap());
    assert!(!err.is_retriable());
    assert_eq!(notification.status(), ConnectionStatus::Connecting);
}
