// tests/feed_client.rs
//
// HttpFeedSource against a throwaway in-process Axum server on 127.0.0.1:0.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use activity_dashboard::feed::{FeedError, FeedSource, HttpFeedSource};
use axum::{
    http::{HeaderMap, StatusCode},
    routing::get,
    Router,
};

const FIXTURE: &str = include_str!("fixtures/feed.json");

type SeenHeaders = Arc<Mutex<Vec<(String, String)>>>;

async fn spawn_server() -> (SocketAddr, SeenHeaders) {
    let seen: SeenHeaders = Arc::new(Mutex::new(Vec::new()));
    let seen_ok = Arc::clone(&seen);

    let app = Router::new()
        .route(
            "/ok.json",
            get(move |headers: HeaderMap| {
                let seen = Arc::clone(&seen_ok);
                async move {
                    let mut s = seen.lock().unwrap();
                    for name in ["accept", "cache-control"] {
                        if let Some(v) = headers.get(name).and_then(|v| v.to_str().ok()) {
                            s.push((name.to_string(), v.to_string()));
                        }
                    }
                    FIXTURE
                }
            }),
        )
        .route(
            "/v2.json",
            get(|| async { r#"{"schemaVersion":2,"workflows":[],"events":[]}"# }),
        )
        .route(
            "/broken.json",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route(
            "/slow.json",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                FIXTURE
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, seen)
}

fn source(addr: SocketAddr, path: &str) -> HttpFeedSource {
    HttpFeedSource::new(
        format!("http://{addr}{path}"),
        Duration::from_secs(2),
        Duration::from_secs(60),
        "activity-dashboard-tests",
    )
    .unwrap()
}

#[tokio::test]
async fn fetches_and_validates_with_expected_headers() {
    let (addr, seen) = spawn_server().await;
    let feed = source(addr, "/ok.json").fetch().await.unwrap();
    assert_eq!(feed.events.len(), 18);

    let seen = seen.lock().unwrap().clone();
    assert!(seen.contains(&("accept".into(), "application/json".into())), "{seen:?}");
    assert!(seen.contains(&("cache-control".into(), "no-cache".into())), "{seen:?}");
}

#[tokio::test]
async fn non_2xx_carries_status_and_text() {
    let (addr, _) = spawn_server().await;
    let err = source(addr, "/broken.json").fetch().await.unwrap_err();
    match err {
        FeedError::Status {
            status,
            ref status_text,
        } => {
            assert_eq!(status, 500);
            assert_eq!(status_text, "Internal Server Error");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn unsupported_schema_is_rejected() {
    let (addr, _) = spawn_server().await;
    let err = source(addr, "/v2.json").fetch().await.unwrap_err();
    assert!(matches!(err, FeedError::Validation(_)), "{err:?}");
}

#[tokio::test]
async fn missing_route_is_a_404_status_error() {
    let (addr, _) = spawn_server().await;
    let err = source(addr, "/nope.json").fetch().await.unwrap_err();
    assert!(matches!(err, FeedError::Status { status: 404, .. }), "{err:?}");
}

#[tokio::test]
async fn cancellation_aborts_in_flight_fetch() {
    let (addr, _) = spawn_server().await;
    let src = source(addr, "/slow.json");
    let started = std::time::Instant::now();
    let err = src
        .fetch_with_cancel(tokio::time::sleep(Duration::from_millis(100)))
        .await
        .unwrap_err();
    assert!(matches!(err, FeedError::Cancelled), "{err:?}");
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let err = source(addr, "/ok.json").fetch().await.unwrap_err();
    assert_eq!(err.kind(), "transport");
}
