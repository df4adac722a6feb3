//! HTTP sample source against a local mock sensor.
//!
//! The mock binds `127.0.0.1:0` and serves:
//! - `/data`: a well-formed frame
//! - `/garbage`: JSON without a `data` array
//! - `/broken`: HTTP 500
//! - `/slow`: a frame after 2 s, for the timeout path

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use loudviz_core::error::TransportError;
use loudviz_core::transport::{HttpSampleSource, SampleSource};
use serde_json::json;

async fn spawn_mock_sensor() -> SocketAddr {
    let app = Router::new()
        .route("/data", get(|| async { Json(json!({ "data": [1, -2, 3.5, null] })) }))
        .route("/garbage", get(|| async { Json(json!({ "values": [] })) }))
        .route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(json!({ "data": [0] }))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn sensor_at(addr: SocketAddr, path: &str, timeout: Duration) -> HttpSampleSource {
    HttpSampleSource::new(format!("http://{}{}", addr, path), timeout).unwrap()
}

#[tokio::test]
async fn fetches_and_decodes_frame() {
    let addr = spawn_mock_sensor().await;
    let frame = sensor_at(addr, "/data", Duration::from_secs(1)).fetch().await.unwrap();
    assert_eq!(frame.samples, vec![1.0, -2.0, 3.5, 0.0]);
    assert_eq!(frame.peak_amplitude(), 3.5);
}

#[tokio::test]
async fn wrong_shape_is_decode_error() {
    let addr = spawn_mock_sensor().await;
    let err = sensor_at(addr, "/garbage", Duration::from_secs(1)).fetch().await.unwrap_err();
    assert!(matches!(err, TransportError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn server_error_is_status_error() {
    let addr = spawn_mock_sensor().await;
    let err = sensor_at(addr, "/broken", Duration::from_secs(1)).fetch().await.unwrap_err();
    match err {
        TransportError::Status { status, url } => {
            assert_eq!(status, 500);
            assert!(url.ends_with("/broken"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_sensor_times_out() {
    let addr = spawn_mock_sensor().await;
    let err = sensor_at(addr, "/slow", Duration::from_millis(100)).fetch().await.unwrap_err();
    match err {
        TransportError::Request { source, .. } => assert!(source.is_timeout()),
        other => panic!("expected request error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_sensor_is_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = sensor_at(addr, "/data", Duration::from_secs(1)).fetch().await.unwrap_err();
    assert!(matches!(err, TransportError::Request { .. }), "{err:?}");
}
