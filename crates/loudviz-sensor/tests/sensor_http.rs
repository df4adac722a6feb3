use std::net::SocketAddr;
use std::time::Duration;

use loudviz_core::transport::{HttpSampleSource, SampleSource};
use loudviz_sensor::synth::Synth;
use loudviz_sensor::{start_server, SensorState};
use rand::rngs::StdRng;
use rand::SeedableRng;

async fn spawn_sensor(frame_len: usize) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let synth = Synth::with_rng(frame_len, StdRng::seed_from_u64(11));
    start_server(listener, SensorState::new(synth));
    addr
}

#[tokio::test]
async fn client_decodes_sensor_frames() {
    let addr = spawn_sensor(128).await;
    let url = format!("http://{}/data", addr);
    let source = HttpSampleSource::new(&url, Duration::from_secs(2)).unwrap();

    let first = source.fetch().await.unwrap();
    let second = source.fetch().await.unwrap();
    assert_eq!(first.len(), 128);
    assert!(first.peak_amplitude() > 0.0);
    assert_ne!(first, second);
}

#[tokio::test]
async fn unknown_path_is_a_status_error() {
    let addr = spawn_sensor(16).await;
    let url = format!("http://{}/nope", addr);
    let source = HttpSampleSource::new(&url, Duration::from_secs(2)).unwrap();

    let err = source.fetch().await.unwrap_err();
    assert!(
        matches!(err, loudviz_core::error::TransportError::Status { status: 404, .. }),
        "{err:?}"
    );
}
