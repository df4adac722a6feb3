//! Stand-in for the networked audio sensor.
//!
//! Serves `GET /data` with one frame of synthesized 16-bit samples per
//! request, in the same `{"data":[...]}` shape the real device returns.

pub mod synth;

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use loudviz_core::protocol::SampleFrame;
use tokio::sync::Mutex;
use tracing::{info, trace, warn};

use crate::synth::Synth;

#[derive(Clone)]
pub struct SensorState {
    synth: Arc<Mutex<Synth>>,
}

impl SensorState {
    pub fn new(synth: Synth) -> Self {
        Self {
            synth: Arc::new(Mutex::new(synth)),
        }
    }
}

async fn data(State(state): State<SensorState>) -> impl IntoResponse {
    let samples = state.synth.lock().await.next_frame();
    trace!("serving {} samples", samples.len());
    Json(SampleFrame::new(samples))
}

pub fn router(state: SensorState) -> Router {
    Router::new().route("/data", get(data)).with_state(state)
}

pub fn start_server(
    listener: tokio::net::TcpListener,
    state: SensorState,
) -> tokio::task::JoinHandle<()> {
    let app = router(state);
    tokio::spawn(async move {
        if let Ok(addr) = listener.local_addr() {
            info!("sensor listening on http://{}/data", addr);
        }
        if let Err(e) = axum::serve(listener, app).await {
            warn!("sensor server error: {}", e);
        }
    })
}
