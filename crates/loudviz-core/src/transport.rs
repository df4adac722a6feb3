//! Fetching sample frames from the sensor.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::trace;

use crate::config::SensorConfig;
use crate::error::TransportError;
use crate::protocol::SampleFrame;

/// Anything that can produce one frame of waveform samples on request.
///
/// Every call is independent: no retries, no buffering between calls.
pub trait SampleSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<SampleFrame, TransportError>> + Send;
}

/// `GET {base_url}{endpoint}` against the sensor's HTTP server.
#[derive(Debug, Clone)]
pub struct HttpSampleSource {
    client: Client,
    url: String,
}

impl HttpSampleSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let url = url.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| TransportError::Request {
                url: url.clone(),
                source,
            })?;
        Ok(Self { client, url })
    }

    pub fn from_config(config: &SensorConfig) -> Result<Self, TransportError> {
        Self::new(
            config.data_url(),
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SampleSource for HttpSampleSource {
    async fn fetch(&self) -> Result<SampleFrame, TransportError> {
        let request_err = |source| TransportError::Request {
            url: self.url.clone(),
            source,
        };

        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(request_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(request_err)?;
        let frame = SampleFrame::decode(&body)?;
        trace!("fetched {} samples from {}", frame.len(), self.url);
        Ok(frame)
    }
}
