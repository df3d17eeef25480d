// HTTP telemetry source - GETs the history and prediction endpoints
use crate::application::telemetry_source::TelemetrySource;
use crate::domain::reading::{Prediction, Reading};
use crate::infrastructure::config::ApiSettings;
use crate::infrastructure::error::FetchError;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone)]
pub struct HttpTelemetrySource {
    client: reqwest::Client,
    history_url: String,
    prediction_url: String,
}

impl HttpTelemetrySource {
    pub fn new(settings: &ApiSettings) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            history_url: settings.history_url(),
            prediction_url: settings.prediction_url(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Http {
                url: url.to_string(),
                status,
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_slice(&bytes).map_err(|source| FetchError::Parse {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl TelemetrySource for HttpTelemetrySource {
    async fn fetch_history(&self) -> Result<Vec<Reading>, FetchError> {
        tracing::debug!("GET {}", self.history_url);
        self.get_json(&self.history_url).await
    }

    async fn fetch_predictions(&self) -> Result<Vec<Prediction>, FetchError> {
        tracing::debug!("GET {}", self.prediction_url);
        self.get_json(&self.prediction_url).await
    }
}
