use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    config::Config,
    model::{ApiHealth, ApiStats, WeatherForecast},
};

use super::{ApiError, ForecastApi, Query};

/// reqwest-backed client for the forecast API.
#[derive(Debug, Clone)]
pub struct HttpForecastApi {
    base_url: String,
    http: Client,
}

impl HttpForecastApi {
    /// Client without a request timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize(base_url.into()),
            http: Client::new(),
        }
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let Some(timeout) = timeout else {
            return Ok(Self::new(base_url));
        };

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            base_url: normalize(base_url.into()),
            http,
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let base_url = config.base_url()?;
        Ok(Self::with_timeout(base_url, config.request_timeout())?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/weather/{id}`.
    pub async fn forecast_by_id(&self, id: &str) -> Result<WeatherForecast, ApiError> {
        let path = format!("/api/weather/{}", urlencoding::encode(id));
        self.get_json(&path).await
    }

    /// `GET /api/weather/health`.
    pub async fn health(&self) -> Result<ApiHealth, ApiError> {
        self.get_json("/api/weather/health").await
    }

    /// `GET /api/weather/stats`.
    pub async fn stats(&self) -> Result<ApiStats, ApiError> {
        self.get_json("/api/weather/stats").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");

        let res = self.http.get(&url).send().await.map_err(|e| {
            warn!(%url, error = %e, "request failed");
            ApiError::Transport(e)
        })?;

        let status = res.status();
        let body = res.text().await?;

        if status == StatusCode::NOT_FOUND {
            debug!(%url, "not found");
            return Err(ApiError::NotFound);
        }

        if !status.is_success() {
            warn!(%url, %status, body = %truncate_body(&body), "request rejected");
            return Err(ApiError::Status(status));
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!(%url, error = %e, "malformed response body");
            ApiError::Decode(e)
        })
    }
}

#[async_trait]
impl ForecastApi for HttpForecastApi {
    async fn forecasts(&self, query: &Query) -> Result<Vec<WeatherForecast>, ApiError> {
        query.validate()?;

        match self.get_json(&query.path()).await {
            Err(ApiError::NotFound) if !query.is_filtered() => {
                Err(ApiError::Status(StatusCode::NOT_FOUND))
            }
            other => other,
        }
    }
}

fn normalize(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
