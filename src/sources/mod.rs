pub mod airvisual;
#[cfg(test)]
pub mod mock;
pub mod openweather;
pub mod scira;
pub mod types;
pub mod waqi;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;
use airvisual::AirVisualClient;
use openweather::OpenWeatherClient;
use scira::SciraClient;
use types::*;
use waqi::WaqiClient;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Provider error: {0}")]
    Provider(String),
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Every upstream the refresh cycle reads from. Each call is fire-once and
/// reports its own failure; callers decide which failures matter.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn nearest_city(&self) -> SourceResult<NearestCity>;
    async fn air_pollution(&self) -> SourceResult<AirPollutionResponse>;
    async fn one_call(&self) -> SourceResult<OneCallResponse>;
    async fn community_feed(&self) -> SourceResult<Value>;
    async fn area_summary(&self) -> SourceResult<AreaSummary>;
}

/// The production `Upstream`: one HTTP client per provider, sharing a
/// connection pool.
pub struct HttpUpstream {
    openweather: OpenWeatherClient,
    airvisual: Option<AirVisualClient>,
    waqi: Option<WaqiClient>,
    scira: Option<SciraClient>,
}

impl HttpUpstream {
    pub fn new(config: &Config) -> SourceResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("air-quality-api/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;

        let site = &config.site;
        Ok(Self {
            openweather: OpenWeatherClient::new(
                client.clone(),
                &config.openweather_base_url,
                &config.openweather_api_key,
                site.lat,
                site.lon,
            ),
            airvisual: config.airvisual_api_key.as_deref().map(|key| {
                AirVisualClient::new(client.clone(), &config.airvisual_base_url, key, site.lat, site.lon)
            }),
            waqi: config.aqicn_api_key.as_deref().map(|token| {
                WaqiClient::new(client.clone(), &config.waqi_base_url, token, site.lat, site.lon)
            }),
            scira: config
                .scira_api_key
                .as_deref()
                .map(|key| SciraClient::new(client.clone(), &config.scira_base_url, key)),
        })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn nearest_city(&self) -> SourceResult<NearestCity> {
        match &self.airvisual {
            Some(client) => client.get_nearest_city().await,
            None => Err(SourceError::NotConfigured("AirVisual")),
        }
    }

    async fn air_pollution(&self) -> SourceResult<AirPollutionResponse> {
        self.openweather.get_air_pollution().await
    }

    async fn one_call(&self) -> SourceResult<OneCallResponse> {
        self.openweather.get_onecall().await
    }

    async fn community_feed(&self) -> SourceResult<Value> {
        match &self.waqi {
            Some(client) => client.get_feed().await,
            None => Err(SourceError::NotConfigured("WAQI")),
        }
    }

    async fn area_summary(&self) -> SourceResult<AreaSummary> {
        match &self.scira {
            Some(client) => client.get_summary().await,
            None => Err(SourceError::NotConfigured("area summary feed")),
        }
    }
}

/// Sends a prepared request and decodes a 2xx body. Anything else becomes a
/// `SourceError`; nothing is retried.
pub(crate) async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> SourceResult<T> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Trims a trailing slash so base URLs join cleanly with paths.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
