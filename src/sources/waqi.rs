use super::types::WaqiEnvelope;
use super::{fetch_json, join_url, SourceError, SourceResult};
use reqwest::Client;
use serde_json::Value;

/// Community AQI feed. The payload is passed through without interpretation.
pub struct WaqiClient {
    client: Client,
    base_url: String,
    token: String,
    lat: f64,
    lon: f64,
}

impl WaqiClient {
    pub fn new(client: Client, base_url: &str, token: &str, lat: f64, lon: f64) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            token: token.to_string(),
            lat,
            lon,
        }
    }

    pub async fn get_feed(&self) -> SourceResult<Value> {
        let path = format!("/feed/geo:{};{}/", self.lat, self.lon);
        let request = self
            .client
            .get(join_url(&self.base_url, &path))
            .query(&[("token", self.token.as_str())]);

        let envelope: WaqiEnvelope = fetch_json(request).await?;
        unwrap_feed(envelope)
    }
}

fn unwrap_feed(envelope: WaqiEnvelope) -> SourceResult<Value> {
    if envelope.status != "ok" {
        // Errors carry a plain string in `data`, e.g. "Invalid key".
        let reason = envelope.data.as_str().unwrap_or(envelope.status.as_str());
        return Err(SourceError::Provider(format!("WAQI: {}", reason)));
    }
    Ok(envelope.data)
}
