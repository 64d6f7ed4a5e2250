use super::types::AreaSummary;
use super::{fetch_json, join_url, SourceResult};
use reqwest::Client;

const SUMMARY_PATH: &str = "/api/summary";

/// Internal summary feed listing the most polluted nearby areas.
pub struct SciraClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SciraClient {
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub async fn get_summary(&self) -> SourceResult<AreaSummary> {
        let request = self
            .client
            .get(join_url(&self.base_url, SUMMARY_PATH))
            .header("X-API-Key", self.api_key.as_str());

        let summary: AreaSummary = fetch_json(request).await?;
        tracing::debug!(
            "Area summary returned {} areas",
            summary.top5_areas.as_ref().map_or(0, |a| a.len())
        );
        Ok(summary)
    }
}
