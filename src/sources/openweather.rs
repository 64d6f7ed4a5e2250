use super::types::*;
use super::{fetch_json, join_url, SourceResult};
use reqwest::Client;

const AIR_POLLUTION_PATH: &str = "/data/2.5/air_pollution";
const ONECALL_PATH: &str = "/data/3.0/onecall";

pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    lat: String,
    lon: String,
}

impl OpenWeatherClient {
    pub fn new(client: Client, base_url: &str, api_key: &str, lat: f64, lon: f64) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            lat: lat.to_string(),
            lon: lon.to_string(),
        }
    }

    pub async fn get_air_pollution(&self) -> SourceResult<AirPollutionResponse> {
        let request = self
            .client
            .get(join_url(&self.base_url, AIR_POLLUTION_PATH))
            .query(&[
                ("lat", self.lat.as_str()),
                ("lon", self.lon.as_str()),
                ("appid", self.api_key.as_str()),
            ]);

        let pollution: AirPollutionResponse = fetch_json(request).await?;
        tracing::debug!("OpenWeather air pollution returned {} entries", pollution.list.len());
        Ok(pollution)
    }

    pub async fn get_onecall(&self) -> SourceResult<OneCallResponse> {
        let request = self
            .client
            .get(join_url(&self.base_url, ONECALL_PATH))
            .query(&[
                ("lat", self.lat.as_str()),
                ("lon", self.lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("exclude", "minutely,hourly,daily"),
            ]);

        fetch_json(request).await
    }
}
