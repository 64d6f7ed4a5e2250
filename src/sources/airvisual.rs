use super::types::*;
use super::{fetch_json, join_url, SourceError, SourceResult};
use reqwest::Client;

const NEAREST_CITY_PATH: &str = "/v2/nearest_city";

/// Legacy AQI provider. Only populates the legacy sections of the record.
pub struct AirVisualClient {
    client: Client,
    base_url: String,
    api_key: String,
    lat: String,
    lon: String,
}

impl AirVisualClient {
    pub fn new(client: Client, base_url: &str, api_key: &str, lat: f64, lon: f64) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            lat: lat.to_string(),
            lon: lon.to_string(),
        }
    }

    pub async fn get_nearest_city(&self) -> SourceResult<NearestCity> {
        let request = self
            .client
            .get(join_url(&self.base_url, NEAREST_CITY_PATH))
            .query(&[
                ("lat", self.lat.as_str()),
                ("lon", self.lon.as_str()),
                ("key", self.api_key.as_str()),
            ]);

        let envelope: NearestCityEnvelope = fetch_json(request).await?;
        parse_nearest_city(envelope)
    }
}

// AirVisual reports failures as 200s with `status: "fail"` and a message in `data`.
fn parse_nearest_city(envelope: NearestCityEnvelope) -> SourceResult<NearestCity> {
    if envelope.status != "success" {
        let reason = envelope
            .data
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or(envelope.status.as_str())
            .to_string();
        return Err(SourceError::Provider(format!("AirVisual: {}", reason)));
    }

    Ok(serde_json::from_value(envelope.data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_success_envelope() {
        let envelope: NearestCityEnvelope = serde_json::from_value(json!({
            "status": "success",
            "data": {
                "city": "Lat Krabang",
                "state": "Bangkok",
                "country": "Thailand",
                "location": { "type": "Point", "coordinates": [100.78, 13.72] },
                "current": {
                    "pollution": { "ts": "2024-03-01T04:00:00.000Z", "aqius": 112, "mainus": "p2", "aqicn": 56, "maincn": "p2" },
                    "weather": { "ts": "2024-03-01T04:00:00.000Z", "tp": 34.0, "pr": 1009.0, "hu": 52.0, "ws": 3.6, "wd": 180.0, "ic": "02d" }
                }
            }
        }))
        .unwrap();

        let city = parse_nearest_city(envelope).unwrap();
        assert_eq!(city.city, "Lat Krabang");
        assert_eq!(city.location.unwrap().coordinates, vec![100.78, 13.72]);
        assert_eq!(city.current.pollution.unwrap().aqius, 112);
    }

    #[test]
    fn test_parse_fail_envelope() {
        let envelope: NearestCityEnvelope = serde_json::from_value(json!({
            "status": "fail",
            "data": { "message": "incorrect_api_key" }
        }))
        .unwrap();

        match parse_nearest_city(envelope) {
            Err(SourceError::Provider(msg)) => assert!(msg.contains("incorrect_api_key")),
            other => panic!("expected provider error, got {:?}", other.map(|c| c.city)),
        }
    }
}
