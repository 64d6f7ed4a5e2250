use super::types::*;
use super::{SourceError, SourceResult, Upstream};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Canned upstream for tests. A `None` payload behaves like an outage.
pub struct MockUpstream {
    pub nearest_city: Option<NearestCity>,
    pub air_pollution: Option<AirPollutionResponse>,
    pub one_call: Option<OneCallResponse>,
    pub community_feed: Option<Value>,
    pub area_summary: Option<AreaSummary>,
    refreshes: AtomicUsize,
}

impl MockUpstream {
    /// Every source answers with a realistic Bangkok payload.
    pub fn healthy() -> Self {
        Self {
            nearest_city: Some(sample_nearest_city()),
            air_pollution: Some(sample_air_pollution()),
            one_call: Some(sample_one_call()),
            community_feed: Some(sample_community_feed()),
            area_summary: Some(sample_area_summary()),
            refreshes: AtomicUsize::new(0),
        }
    }

    pub fn with_primary_down() -> Self {
        Self {
            air_pollution: None,
            ..Self::healthy()
        }
    }

    /// Only the primary source answers.
    pub fn only_primary() -> Self {
        Self {
            nearest_city: None,
            one_call: None,
            community_feed: None,
            area_summary: None,
            ..Self::healthy()
        }
    }

    /// Number of primary-source calls, i.e. refresh attempts.
    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

fn outage<T>(payload: &Option<T>) -> SourceResult<T>
where
    T: Clone,
{
    payload
        .clone()
        .ok_or_else(|| SourceError::Provider("mock outage".to_string()))
}

#[async_trait]
impl Upstream for MockUpstream {
    async fn nearest_city(&self) -> SourceResult<NearestCity> {
        outage(&self.nearest_city)
    }

    async fn air_pollution(&self) -> SourceResult<AirPollutionResponse> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        outage(&self.air_pollution)
    }

    async fn one_call(&self) -> SourceResult<OneCallResponse> {
        outage(&self.one_call)
    }

    async fn community_feed(&self) -> SourceResult<Value> {
        outage(&self.community_feed)
    }

    async fn area_summary(&self) -> SourceResult<AreaSummary> {
        outage(&self.area_summary)
    }
}

pub fn sample_nearest_city() -> NearestCity {
    serde_json::from_value(json!({
        "city": "Lat Krabang",
        "state": "Bangkok",
        "country": "Thailand",
        "location": { "type": "Point", "coordinates": [100.78113540955499, 13.721434635446425] },
        "current": {
            "pollution": { "ts": "2024-03-01T04:00:00.000Z", "aqius": 112, "mainus": "p2", "aqicn": 56, "maincn": "p2" },
            "weather": { "ts": "2024-03-01T04:00:00.000Z", "tp": 34.0, "pr": 1009.0, "hu": 52.0, "ws": 3.6, "wd": 180.0, "ic": "02d" }
        }
    }))
    .expect("valid nearest city fixture")
}

pub fn sample_air_pollution() -> AirPollutionResponse {
    serde_json::from_value(json!({
        "coord": { "lon": 100.7811, "lat": 13.7214 },
        "list": [{
            "dt": 1709265600,
            "main": { "aqi": 4 },
            "components": {
                "co": 894.55, "no": 0.42, "no2": 21.25, "o3": 82.27,
                "so2": 9.3, "pm2_5": 57.01, "pm10": 71.55, "nh3": 6.84
            }
        }]
    }))
    .expect("valid air pollution fixture")
}

pub fn sample_one_call() -> OneCallResponse {
    serde_json::from_value(json!({
        "lat": 13.7214,
        "lon": 100.7811,
        "timezone": "Asia/Bangkok",
        "timezone_offset": 25200,
        "current": {
            "dt": 1709266000,
            "temp": 307.15,
            "feels_like": 311.2,
            "pressure": 1009,
            "humidity": 52,
            "dew_point": 295.8,
            "uvi": 9.1,
            "clouds": 20,
            "visibility": 10000,
            "wind_speed": 3.6,
            "wind_deg": 180,
            "weather": [{ "id": 801, "main": "Clouds", "description": "few clouds", "icon": "02d" }]
        }
    }))
    .expect("valid one call fixture")
}

pub fn sample_community_feed() -> Value {
    json!({
        "aqi": 87,
        "idx": 5773,
        "city": { "name": "Lat Krabang, Bangkok", "geo": [13.72, 100.78] },
        "dominentpol": "pm25",
        "iaqi": { "pm25": { "v": 87 }, "pm10": { "v": 41 } }
    })
}

pub fn sample_area_summary() -> AreaSummary {
    serde_json::from_value(json!({
        "timestamp": "2024-03-01T04:05:00.000Z",
        "top5_areas": [
            { "name": "Lat Krabang", "aqi": 98, "pm25": 34.1 },
            { "name": "Bang Kapi", "aqi": 142, "pm25": 52.7 },
            { "name": "Prawet", "aqi": 120, "pm25": 44.0 }
        ]
    }))
    .expect("valid area summary fixture")
}
