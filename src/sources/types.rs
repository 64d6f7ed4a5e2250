use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// OpenWeatherMap /data/2.5/air_pollution

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirPollutionResponse {
    #[serde(default)]
    pub list: Vec<AirPollutionItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirPollutionItem {
    pub dt: i64,
    pub main: AirPollutionMain,
    #[serde(default)]
    pub components: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirPollutionMain {
    pub aqi: u8,
}

// OpenWeatherMap /data/3.0/onecall with minutely,hourly,daily excluded

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneCallResponse {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub timezone: Option<String>,
    pub current: OneCallCurrent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneCallCurrent {
    pub dt: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub dew_point: f64,
    pub uvi: f64,
    pub clouds: f64,
    #[serde(default)]
    pub visibility: Option<f64>,
    pub wind_speed: f64,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub id: i32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

// AirVisual /v2/nearest_city

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestCityEnvelope {
    pub status: String,
    pub data: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestCity {
    pub city: String,
    pub state: String,
    pub country: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    pub current: NearestCityCurrent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestCityCurrent {
    #[serde(default)]
    pub pollution: Option<LegacyPollution>,
    #[serde(default)]
    pub weather: Option<LegacyWeather>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyPollution {
    pub ts: String,
    pub aqius: i32,
    pub mainus: String,
    pub aqicn: i32,
    pub maincn: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyWeather {
    pub ts: String,
    pub tp: f64,
    pub pr: f64,
    pub hu: f64,
    pub ws: f64,
    pub wd: f64,
    pub ic: String,
}

// WAQI /feed/geo:{lat};{lon}/, `data` is kept opaque

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaqiEnvelope {
    pub status: String,
    #[serde(default)]
    pub data: Value,
}

// Internal summary feed /api/summary

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaSummary {
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub top5_areas: Option<Vec<AreaReading>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaReading {
    #[serde(default)]
    pub name: Option<String>,
    // Copied into the record as sent; the feed is not strict about numbers.
    #[serde(default)]
    pub aqi: Option<Value>,
    #[serde(default)]
    pub pm25: Option<Value>,
}
