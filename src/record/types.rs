use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::sources::types::{GeoPoint, LegacyPollution, LegacyWeather, WeatherCondition};
use crate::utils::{serialize_iso, serialize_iso_opt};

/// The cached snapshot served on `GET /`. Each section is filled from one
/// upstream and is `None` when that upstream failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedRecord {
    pub city: String,
    pub state: String,
    pub country: String,
    pub location: Option<GeoPoint>,
    pub pollution_summary: Option<LegacyPollution>,
    pub weather_summary: Option<LegacyWeather>,
    #[serde(rename = "communityAQI")]
    pub community_aqi: Option<Value>,
    pub open_weather_pollution: Option<OpenWeatherPollution>,
    pub open_weather_weather: Option<OpenWeatherWeather>,
    #[serde(rename = "worstAreaAQI")]
    pub worst_area_aqi: WorstAreaAqi,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWeatherPollution {
    #[serde(serialize_with = "serialize_iso")]
    pub updated: DateTime<Utc>,
    pub aqi: u8,
    pub components: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWeatherWeather {
    #[serde(serialize_with = "serialize_iso")]
    pub updated: DateTime<Utc>,
    pub temp: f64,
    pub feels_like: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub dew_point: f64,
    pub uvi: f64,
    pub clouds: f64,
    pub visibility: Option<f64>,
    pub wind_speed: f64,
    pub weather: Option<WeatherCondition>,
}

/// The worst of the summary feed's areas. All fields are null when there
/// was nothing to pick from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorstAreaAqi {
    #[serde(serialize_with = "serialize_iso_opt")]
    pub timestamp: Option<DateTime<Utc>>,
    pub aqi: Option<Value>,
    pub pm25: Option<Value>,
}
