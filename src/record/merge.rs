use super::types::*;
use crate::config::Site;
use crate::sources::types::*;
use crate::utils::{from_unix, instant_from_value};
use serde_json::Value;

/// What one refresh managed to fetch. `None` means that source failed.
#[derive(Debug, Clone, Default)]
pub struct SourceResults {
    pub nearest_city: Option<NearestCity>,
    pub air_pollution: Option<AirPollutionResponse>,
    pub one_call: Option<OneCallResponse>,
    pub community_feed: Option<Value>,
    pub area_summary: Option<AreaSummary>,
}

pub fn merge_results(site: &Site, results: &SourceResults) -> MergedRecord {
    let legacy = results.nearest_city.as_ref();

    MergedRecord {
        city: site.city.clone(),
        state: site.state.clone(),
        country: site.country.clone(),
        location: legacy.and_then(|c| c.location.clone()),
        pollution_summary: legacy.and_then(|c| c.current.pollution.clone()),
        weather_summary: legacy.and_then(|c| c.current.weather.clone()),
        community_aqi: results.community_feed.clone(),
        open_weather_pollution: results.air_pollution.as_ref().and_then(pollution_section),
        open_weather_weather: results.one_call.as_ref().and_then(weather_section),
        worst_area_aqi: results
            .area_summary
            .as_ref()
            .map(worst_area_section)
            .unwrap_or_default(),
    }
}

fn pollution_section(response: &AirPollutionResponse) -> Option<OpenWeatherPollution> {
    let latest = response.list.first()?;
    Some(OpenWeatherPollution {
        updated: from_unix(latest.dt)?,
        aqi: latest.main.aqi,
        components: latest.components.clone(),
    })
}

fn weather_section(response: &OneCallResponse) -> Option<OpenWeatherWeather> {
    let current = &response.current;
    Some(OpenWeatherWeather {
        updated: from_unix(current.dt)?,
        temp: current.temp,
        feels_like: current.feels_like,
        pressure: current.pressure,
        humidity: current.humidity,
        dew_point: current.dew_point,
        uvi: current.uvi,
        clouds: current.clouds,
        visibility: current.visibility,
        wind_speed: current.wind_speed,
        weather: current.weather.first().cloned(),
    })
}

fn worst_area_section(summary: &AreaSummary) -> WorstAreaAqi {
    let areas = summary.top5_areas.as_deref().unwrap_or_default();
    match worst_area(areas) {
        Some(area) => WorstAreaAqi {
            timestamp: summary.timestamp.as_ref().and_then(instant_from_value),
            aqi: area.aqi.clone(),
            pm25: area.pm25.clone(),
        },
        None => WorstAreaAqi::default(),
    }
}

/// Left-to-right maximum by `aqi`. Ties keep the earlier entry, and an entry
/// without a numeric `aqi` never displaces one that has it.
pub fn worst_area(areas: &[AreaReading]) -> Option<&AreaReading> {
    areas.iter().reduce(|worst, area| match (numeric_aqi(worst), numeric_aqi(area)) {
        (Some(current), Some(candidate)) if candidate > current => area,
        (None, Some(_)) => area,
        _ => worst,
    })
}

fn numeric_aqi(area: &AreaReading) -> Option<f64> {
    area.aqi.as_ref().and_then(Value::as_f64)
}
