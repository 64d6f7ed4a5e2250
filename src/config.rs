use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

// Upper bound for the minute settings: one week.
const MAX_MINUTES: i64 = 7 * 24 * 60;

/// The one location this service reports on.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Site {
    pub city: String,
    pub state: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            city: "Bangkok".to_string(),
            state: "Bangkok".to_string(),
            country: "Thailand".to_string(),
            lat: 13.721434635446425,
            lon: 100.78113540955499,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub port: u16,
    pub site: Site,
    pub openweather_api_key: String,
    pub openweather_base_url: String,
    pub airvisual_api_key: Option<String>,
    pub airvisual_base_url: String,
    pub aqicn_api_key: Option<String>,
    pub waqi_base_url: String,
    pub scira_api_key: Option<String>,
    pub scira_base_url: String,
    pub redis_url: String,
    pub stale_after_minutes: i64,
    pub refresh_interval_minutes: i64,
    pub upstream_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Site::default();

        Ok(Config {
            port: parse_or("PORT", 3100)?,
            site: Site {
                city: env::var("SITE_CITY").unwrap_or(defaults.city),
                state: env::var("SITE_STATE").unwrap_or(defaults.state),
                country: env::var("SITE_COUNTRY").unwrap_or(defaults.country),
                lat: parse_or("SITE_LAT", defaults.lat)?,
                lon: parse_or("SITE_LON", defaults.lon)?,
            },
            openweather_api_key: env::var("OWM_API_KEY")
                .map_err(|_| anyhow::anyhow!("OWM_API_KEY not set"))?,
            openweather_base_url: env::var("OPENWEATHER_BASE_URL")
                .unwrap_or_else(|_| "https://api.openweathermap.org".to_string()),
            airvisual_api_key: optional("AIRVISUAL_API_KEY"),
            airvisual_base_url: env::var("AIRVISUAL_BASE_URL")
                .unwrap_or_else(|_| "http://api.airvisual.com".to_string()),
            aqicn_api_key: optional("AQICN_API_KEY"),
            waqi_base_url: env::var("WAQI_BASE_URL")
                .unwrap_or_else(|_| "https://api.waqi.info".to_string()),
            scira_api_key: optional("SCIRA_API_KEY"),
            scira_base_url: env::var("SCIRA_BASE_URL")
                .unwrap_or_else(|_| "http://10.141.3.68:8470".to_string()),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            stale_after_minutes: minutes_or("STALE_AFTER_MINUTES", 15)?,
            refresh_interval_minutes: minutes_or("REFRESH_INTERVAL_MINUTES", 15)?,
            upstream_timeout_secs: parse_or("UPSTREAM_TIMEOUT_SECS", 30)?,
        })
    }

    pub fn stale_after(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.stale_after_minutes.clamp(1, MAX_MINUTES))
    }

    pub fn refresh_every(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.refresh_interval_minutes.clamp(1, MAX_MINUTES))
    }
}

// Empty values count as unset so `KEY=` in a .env file disables a source.
fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} is invalid ({}): {}", name, raw, e)),
        Err(_) => Ok(default),
    }
}

fn minutes_or(name: &str, default: i64) -> anyhow::Result<i64> {
    let minutes = parse_or(name, default)?;
    if !(1..=MAX_MINUTES).contains(&minutes) {
        anyhow::bail!("{} must be between 1 and {} minutes, got {}", name, MAX_MINUTES, minutes);
    }
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or() {
        env::set_var("AQ_TEST_PORT_VALID", " 8080 ");
        env::set_var("AQ_TEST_PORT_INVALID", "eighty");
        env::remove_var("AQ_TEST_PORT_MISSING");

        assert_eq!(parse_or::<u16>("AQ_TEST_PORT_VALID", 3100).unwrap(), 8080);
        assert_eq!(parse_or::<u16>("AQ_TEST_PORT_MISSING", 3100).unwrap(), 3100);
        assert!(parse_or::<u16>("AQ_TEST_PORT_INVALID", 3100).is_err());
    }

    #[test]
    fn test_minutes_out_of_range_rejected() {
        env::set_var("AQ_TEST_MINUTES_OK", "30");
        env::set_var("AQ_TEST_MINUTES_ZERO", "0");
        env::set_var("AQ_TEST_MINUTES_NEGATIVE", "-5");
        env::set_var("AQ_TEST_MINUTES_HUGE", "9223372036854775807");
        env::set_var("AQ_TEST_MINUTES_OVERFLOW", "18446744073709551615");

        assert_eq!(minutes_or("AQ_TEST_MINUTES_OK", 15).unwrap(), 30);
        assert!(minutes_or("AQ_TEST_MINUTES_ZERO", 15).is_err());
        assert!(minutes_or("AQ_TEST_MINUTES_NEGATIVE", 15).is_err());
        assert!(minutes_or("AQ_TEST_MINUTES_HUGE", 15).is_err());
        assert!(minutes_or("AQ_TEST_MINUTES_OVERFLOW", 15).is_err());
    }

    #[test]
    fn test_durations_never_panic() {
        let mut config = Config {
            port: 3100,
            site: Site::default(),
            openweather_api_key: "owm".to_string(),
            openweather_base_url: String::new(),
            airvisual_api_key: None,
            airvisual_base_url: String::new(),
            aqicn_api_key: None,
            waqi_base_url: String::new(),
            scira_api_key: None,
            scira_base_url: String::new(),
            redis_url: String::new(),
            stale_after_minutes: 15,
            refresh_interval_minutes: 15,
            upstream_timeout_secs: 30,
        };
        assert_eq!(config.stale_after(), chrono::Duration::minutes(15));

        config.stale_after_minutes = i64::MAX;
        config.refresh_interval_minutes = i64::MIN;
        assert_eq!(config.stale_after(), chrono::Duration::minutes(MAX_MINUTES));
        assert_eq!(config.refresh_every(), chrono::Duration::minutes(1));
    }

    #[test]
    fn test_blank_optional_is_unset() {
        env::set_var("AQ_TEST_BLANK_KEY", "  ");
        env::set_var("AQ_TEST_REAL_KEY", "abc");

        assert_eq!(optional("AQ_TEST_BLANK_KEY"), None);
        assert_eq!(optional("AQ_TEST_REAL_KEY").as_deref(), Some("abc"));
    }
}
