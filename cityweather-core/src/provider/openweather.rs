use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    error::{Endpoint, FetchError},
    model::{Candidate, CurrentConditions, ForecastEntry, ForecastSeries},
};

use super::WeatherService;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const GEOCODING_PATH: &str = "/geo/1.0/direct";
const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";
const UNITS: &str = "metric";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%endpoint, %url, "issuing request");

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| FetchError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| FetchError::Transport { endpoint, source })?;

        if !status.is_success() {
            warn!(%endpoint, %status, body = %truncate_body(&body), "request rejected");
            return Err(FetchError::Status { endpoint, status: status.as_u16() });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Decode { endpoint, source })
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    name: String,
    #[serde(default)]
    country: String,
    state: Option<String>,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    #[serde(with = "dt_txt")]
    dt_txt: NaiveDateTime,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

/// `dt_txt` is a naive "YYYY-MM-DD HH:MM:SS" string.
mod dt_txt {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, de::Error};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(D::Error::custom)
    }
}

fn primary(weather: Vec<OwWeather>) -> OwWeather {
    weather.into_iter().next().unwrap_or_else(|| OwWeather {
        main: "Unknown".to_string(),
        description: "Unknown".to_string(),
        icon: String::new(),
    })
}

#[async_trait]
impl WeatherService for OpenWeatherClient {
    async fn geocode(&self, query: &str, limit: usize) -> Result<Vec<Candidate>, FetchError> {
        let limit = limit.to_string();
        let parsed: Vec<OwGeoEntry> = self
            .get_json(
                Endpoint::Geocoding,
                GEOCODING_PATH,
                &[("q", query), ("limit", limit.as_str())],
            )
            .await?;

        Ok(parsed
            .into_iter()
            .map(|e| Candidate {
                name: e.name,
                country: e.country,
                state: e.state,
                latitude: e.lat,
                longitude: e.lon,
            })
            .collect())
    }

    async fn current_conditions(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, FetchError> {
        let (lat, lon) = (latitude.to_string(), longitude.to_string());
        let parsed: OwCurrentResponse = self
            .get_json(
                Endpoint::CurrentConditions,
                CURRENT_PATH,
                &[("lat", lat.as_str()), ("lon", lon.as_str()), ("units", UNITS)],
            )
            .await?;

        let weather = primary(parsed.weather);

        Ok(CurrentConditions {
            location_name: parsed.name,
            temperature_c: parsed.main.temp,
            condition: weather.main,
            description: weather.description,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
        })
    }

    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<ForecastSeries, FetchError> {
        let (lat, lon) = (latitude.to_string(), longitude.to_string());
        let parsed: OwForecastResponse = self
            .get_json(
                Endpoint::Forecast,
                FORECAST_PATH,
                &[("lat", lat.as_str()), ("lon", lon.as_str()), ("units", UNITS)],
            )
            .await?;

        Ok(parsed
            .list
            .into_iter()
            .map(|e| {
                let weather = primary(e.weather);
                ForecastEntry {
                    timestamp: e.dt,
                    local_time: e.dt_txt,
                    temperature_c: e.main.temp,
                    condition: weather.main,
                    icon_id: weather.icon,
                    description: weather.description,
                }
            })
            .collect())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
