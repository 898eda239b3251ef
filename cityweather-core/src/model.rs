use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Template for condition icons; `{icon}` is the provider's identifier.
const ICON_URL_TEMPLATE: &str = "https://openweathermap.org/img/wn/{icon}@2x.png";

/// One disambiguation result for a location query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub country: String,
    /// Region within the country, when the geocoder reports one.
    pub state: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Candidate {
    /// Whether this candidate can be handed to the location fetcher.
    pub fn is_selectable(&self) -> bool {
        !self.name.trim().is_empty()
            && self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    pub fn label(&self) -> String {
        match &self.state {
            Some(state) if !state.is_empty() => {
                format!("{}, {}, {}", self.name, state, self.country)
            }
            _ => format!("{}, {}", self.name, self.country),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub temperature_c: f64,
    pub condition: String,
    pub description: String,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
}

/// A single sample of the provider's sub-daily forecast series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Epoch seconds.
    pub timestamp: i64,
    /// Provider-local wall clock time of the sample.
    pub local_time: NaiveDateTime,
    pub temperature_c: f64,
    pub condition: String,
    pub icon_id: String,
    pub description: String,
}

impl ForecastEntry {
    pub fn icon_url(&self) -> String {
        ICON_URL_TEMPLATE.replace("{icon}", &self.icon_id)
    }
}

pub type ForecastSeries = Vec<ForecastEntry>;

/// At most one entry per calendar day, chronological.
pub type DailyForecast = Vec<ForecastEntry>;

/// Combined result of one successful location fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationWeather {
    pub current: CurrentConditions,
    pub series: ForecastSeries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Loading => "loading",
            SessionStatus::Ready => "ready",
            SessionStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
