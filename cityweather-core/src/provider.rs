use crate::{
    Config,
    error::FetchError,
    model::{Candidate, CurrentConditions, ForecastSeries},
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Geocoding and weather data provider consumed by the core.
///
/// All measurements are requested in metric units.
#[async_trait]
pub trait WeatherService: Send + Sync + Debug {
    /// Candidates for a free-text place name, in provider order, at most `limit`.
    async fn geocode(&self, query: &str, limit: usize) -> Result<Vec<Candidate>, FetchError>;

    /// Current conditions at the given coordinates.
    ///
    /// The returned `location_name` is whatever the provider reports; callers
    /// that know the selected place name overwrite it.
    async fn current_conditions(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, FetchError>;

    /// Raw fixed-interval forecast series at the given coordinates.
    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<ForecastSeries, FetchError>;
}

/// Construct the OpenWeather-backed service from config.
pub fn service_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherService>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
             Hint: run `cityweather configure` or set OPENWEATHER_API_KEY."
        )
    })?;

    let client = OpenWeatherClient::with_base_url(api_key.to_owned(), &config.openweather.base_url);
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = service_from_config(&cfg).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("No OpenWeather API key configured"));
        assert!(msg.contains("Hint: run `cityweather configure`"));
    }

    #[test]
    fn service_from_config_works_when_key_is_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(service_from_config(&cfg).is_ok());
    }
}
