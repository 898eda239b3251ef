use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    error::FetchError,
    model::{Candidate, LocationWeather},
    provider::WeatherService,
};

/// Retrieves current conditions and the forecast series for one location.
#[derive(Debug, Clone)]
pub struct LocationFetcher {
    service: Arc<dyn WeatherService>,
}

impl LocationFetcher {
    pub fn new(service: Arc<dyn WeatherService>) -> Self {
        Self { service }
    }

    /// Issue both requests concurrently and wait for both to settle.
    ///
    /// Success requires both; the first error (conditions before forecast)
    /// is returned otherwise. The reported location name is the candidate's.
    pub async fn fetch(&self, location: &Candidate) -> Result<LocationWeather, FetchError> {
        let (lat, lon) = (location.latitude, location.longitude);
        debug!(name = %location.name, lat, lon, "fetching conditions and forecast");

        let (current, series) = tokio::join!(
            self.service.current_conditions(lat, lon),
            self.service.forecast(lat, lon),
        );

        let mut current = current?;
        let series = series?;
        current.location_name = location.name.clone();

        info!(name = %location.name, samples = series.len(), "location weather fetched");
        Ok(LocationWeather { current, series })
    }
}
