//! In-memory provider for unit tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use tokio::sync::Semaphore;

use crate::{
    error::{Endpoint, FetchError},
    model::{Candidate, CurrentConditions, ForecastEntry, ForecastSeries},
    provider::WeatherService,
};

/// Blocks matching fake requests until released.
#[derive(Debug, Clone)]
pub(crate) struct Gate(Arc<Semaphore>);

impl Gate {
    pub(crate) fn release(&self) {
        self.0.add_permits(64);
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeService {
    cities: Vec<Candidate>,
    geocode_status: Option<u16>,
    current_status: Option<u16>,
    forecast_status: Option<u16>,
    forecast_failing_at: Vec<(f64, f64)>,
    gates: Mutex<HashMap<String, Gate>>,
    geocode_log: Mutex<Vec<String>>,
    current_log: Mutex<Vec<(f64, f64)>>,
    forecast_log: Mutex<Vec<(f64, f64)>>,
}

pub(crate) fn coords_key(latitude: f64, longitude: f64) -> String {
    format!("{latitude},{longitude}")
}

impl FakeService {
    pub(crate) fn with_city(mut self, name: &str, country: &str, lat: f64, lon: f64) -> Self {
        self.cities.push(Candidate {
            name: name.to_string(),
            country: country.to_string(),
            state: None,
            latitude: lat,
            longitude: lon,
        });
        self
    }

    pub(crate) fn failing_geocode(mut self, status: u16) -> Self {
        self.geocode_status = Some(status);
        self
    }

    pub(crate) fn failing_current(mut self, status: u16) -> Self {
        self.current_status = Some(status);
        self
    }

    pub(crate) fn failing_forecast(mut self, status: u16) -> Self {
        self.forecast_status = Some(status);
        self
    }

    /// Forecast requests for these coordinates answer 500.
    pub(crate) fn forecast_failing_at(mut self, lat: f64, lon: f64) -> Self {
        self.forecast_failing_at.push((lat, lon));
        self
    }

    /// Hold requests keyed by a geocode query or by [`coords_key`].
    pub(crate) fn hold(&self, key: &str) -> Gate {
        let gate = Gate(Arc::new(Semaphore::new(0)));
        self.gates.lock().unwrap().insert(key.to_string(), gate.clone());
        gate
    }

    pub(crate) fn geocode_queries(&self) -> Vec<String> {
        self.geocode_log.lock().unwrap().clone()
    }

    pub(crate) fn geocode_calls(&self) -> usize {
        self.geocode_log.lock().unwrap().len()
    }

    pub(crate) fn current_calls(&self) -> Vec<(f64, f64)> {
        self.current_log.lock().unwrap().clone()
    }

    pub(crate) fn forecast_calls(&self) -> Vec<(f64, f64)> {
        self.forecast_log.lock().unwrap().clone()
    }

    async fn wait(&self, key: &str) {
        let gate = self.gates.lock().unwrap().get(key).cloned();
        if let Some(Gate(semaphore)) = gate {
            let _ = semaphore.acquire().await;
        }
    }
}

/// Two days of 3-hourly samples starting 2024-05-01 00:00.
pub(crate) fn two_day_series() -> ForecastSeries {
    let start = NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap();
    (0..16)
        .map(|step| {
            let local_time = start + Duration::hours(3 * step);
            ForecastEntry {
                timestamp: local_time.and_utc().timestamp(),
                local_time,
                temperature_c: 10.0 + step as f64,
                condition: "Clouds".to_string(),
                icon_id: "03d".to_string(),
                description: "scattered clouds".to_string(),
            }
        })
        .collect()
}

#[async_trait]
impl WeatherService for FakeService {
    async fn geocode(&self, query: &str, limit: usize) -> Result<Vec<Candidate>, FetchError> {
        self.geocode_log.lock().unwrap().push(query.to_string());
        self.wait(query).await;

        if let Some(status) = self.geocode_status {
            return Err(FetchError::Status { endpoint: Endpoint::Geocoding, status });
        }

        let needle = query.to_lowercase();
        Ok(self
            .cities
            .iter()
            .filter(|c| c.name.to_lowercase().starts_with(&needle))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn current_conditions(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, FetchError> {
        self.current_log.lock().unwrap().push((latitude, longitude));
        self.wait(&coords_key(latitude, longitude)).await;

        if let Some(status) = self.current_status {
            return Err(FetchError::Status { endpoint: Endpoint::CurrentConditions, status });
        }

        Ok(CurrentConditions {
            location_name: "Provider Station".to_string(),
            temperature_c: 14.2,
            condition: "Clouds".to_string(),
            description: "overcast clouds".to_string(),
            humidity_pct: 71,
            wind_speed_mps: 4.1,
        })
    }

    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<ForecastSeries, FetchError> {
        self.forecast_log.lock().unwrap().push((latitude, longitude));
        self.wait(&coords_key(latitude, longitude)).await;

        if let Some(status) = self.forecast_status {
            return Err(FetchError::Status { endpoint: Endpoint::Forecast, status });
        }
        if self.forecast_failing_at.contains(&(latitude, longitude)) {
            return Err(FetchError::Status { endpoint: Endpoint::Forecast, status: 500 });
        }

        Ok(two_day_series())
    }
}
