//! Core library for the `cityweather` client.
//!
//! This crate defines:
//! - Configuration and persisted display preferences
//! - The provider abstraction and its OpenWeather implementation
//! - Debounced, race-safe location suggestions
//! - The paired conditions/forecast fetch and the daily forecast reduction
//! - The search session state machine and the event loop that drives it
//!
//! It is used by `cityweather-cli`, but has no terminal dependencies of its own.

pub mod config;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod forecast;
pub mod model;
pub mod preference;
pub mod provider;
pub mod session;
pub mod suggest;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Config, ProviderConfig, SearchConfig};
pub use engine::{Engine, Event};
pub use error::{Endpoint, FetchError, SuggestionError};
pub use fetch::LocationFetcher;
pub use model::{
    Candidate, CurrentConditions, DailyForecast, ForecastEntry, ForecastSeries, LocationWeather,
    SessionStatus,
};
pub use preference::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, Theme};
pub use provider::{WeatherService, openweather::OpenWeatherClient, service_from_config};
pub use session::{Effect, FETCH_ERROR_MESSAGE, RequestToken, Session};
pub use suggest::SuggestionResolver;
