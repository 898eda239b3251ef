use std::sync::Arc;

use tracing::{debug, warn};

use crate::{error::SuggestionError, model::Candidate, provider::WeatherService};

/// Turns free text into location candidates.
///
/// Lookups are advisory: a failed lookup yields no candidates and is only logged.
/// Ordering between concurrent lookups is the caller's concern; the session
/// tags each one with a request token and drops superseded results.
#[derive(Debug, Clone)]
pub struct SuggestionResolver {
    service: Arc<dyn WeatherService>,
    limit: usize,
}

impl SuggestionResolver {
    pub fn new(service: Arc<dyn WeatherService>, limit: usize) -> Self {
        Self { service, limit }
    }

    /// Blank queries resolve to nothing without contacting the provider.
    pub async fn try_resolve(&self, query: &str) -> Result<Vec<Candidate>, SuggestionError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        debug!(query, "resolving suggestions");
        let mut candidates = self.service.geocode(query, self.limit).await?;
        candidates.truncate(self.limit);
        Ok(candidates)
    }

    pub async fn resolve(&self, query: &str) -> Vec<Candidate> {
        match self.try_resolve(query).await {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(query, error = %err, "no suggestions available");
                Vec::new()
            }
        }
    }
}
