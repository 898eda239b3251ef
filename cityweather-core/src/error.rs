use thiserror::Error;

/// Which provider endpoint a request went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Geocoding,
    CurrentConditions,
    Forecast,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Geocoding => "geocoding",
            Endpoint::CurrentConditions => "current conditions",
            Endpoint::Forecast => "forecast",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single provider request.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Non-success HTTP status; the code is kept for diagnostics.
    #[error("{endpoint} request failed with status {status}")]
    Status { endpoint: Endpoint, status: u16 },

    #[error("{endpoint} request could not be completed: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse {endpoint} response: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            FetchError::Status { endpoint, .. }
            | FetchError::Transport { endpoint, .. }
            | FetchError::Decode { endpoint, .. } => *endpoint,
        }
    }

    /// HTTP status code, when the failure was a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure resolving suggestions. Never surfaced to the user.
#[derive(Debug, Error)]
#[error("suggestion lookup failed: {0}")]
pub struct SuggestionError(#[from] pub FetchError);
