//! Search session state machine.
//!
//! `Session` owns every piece of shared search state and is only changed by
//! its transition methods. Transitions are synchronous and return the
//! [`Effect`]s the caller must run; asynchronous results come back tagged
//! with the [`RequestToken`] they were issued under and are dropped when a
//! newer request has superseded them.

use tracing::{debug, error, info, warn};

use crate::{
    error::FetchError,
    forecast,
    model::{Candidate, CurrentConditions, DailyForecast, LocationWeather, SessionStatus},
    preference::Theme,
};

/// The only failure text shown to the user.
pub const FETCH_ERROR_MESSAGE: &str = "Network error or API key issue";

/// Identifies one issued request within a [`Generation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// Monotonic token source; only the most recently issued token is current.
#[derive(Debug, Default)]
pub struct Generation {
    latest: u64,
}

impl Generation {
    pub fn advance(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}

/// Work a transition asks the driver to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Resolve suggestions for `query` after the debounce delay.
    ResolveSuggestions { token: RequestToken, query: String },
    /// Drop any suggestion lookup still waiting out its delay.
    CancelSuggestions,
    FetchLocation { token: RequestToken, location: Candidate },
    PersistTheme(Theme),
}

#[derive(Debug, Default)]
pub struct Session {
    query: String,
    candidates: Vec<Candidate>,
    selected: Option<Candidate>,
    status: SessionStatus,
    current: Option<CurrentConditions>,
    daily: DailyForecast,
    error: Option<&'static str>,
    theme: Theme,
    suggestions: Generation,
    fetches: Generation,
}

impl Session {
    pub fn new(theme: Theme) -> Self {
        Self { theme, ..Self::default() }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn selected(&self) -> Option<&Candidate> {
        self.selected.as_ref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Loading
    }

    pub fn current(&self) -> Option<&CurrentConditions> {
        self.current.as_ref()
    }

    pub fn daily(&self) -> &DailyForecast {
        &self.daily
    }

    /// The error slot; only populated while the status is `error`.
    pub fn error_message(&self) -> Option<&'static str> {
        match self.status {
            SessionStatus::Error => self.error,
            _ => None,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// The user changed the query text.
    ///
    /// Location data is cleared immediately and any in-flight fetch becomes
    /// stale. A blank query empties the candidate list without a lookup.
    pub fn edit_query(&mut self, text: &str) -> Vec<Effect> {
        self.query = text.to_string();
        self.selected = None;
        self.current = None;
        self.daily.clear();
        self.error = None;
        self.status = SessionStatus::Idle;
        self.fetches.advance();

        let token = self.suggestions.advance();
        if text.trim().is_empty() {
            self.candidates.clear();
            vec![Effect::CancelSuggestions]
        } else {
            vec![Effect::ResolveSuggestions { token, query: text.to_string() }]
        }
    }

    /// The user picked a candidate. Previous location data stays visible
    /// until the new fetch settles.
    pub fn select_candidate(&mut self, candidate: Candidate) -> Vec<Effect> {
        if !candidate.is_selectable() {
            warn!(name = %candidate.name, "ignoring selection without name or valid coordinates");
            return Vec::new();
        }

        info!(location = %candidate.label(), "location selected");
        self.query = candidate.name.clone();
        self.candidates.clear();
        self.selected = Some(candidate.clone());
        self.status = SessionStatus::Loading;
        self.suggestions.advance();

        let token = self.fetches.advance();
        vec![
            Effect::CancelSuggestions,
            Effect::FetchLocation { token, location: candidate },
        ]
    }

    /// Replace the candidate list if `token` is still the latest lookup.
    pub fn apply_suggestions(&mut self, token: RequestToken, candidates: Vec<Candidate>) -> bool {
        if !self.suggestions.is_current(token) {
            debug!(?token, "discarding superseded suggestions");
            return false;
        }

        self.candidates = candidates;
        true
    }

    /// Settle the fetch issued under `token`, unless it has been superseded.
    pub fn apply_fetch(
        &mut self,
        token: RequestToken,
        result: Result<LocationWeather, FetchError>,
    ) -> bool {
        if !self.fetches.is_current(token) {
            debug!(?token, ok = result.is_ok(), "discarding superseded fetch result");
            return false;
        }

        match result {
            Ok(weather) => {
                self.daily = forecast::reduce(&weather.series);
                self.current = Some(weather.current);
                self.error = None;
                self.status = SessionStatus::Ready;
            }
            Err(err) => {
                error!(error = %err, status = ?err.status(), "location fetch failed");
                self.current = None;
                self.daily.clear();
                self.error = Some(FETCH_ERROR_MESSAGE);
                self.status = SessionStatus::Error;
            }
        }
        true
    }

    /// Flip the theme. Never touches the search state.
    pub fn toggle_theme(&mut self) -> Vec<Effect> {
        self.theme = self.theme.toggled();
        vec![Effect::PersistTheme(self.theme)]
    }
}
