//! Event loop driver around [`Session`].
//!
//! Every state change goes through [`Engine::dispatch`], one event at a time.
//! Network work runs on spawned tasks that post their outcome back onto the
//! engine's channel as another event.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::warn;

use crate::{
    config::SearchConfig,
    debounce::Debouncer,
    error::FetchError,
    fetch::LocationFetcher,
    model::{Candidate, LocationWeather},
    preference::{PreferenceStore, Theme},
    provider::WeatherService,
    session::{Effect, RequestToken, Session},
    suggest::SuggestionResolver,
};

#[derive(Debug)]
pub enum Event {
    EditQuery(String),
    SelectCandidate(Candidate),
    ToggleTheme,
    SuggestionsResolved { token: RequestToken, candidates: Vec<Candidate> },
    FetchSettled { token: RequestToken, result: Result<LocationWeather, FetchError> },
}

#[derive(Debug)]
pub struct Engine {
    session: Session,
    resolver: SuggestionResolver,
    fetcher: LocationFetcher,
    debouncer: Debouncer,
    preferences: Box<dyn PreferenceStore>,
    tx: UnboundedSender<Event>,
    rx: UnboundedReceiver<Event>,
}

impl Engine {
    /// Build an engine; the stored theme is read here and only here.
    pub fn new(
        service: Arc<dyn WeatherService>,
        preferences: Box<dyn PreferenceStore>,
        search: SearchConfig,
    ) -> Self {
        let theme = Theme::load(preferences.as_ref());
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            session: Session::new(theme),
            resolver: SuggestionResolver::new(service.clone(), search.limit),
            fetcher: LocationFetcher::new(service),
            debouncer: Debouncer::new(search.debounce()),
            preferences,
            tx,
            rx,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Handle for posting events from outside the loop.
    pub fn sender(&self) -> UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Wait for the next event. The engine holds a sender, so this only
    /// returns `None` if the channel is closed elsewhere.
    pub async fn next_event(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Apply one event and run the effects it produces.
    /// Returns whether the session state changed.
    pub fn dispatch(&mut self, event: Event) -> bool {
        let (changed, effects) = match event {
            Event::EditQuery(text) => (true, self.session.edit_query(&text)),
            Event::SelectCandidate(candidate) => {
                let effects = self.session.select_candidate(candidate);
                (!effects.is_empty(), effects)
            }
            Event::ToggleTheme => (true, self.session.toggle_theme()),
            Event::SuggestionsResolved { token, candidates } => {
                (self.session.apply_suggestions(token, candidates), Vec::new())
            }
            Event::FetchSettled { token, result } => {
                (self.session.apply_fetch(token, result), Vec::new())
            }
        };

        for effect in effects {
            self.run(effect);
        }
        changed
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::ResolveSuggestions { token, query } => {
                let resolver = self.resolver.clone();
                let tx = self.tx.clone();
                self.debouncer.schedule(async move {
                    let candidates = resolver.resolve(&query).await;
                    let _ = tx.send(Event::SuggestionsResolved { token, candidates });
                });
            }
            Effect::CancelSuggestions => self.debouncer.cancel(),
            Effect::FetchLocation { token, location } => {
                let fetcher = self.fetcher.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = fetcher.fetch(&location).await;
                    let _ = tx.send(Event::FetchSettled { token, result });
                });
            }
            Effect::PersistTheme(theme) => {
                if let Err(err) = theme.persist(self.preferences.as_mut()) {
                    warn!(error = %err, %theme, "failed to persist theme preference");
                }
            }
        }
    }
}
