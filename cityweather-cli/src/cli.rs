use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};

use cityweather_core::{
    Config, FilePreferenceStore, LocationFetcher, SuggestionResolver, Theme, forecast,
    service_from_config,
};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Find a city and show its weather")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive search session (the default).
    Search,

    /// Show current conditions and the daily forecast for a place.
    Show {
        /// Place name, e.g. "London".
        query: String,

        /// Which of the matching places to use, starting at 1.
        #[arg(long, default_value_t = 1)]
        pick: usize,
    },

    /// Store the OpenWeather API key.
    Configure,

    /// Print the stored display theme.
    Theme {
        /// Switch between light and dark and persist the result.
        #[arg(long)]
        toggle: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Search) {
            Command::Search => interactive::run(Config::load()?).await,
            Command::Show { query, pick } => show(&query, pick).await,
            Command::Configure => configure(),
            Command::Theme { toggle } => theme(toggle),
        }
    }
}

async fn show(query: &str, pick: usize) -> anyhow::Result<()> {
    let config = Config::load()?;
    let service = service_from_config(&config)?;

    let resolver = SuggestionResolver::new(service.clone(), config.search.limit);
    let candidates = resolver
        .try_resolve(query)
        .await
        .with_context(|| format!("Failed to look up places matching '{query}'"))?;

    if candidates.is_empty() {
        bail!("No places match '{query}'.");
    }
    let Some(location) = pick.checked_sub(1).and_then(|i| candidates.get(i)) else {
        bail!("--pick must be between 1 and {}.", candidates.len());
    };

    let weather = LocationFetcher::new(service)
        .fetch(location)
        .await
        .with_context(|| format!("Failed to fetch weather for {}", location.label()))?;

    let theme = FilePreferenceStore::open_default()
        .map(|store| Theme::load(&store))
        .unwrap_or_default();
    let daily = forecast::reduce(&weather.series);

    render::print_location(theme, &weather.current, &daily);
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty.");
    }

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn theme(toggle: bool) -> anyhow::Result<()> {
    let mut store = FilePreferenceStore::open_default()?;
    let mut theme = Theme::load(&store);

    if toggle {
        theme = theme.toggled();
        theme.persist(&mut store)?;
    }

    println!("{theme}");
    Ok(())
}
