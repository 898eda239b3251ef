use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use cityweather_core::{
    Config, Engine, Event, FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, Session,
    service_from_config,
};

use crate::render;

/// One line of user input, interpreted against the current session.
#[derive(Debug)]
enum Input {
    Event(Event),
    Help,
    Quit,
    Invalid(String),
}

fn parse_input(line: &str, session: &Session) -> Input {
    let trimmed = line.trim();

    match trimmed {
        ":q" | ":quit" => return Input::Quit,
        ":h" | ":help" => return Input::Help,
        ":theme" => return Input::Event(Event::ToggleTheme),
        _ => {}
    }

    if let Some(number) = trimmed.strip_prefix('#') {
        let candidates = session.candidates();
        return match number.parse::<usize>() {
            Ok(n) if (1..=candidates.len()).contains(&n) => {
                Input::Event(Event::SelectCandidate(candidates[n - 1].clone()))
            }
            _ if candidates.is_empty() => Input::Invalid("No suggestions to pick from.".into()),
            _ => Input::Invalid(format!("Pick a suggestion between #1 and #{}.", candidates.len())),
        };
    }

    Input::Event(Event::EditQuery(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn open_preferences() -> Box<dyn PreferenceStore> {
    match FilePreferenceStore::open_default() {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!(error = %err, "preferences unavailable; theme changes will not be saved");
            Box::new(MemoryPreferenceStore::default())
        }
    }
}

/// Run the interactive session until `:quit` or end of input.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let service = service_from_config(&config)?;
    let mut engine = Engine::new(service, open_preferences(), config.search);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    render::print_help();
    render::print_session(engine.session());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                match parse_input(&line, engine.session()) {
                    Input::Quit => break,
                    Input::Help => render::print_help(),
                    Input::Invalid(message) => println!("{message}"),
                    Input::Event(event) => {
                        if engine.dispatch(event) {
                            render::print_session(engine.session());
                        }
                    }
                }
            }
            Some(event) = engine.next_event() => {
                if engine.dispatch(event) {
                    render::print_session(engine.session());
                }
            }
        }
    }

    Ok(())
}
