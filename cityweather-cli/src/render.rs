//! Plain-text presentation of the session.

use cityweather_core::{CurrentConditions, ForecastEntry, Session, SessionStatus, Theme};

fn accent(theme: Theme, text: &str) -> String {
    let code = match theme {
        Theme::Light => "34",
        Theme::Dark => "93",
    };
    format!("\x1b[{code}m{text}\x1b[0m")
}

pub fn print_help() {
    println!("Type a city name to search. Commands:");
    println!("  #N       pick suggestion N");
    println!("  :theme   switch light/dark");
    println!("  :help    show this help");
    println!("  :quit    exit");
}

pub fn print_session(session: &Session) {
    let theme = session.theme();
    println!();
    println!("{} [{} mode]", accent(theme, "Weather Forecast"), theme);
    println!("Search: {}", session.query());

    for (i, candidate) in session.candidates().iter().enumerate() {
        println!("  #{} {}", i + 1, candidate.label());
    }

    match session.status() {
        SessionStatus::Loading => println!("Loading..."),
        SessionStatus::Error => {
            if let Some(message) = session.error_message() {
                println!("{}", accent(theme, message));
            }
        }
        SessionStatus::Idle | SessionStatus::Ready => {}
    }

    if let Some(current) = session.current() {
        print_location(theme, current, session.daily());
    }
}

pub fn print_location(theme: Theme, current: &CurrentConditions, daily: &[ForecastEntry]) {
    println!("{}", accent(theme, &current.location_name));
    println!("  {:.1}°C  {}", current.temperature_c, current.condition);
    println!("  Humidity: {}%", current.humidity_pct);
    println!("  Wind: {} m/s", current.wind_speed_mps);

    if daily.is_empty() {
        return;
    }
    println!("Forecast:");
    for day in daily {
        println!(
            "  {}  {:>5.1}°C  {:<12} {}",
            day.local_time.format("%a"),
            day.temperature_c,
            day.condition,
            day.icon_url(),
        );
    }
}
