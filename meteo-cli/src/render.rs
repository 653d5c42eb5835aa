//! Plain-text rendering of the views.

use std::fmt::Write;

use meteo_core::{
    ConditionTable, CurrentWeather, DetailsView, ForecastDay, SearchResult,
    view::{SummaryState, WeatherState},
};

/// One line per search candidate, unique enough to tell namesakes apart.
pub fn candidate(result: &SearchResult) -> String {
    format!(
        "{} ({:.2}, {:.2})",
        result.label(),
        result.latitude,
        result.longitude
    )
}

fn place(weather: &CurrentWeather) -> String {
    if weather.country.is_empty() {
        weather.location.clone()
    } else {
        format!("{}, {}", weather.location, weather.country)
    }
}

pub fn summary(state: &SummaryState, conditions: &ConditionTable) -> String {
    let mut out = String::new();

    match state.weather() {
        WeatherState::Idle => {
            out.push_str("Search for a city to see its weather.\n");
        }
        WeatherState::Loading { .. } => {
            out.push_str("Loading weather...\n");
        }
        WeatherState::Failed { reason, .. } => {
            let _ = writeln!(out, "⚠ {reason}");
        }
        WeatherState::Loaded(_) => {}
    }

    let Some(current) = state.current_weather() else {
        return out;
    };

    let code = current.weather_code;
    let _ = writeln!(out, "📍 {}", place(current));
    let _ = writeln!(
        out,
        "{}  {}, {}°C",
        conditions.icon_for(code),
        conditions.condition_for(code),
        current.temperature
    );
    let _ = writeln!(
        out,
        "Wind {} km/h · Humidity {}%",
        current.wind_speed, current.humidity
    );

    let forecast = state.forecast();
    if !forecast.is_empty() {
        let _ = writeln!(out, "\n{}-day forecast", forecast.len());
        for day in forecast {
            let _ = writeln!(out, "  {}", forecast_line(day, conditions));
        }
    }

    out
}

fn forecast_line(day: &ForecastDay, conditions: &ConditionTable) -> String {
    format!(
        "{}  {}  {}° / {}°",
        day.date.format("%a %d %b"),
        conditions.icon_for(day.weather_code),
        day.max_temp,
        day.min_temp
    )
}

pub fn details(view: &DetailsView) -> String {
    let mut out = String::new();
    let weather = view.weather();
    let code = weather.weather_code;

    let _ = writeln!(out, "Weather details for {}", place(weather));
    let _ = writeln!(
        out,
        "  {:<12}{} {}",
        "Condition",
        view.condition_for(code),
        view.icon_for(code)
    );
    let _ = writeln!(out, "  {:<12}{}°C", "Temperature", weather.temperature);
    let _ = writeln!(out, "  {:<12}{} km/h", "Wind speed", weather.wind_speed);
    let _ = writeln!(out, "  {:<12}{}%", "Humidity", weather.humidity);

    if view.forecast().is_empty() {
        return out;
    }

    out.push_str("\nForecast\n");
    for day in view.forecast() {
        let code = day.weather_code;
        let _ = writeln!(
            out,
            "  {:<28}{} {}  high {}°C  low {}°C",
            day.date.format("%A, %d %B %Y").to_string(),
            view.condition_for(code),
            view.icon_for(code),
            day.max_temp,
            day.min_temp
        );
    }

    out
}
