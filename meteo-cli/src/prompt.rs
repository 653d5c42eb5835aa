//! Interactive prompts built on `inquire`.

use std::fmt;

use anyhow::{Context, Result};
use inquire::{
    Confirm, CustomType, CustomUserError, Select, Text,
    autocompletion::{Autocomplete, Replacement},
};
use meteo_core::{Config, Coordinates, SearchResult, SummaryView};
use tokio::sync::{mpsc, watch};

use crate::render;

/// What the interactive search ended with.
#[derive(Debug)]
pub enum SearchPick {
    Candidate(SearchResult),
    /// Free text that matched no suggestion.
    Text(String),
    Cancelled,
}

/// Feeds every keystroke to the search debouncer and suggests whatever
/// results were applied last.
///
/// `inquire` only asks for suggestions when the input changes, so the list
/// reflects the search settled before the current keystroke.
#[derive(Clone)]
struct CityCompleter {
    keystrokes: mpsc::UnboundedSender<String>,
    results: watch::Receiver<Vec<SearchResult>>,
}

impl Autocomplete for CityCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        self.keystrokes.send(input.to_string())?;
        Ok(self.results.borrow().iter().map(render::candidate).collect())
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(highlighted_suggestion)
    }
}

const CITY_HELP: &str = "type at least 3 letters; suggestions trail your typing by one keystroke";

/// Runs a type-ahead city prompt against `view`'s search pipeline.
///
/// The view is moved into a driver task while the prompt is open and handed
/// back afterwards.
pub async fn interactive_search(mut view: SummaryView) -> Result<(SummaryView, SearchPick)> {
    let mut updates = view.start_search();
    let (keystrokes, mut keystroke_rx) = mpsc::unbounded_channel::<String>();
    let (results_tx, results) = watch::channel(Vec::new());

    let driver = tokio::spawn(async move {
        loop {
            tokio::select! {
                text = keystroke_rx.recv() => match text {
                    Some(text) => view.on_search_input(&text),
                    None => break,
                },
                Some(update) = updates.recv() => {
                    view.apply_search_update(update);
                    results_tx.send_replace(view.search_results().to_vec());
                }
            }
        }
        view
    });

    let completer = CityCompleter {
        keystrokes,
        results,
    };
    let answer = tokio::task::spawn_blocking(move || {
        Text::new("City:")
            .with_help_message(CITY_HELP)
            .with_autocomplete(completer)
            .prompt_skippable()
    })
    .await
    .context("City prompt stopped unexpectedly")?
    .context("City prompt failed")?;

    let view = driver.await.context("City search stopped unexpectedly")?;

    let pick = match answer {
        None => SearchPick::Cancelled,
        Some(answer) if answer.trim().is_empty() => SearchPick::Cancelled,
        Some(answer) => match view
            .search_results()
            .iter()
            .find(|r| render::candidate(r) == answer)
        {
            Some(candidate) => SearchPick::Candidate(candidate.clone()),
            None => SearchPick::Text(answer.trim().to_string()),
        },
    };

    Ok((view, pick))
}

struct Choice(SearchResult);

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render::candidate(&self.0))
    }
}

/// Lets the user pick one of `results`. A single result is taken as is.
pub fn choose_candidate(results: &[SearchResult]) -> Result<Option<SearchResult>> {
    match results {
        [] => Ok(None),
        [only] => Ok(Some(only.clone())),
        _ => {
            let options = results.iter().cloned().map(Choice).collect();
            let choice = Select::new("Which city?", options)
                .prompt_skippable()
                .context("City selection failed")?;
            Ok(choice.map(|c| c.0))
        }
    }
}

/// Asks whether meteo may use a location, and which one.
pub fn configure_location(config: &mut Config) -> Result<()> {
    let allowed = Confirm::new("Allow meteo to use your location?")
        .with_default(config.location.enabled)
        .prompt()?;

    if !allowed {
        config.location.enabled = false;
        return Ok(());
    }

    let latitude = CustomType::<f64>::new("Latitude:")
        .with_help_message("degrees north, -90 to 90 (Esc to skip)")
        .with_error_message("Please type a number, e.g. 51.5074")
        .prompt_skippable()?;

    let longitude = match latitude {
        Some(_) => CustomType::<f64>::new("Longitude:")
            .with_help_message("degrees east, -180 to 180")
            .with_error_message("Please type a number, e.g. -0.1278")
            .prompt_skippable()?,
        None => None,
    };

    match latitude.zip(longitude) {
        Some((lat, lon)) => config.set_location(Coordinates::new(lat, lon)),
        None => {
            config.location.enabled = true;
            config.clear_location();
        }
    }

    config.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oslo() -> SearchResult {
        SearchResult {
            id: 3143244,
            name: "Oslo".into(),
            country: "Norway".into(),
            latitude: 59.91273,
            longitude: 10.74609,
        }
    }

    #[test]
    fn suggestions_forward_input_and_show_last_applied_results() {
        let (keystrokes, mut keystroke_rx) = mpsc::unbounded_channel();
        let (results_tx, results) = watch::channel(Vec::new());
        let mut completer = CityCompleter {
            keystrokes,
            results,
        };

        assert!(completer.get_suggestions("Osl").expect("suggestions").is_empty());
        assert_eq!(keystroke_rx.try_recv().ok().as_deref(), Some("Osl"));

        results_tx.send_replace(vec![oslo()]);

        assert_eq!(
            completer.get_suggestions("Oslo").expect("suggestions"),
            vec!["Oslo, Norway (59.91, 10.75)".to_string()]
        );
        assert_eq!(keystroke_rx.try_recv().ok().as_deref(), Some("Oslo"));
    }

    #[test]
    fn suggestions_fail_once_search_has_stopped() {
        let (keystrokes, keystroke_rx) = mpsc::unbounded_channel();
        let (_results_tx, results) = watch::channel(Vec::new());
        let mut completer = CityCompleter {
            keystrokes,
            results,
        };
        drop(keystroke_rx);

        assert!(completer.get_suggestions("Oslo").is_err());
    }
}
