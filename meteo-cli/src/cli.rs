use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use meteo_core::{
    ConditionTable, Config, Coordinates, DetailsView, FetchResult, FixedGeolocator,
    LocationResolver, OpenMeteoClient, Route, RouteHistory, SearchResult, SearchSettings,
    SummaryView,
};
use tokio::sync::mpsc;

use crate::{prompt, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Current weather and a 5-day forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Choose whether and where meteo may locate you.
    Configure,

    /// Show weather for your current location.
    Show {
        /// Latitude to use instead of the configured location.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude to use instead of the configured location.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Also open the details view.
        #[arg(long)]
        details: bool,
    },

    /// Search for a city and show its weather.
    Search {
        /// City name; omit it to search interactively as you type.
        query: Option<String>,

        /// Also open the details view.
        #[arg(long)]
        details: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { lat, lon, details } => {
                let position = lat.zip(lon).map(|(lat, lon)| Coordinates::new(lat, lon));
                show(position, details).await
            }
            Command::Search { query, details } => search(query, details).await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    prompt::configure_location(&mut config)?;
    config.save()?;

    let path = Config::config_file_path()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(position: Option<Coordinates>, details: bool) -> Result<()> {
    let config = Config::load()?;

    let resolver = match position {
        Some(coords) => LocationResolver::new(
            Some(Arc::new(FixedGeolocator::new(coords))),
            config.location.timeout(),
        ),
        None => LocationResolver::from_config(&config.location),
    };

    let mut view = summary_view(&config, resolver)?;
    let mut fetches = fetch_results(&mut view)?;
    let _search_updates = view.activate().await;

    settle(&mut view, &mut fetches).await;
    present(&view, details);
    Ok(())
}

async fn search(query: Option<String>, details: bool) -> Result<()> {
    let config = Config::load()?;
    let view = summary_view(&config, LocationResolver::from_config(&config.location))?;

    let (mut view, query) = match query {
        Some(query) => (view, query),
        None => match prompt::interactive_search(view).await? {
            (view, prompt::SearchPick::Candidate(candidate)) => {
                return load_candidate(view, candidate, details).await;
            }
            (view, prompt::SearchPick::Text(query)) => (view, query),
            (_, prompt::SearchPick::Cancelled) => return Ok(()),
        },
    };

    let mut updates = view.start_search();
    view.on_search_input(&query);
    if let Some(update) = updates.recv().await {
        view.apply_search_update(update);
    }

    match prompt::choose_candidate(view.search_results())? {
        Some(candidate) => load_candidate(view, candidate, details).await,
        None => {
            println!("No cities found for \"{query}\".");
            Ok(())
        }
    }
}

async fn load_candidate(
    mut view: SummaryView,
    candidate: SearchResult,
    details: bool,
) -> Result<()> {
    let mut fetches = fetch_results(&mut view)?;

    tracing::info!(city = %candidate.label(), "loading weather for selected city");
    view.select_candidate(&candidate);

    settle(&mut view, &mut fetches).await;
    present(&view, details);
    Ok(())
}

fn fetch_results(view: &mut SummaryView) -> Result<mpsc::UnboundedReceiver<FetchResult>> {
    view.take_fetch_results().context("Weather results were already claimed")
}

/// Shows the loading state, then applies fetch results until the latest
/// fetch has finished.
async fn settle(view: &mut SummaryView, fetches: &mut mpsc::UnboundedReceiver<FetchResult>) {
    if !view.is_loading() {
        return;
    }
    print!("{}", render::summary(view.state(), view.conditions()));

    while view.is_loading() {
        let Some(result) = fetches.recv().await else {
            tracing::warn!("weather fetch channel closed while loading");
            return;
        };
        tracing::debug!(ticket = ?result.ticket(), "weather fetch finished");
        view.apply_fetch_result(result);
    }
}

fn summary_view(config: &Config, resolver: LocationResolver) -> Result<SummaryView> {
    let client = OpenMeteoClient::new(&config.api).context("Failed to set up weather client")?;

    Ok(SummaryView::new(
        Arc::new(client),
        resolver,
        Arc::new(ConditionTable::open_meteo()),
        SearchSettings::from(&config.search),
    ))
}

/// Prints the Summary view and, if asked, navigates on to the Details view.
fn present(view: &SummaryView, details: bool) {
    print!("{}", render::summary(view.state(), view.conditions()));

    if !details {
        return;
    }

    let mut history = RouteHistory::new();
    view.navigate_to_details(&mut history);

    let handoff = match history.take_current() {
        Some(Route::Details(handoff)) => Some(handoff),
        _ => None,
    };

    match DetailsView::open(handoff, Arc::clone(view.conditions()), &mut history) {
        Some(details_view) => {
            println!();
            print!("{}", render::details(&details_view));
        }
        None => println!("\nNo weather loaded, so there are no details to show."),
    }
}
