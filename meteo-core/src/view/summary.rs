use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    conditions::ConditionTable,
    error::FetchError,
    location::LocationResolver,
    model::{Coordinates, CurrentWeather, ForecastDay, SearchResult, WeatherData},
    provider::WeatherProvider,
    search::{SearchDebouncer, SearchSettings, SearchUpdate},
};

use super::{
    navigation::{DetailsHandoff, Navigator, Route},
    state::{FetchTicket, SummaryEvent, SummaryState},
};

/// Outcome of a weather fetch started by a [`SummaryView`]. Feed it back
/// through [`SummaryView::apply_fetch_result`].
#[derive(Debug)]
pub struct FetchResult {
    ticket: FetchTicket,
    outcome: Result<WeatherData, FetchError>,
}

impl FetchResult {
    pub fn ticket(&self) -> FetchTicket {
        self.ticket
    }
}

/// The landing view: weather for the current position or a searched city,
/// plus the city search box.
#[derive(Debug)]
pub struct SummaryView {
    provider: Arc<dyn WeatherProvider>,
    resolver: LocationResolver,
    conditions: Arc<ConditionTable>,
    search_settings: SearchSettings,
    debouncer: Option<SearchDebouncer>,
    fetch_tx: mpsc::UnboundedSender<FetchResult>,
    fetch_rx: Option<mpsc::UnboundedReceiver<FetchResult>>,
    state: SummaryState,
}

impl SummaryView {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        resolver: LocationResolver,
        conditions: Arc<ConditionTable>,
        search_settings: SearchSettings,
    ) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
        Self {
            provider,
            resolver,
            conditions,
            search_settings,
            debouncer: None,
            fetch_tx,
            fetch_rx: Some(fetch_rx),
            state: SummaryState::new(),
        }
    }

    /// Hands out the stream of weather fetch completions. Only the first
    /// call gets it.
    pub fn take_fetch_results(&mut self) -> Option<mpsc::UnboundedReceiver<FetchResult>> {
        self.fetch_rx.take()
    }

    /// Starts the search pipeline, resolves the current position and starts
    /// loading its weather. Returns the stream of search results to feed back
    /// through [`SummaryView::apply_search_update`].
    pub async fn activate(&mut self) -> mpsc::UnboundedReceiver<SearchUpdate> {
        let updates = self.start_search();
        self.load_current_location().await;
        updates
    }

    /// Starts (or restarts) the search debouncer.
    pub fn start_search(&mut self) -> mpsc::UnboundedReceiver<SearchUpdate> {
        let (debouncer, updates) =
            SearchDebouncer::spawn(Arc::clone(&self.provider), self.search_settings);
        self.debouncer = Some(debouncer);
        updates
    }

    /// Stops the search debouncer. In-flight weather fetches are unaffected.
    pub fn deactivate(&mut self) {
        if let Some(debouncer) = self.debouncer.take() {
            debouncer.cancel();
        }
    }

    /// Waits for the position, then starts the fetch for it.
    pub async fn load_current_location(&mut self) -> Option<FetchTicket> {
        match self.resolver.resolve().await {
            Ok(coords) => Some(self.load_weather(coords)),
            Err(err) => {
                self.state.apply(SummaryEvent::LocationFailed(err));
                None
            }
        }
    }

    pub fn load_weather(&mut self, coords: Coordinates) -> FetchTicket {
        let provider = Arc::clone(&self.provider);
        self.spawn_fetch(async move { provider.fetch_by_coordinates(coords).await })
    }

    /// Starts loading weather for a search candidate. The query and dropdown
    /// are cleared right away, whatever the fetch's outcome.
    pub fn select_candidate(&mut self, candidate: &SearchResult) -> FetchTicket {
        self.state.apply(SummaryEvent::CandidateSelected);

        let provider = Arc::clone(&self.provider);
        let candidate = candidate.clone();
        self.spawn_fetch(async move {
            provider
                .fetch_by_city(&candidate.name, &candidate.country, candidate.coordinates())
                .await
        })
    }

    fn spawn_fetch<F>(&mut self, fetch: F) -> FetchTicket
    where
        F: Future<Output = Result<WeatherData, FetchError>> + Send + 'static,
    {
        let ticket = self.state.next_ticket();
        self.state.apply(SummaryEvent::FetchStarted(ticket));

        let results = self.fetch_tx.clone();
        tokio::spawn(async move {
            let outcome = fetch.await;
            if results.send(FetchResult { ticket, outcome }).is_err() {
                tracing::debug!(?ticket, "summary view gone, dropping weather result");
            }
        });
        ticket
    }

    /// Applies a fetch completion. Results of superseded fetches are ignored.
    pub fn apply_fetch_result(&mut self, result: FetchResult) {
        let event = match result.outcome {
            Ok(data) => SummaryEvent::FetchSucceeded(result.ticket, data),
            Err(err) => SummaryEvent::FetchFailed(result.ticket, err.to_string()),
        };
        self.state.apply(event);
    }

    /// Records the typed query and hands it to the debouncer.
    pub fn on_search_input(&mut self, text: &str) {
        self.state.apply(SummaryEvent::QueryChanged(text.to_string()));

        match &self.debouncer {
            Some(debouncer) => debouncer.push(text),
            None => tracing::debug!("search input before search was started"),
        }
    }

    pub fn apply_search_update(&mut self, update: SearchUpdate) {
        self.state.apply(SummaryEvent::SearchResults(update.results));
    }

    /// Opens the Details view with a copy of the loaded weather. Does nothing
    /// while no weather is loaded.
    pub fn navigate_to_details(&self, navigator: &mut dyn Navigator) {
        let Some(weather) = self.state.current_weather() else {
            return;
        };

        navigator.navigate(Route::Details(DetailsHandoff {
            weather: Some(weather.clone()),
            forecast: self.state.forecast().to_vec(),
        }));
    }

    pub fn condition_for(&self, code: Option<i32>) -> &'static str {
        self.conditions.condition_for(code)
    }

    pub fn icon_for(&self, code: Option<i32>) -> &'static str {
        self.conditions.icon_for(code)
    }

    pub fn state(&self) -> &SummaryState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    pub fn current_weather(&self) -> Option<&CurrentWeather> {
        self.state.current_weather()
    }

    pub fn forecast(&self) -> &[ForecastDay] {
        self.state.forecast()
    }

    pub fn search_query(&self) -> &str {
        &self.state.search().query
    }

    pub fn search_results(&self) -> &[SearchResult] {
        &self.state.search().results
    }

    pub fn dropdown_open(&self) -> bool {
        self.state.search().dropdown_open
    }

    pub fn conditions(&self) -> &Arc<ConditionTable> {
        &self.conditions
    }
}

impl Drop for SummaryView {
    fn drop(&mut self) {
        self.deactivate();
    }
}
