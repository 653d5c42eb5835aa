use crate::{
    error::{LocationError, classify_fetch_error},
    model::{CurrentWeather, ForecastDay, SearchResult, WeatherData},
};

/// Identifies one weather fetch. Tickets increase monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Where the weather part of the Summary view stands.
///
/// `Loading` and `Failed` keep the last successfully loaded data so it stays
/// on screen (and navigable) while a new fetch runs or after one fails.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WeatherState {
    #[default]
    Idle,
    Loading {
        stale: Option<WeatherData>,
    },
    Loaded(WeatherData),
    Failed {
        reason: String,
        stale: Option<WeatherData>,
    },
}

impl WeatherState {
    fn into_data(self) -> Option<WeatherData> {
        match self {
            WeatherState::Idle => None,
            WeatherState::Loading { stale } | WeatherState::Failed { stale, .. } => stale,
            WeatherState::Loaded(data) => Some(data),
        }
    }

    pub fn data(&self) -> Option<&WeatherData> {
        match self {
            WeatherState::Idle => None,
            WeatherState::Loading { stale } | WeatherState::Failed { stale, .. } => stale.as_ref(),
            WeatherState::Loaded(data) => Some(data),
        }
    }
}

/// Everything that can change the Summary view.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryEvent {
    FetchStarted(FetchTicket),
    FetchSucceeded(FetchTicket, WeatherData),
    /// `message` is the failure's text; it is bucketed into a user message.
    FetchFailed(FetchTicket, String),
    LocationFailed(LocationError),
    QueryChanged(String),
    SearchResults(Vec<SearchResult>),
    CandidateSelected,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub dropdown_open: bool,
}

/// State of the Summary view, changed only through [`SummaryState::apply`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryState {
    weather: WeatherState,
    search: SearchState,
    issued: u64,
}

impl SummaryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a ticket for a new fetch. Completions for older tickets are
    /// ignored from now on.
    pub fn next_ticket(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    fn is_latest(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.issued
    }

    pub fn apply(&mut self, event: SummaryEvent) {
        match event {
            SummaryEvent::FetchStarted(ticket) => {
                if !self.is_latest(ticket) {
                    return;
                }
                let stale = std::mem::take(&mut self.weather).into_data();
                self.weather = WeatherState::Loading { stale };
            }
            SummaryEvent::FetchSucceeded(ticket, data) => {
                if !self.is_latest(ticket) {
                    tracing::debug!(?ticket, "ignoring superseded weather result");
                    return;
                }
                self.weather = WeatherState::Loaded(data);
            }
            SummaryEvent::FetchFailed(ticket, message) => {
                if !self.is_latest(ticket) {
                    tracing::debug!(?ticket, "ignoring superseded weather failure");
                    return;
                }
                let stale = std::mem::take(&mut self.weather).into_data();
                self.weather = WeatherState::Failed {
                    reason: classify_fetch_error(&message).to_string(),
                    stale,
                };
            }
            SummaryEvent::LocationFailed(err) => {
                if matches!(self.weather, WeatherState::Loading { .. }) {
                    return;
                }
                let stale = std::mem::take(&mut self.weather).into_data();
                self.weather = WeatherState::Failed {
                    reason: err.user_message().to_string(),
                    stale,
                };
            }
            SummaryEvent::QueryChanged(query) => {
                self.search.query = query;
            }
            SummaryEvent::SearchResults(results) => {
                self.search.dropdown_open = !results.is_empty();
                self.search.results = results;
            }
            SummaryEvent::CandidateSelected => {
                self.search.dropdown_open = false;
                self.search.query.clear();
            }
        }
    }

    pub fn weather(&self) -> &WeatherState {
        &self.weather
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.weather, WeatherState::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.weather {
            WeatherState::Failed { reason, .. } => Some(reason),
            _ => None,
        }
    }

    pub fn current_weather(&self) -> Option<&CurrentWeather> {
        self.weather.data().map(|d| &d.current)
    }

    pub fn forecast(&self) -> &[ForecastDay] {
        self.weather.data().map(|d| d.forecast.as_slice()).unwrap_or_default()
    }
}
