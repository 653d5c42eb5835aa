//! Debounced city search.
//!
//! Raw query text goes in through [`SearchDebouncer::push`]. Once input has
//! been quiet for the debounce window, the latest text is issued as a search
//! unless it equals the previously issued text. Text shorter than the minimum
//! length is never sent to the provider and yields an empty result list.
//!
//! Every issued query takes a new generation number. Only results belonging
//! to the newest generation are forwarded; anything older is dropped when it
//! arrives.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, sleep_until},
};
use tokio_util::sync::CancellationToken;

use crate::{config::SearchConfig, model::SearchResult, provider::WeatherProvider};

/// Timing and length rules for the debouncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub min_query_len: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchSettings {
    fn from(cfg: &SearchConfig) -> Self {
        Self {
            debounce: cfg.debounce(),
            min_query_len: cfg.min_query_len,
        }
    }
}

/// Results for the newest issued query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchUpdate {
    pub generation: u64,
    pub query: String,
    pub results: Vec<SearchResult>,
}

/// Handle to a running debouncer task. Dropping it cancels the task.
#[derive(Debug)]
pub struct SearchDebouncer {
    input: mpsc::UnboundedSender<String>,
    cancel: CancellationToken,
}

impl SearchDebouncer {
    /// Starts the debouncer on the current tokio runtime.
    pub fn spawn(
        provider: Arc<dyn WeatherProvider>,
        settings: SearchSettings,
    ) -> (Self, mpsc::UnboundedReceiver<SearchUpdate>) {
        let (input, input_rx) = mpsc::unbounded_channel();
        let (output_tx, output) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        tokio::spawn(run(provider, settings, input_rx, output_tx, cancel.clone()));

        (Self { input, cancel }, output)
    }

    /// Feeds the current query text. Restarts the debounce window.
    pub fn push(&self, query: impl Into<String>) {
        if self.input.send(query.into()).is_err() {
            tracing::debug!("search input after debouncer stopped");
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct Completed {
    generation: u64,
    query: String,
    results: Vec<SearchResult>,
}

async fn run(
    provider: Arc<dyn WeatherProvider>,
    settings: SearchSettings,
    mut input: mpsc::UnboundedReceiver<String>,
    output: mpsc::UnboundedSender<SearchUpdate>,
    cancel: CancellationToken,
) {
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completed>();

    let mut pending: Option<(String, Instant)> = None;
    let mut last_issued: Option<String> = None;
    let mut generation: u64 = 0;
    let mut in_flight: Option<JoinHandle<()>> = None;

    loop {
        let deadline = pending.as_ref().map(|(_, at)| *at);

        tokio::select! {
            biased;

            _ = cancel.cancelled() => break,

            query = input.recv() => match query {
                Some(query) => pending = Some((query, Instant::now() + settings.debounce)),
                None => break,
            },

            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                let Some((query, _)) = pending.take() else { continue };

                if last_issued.as_deref() == Some(query.as_str()) {
                    tracing::trace!(%query, "query unchanged, not reissued");
                    continue;
                }
                last_issued = Some(query.clone());
                generation += 1;

                if let Some(stale) = in_flight.take() {
                    stale.abort();
                }

                if query.chars().count() < settings.min_query_len {
                    let update = SearchUpdate { generation, query, results: Vec::new() };
                    if output.send(update).is_err() {
                        break;
                    }
                    continue;
                }

                let provider = Arc::clone(&provider);
                let done_tx = done_tx.clone();
                in_flight = Some(tokio::spawn(async move {
                    let results = provider.search_cities(&query).await;
                    let _ = done_tx.send(Completed { generation, query, results });
                }));
            }

            Some(done) = done_rx.recv() => {
                if done.generation != generation {
                    tracing::debug!(
                        query = %done.query,
                        stale = done.generation,
                        latest = generation,
                        "discarding superseded search results"
                    );
                    continue;
                }
                in_flight = None;

                let update = SearchUpdate {
                    generation: done.generation,
                    query: done.query,
                    results: done.results,
                };
                if output.send(update).is_err() {
                    break;
                }
            }
        }
    }

    if let Some(task) = in_flight {
        task.abort();
    }
}
