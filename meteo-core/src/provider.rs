use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::FetchError,
    model::{CURRENT_LOCATION_LABEL, Coordinates, SearchResult, WeatherData},
};

pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

/// Source of forecasts and city candidates.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions plus the daily forecast at `coords`, shown under
    /// `location_label`.
    async fn fetch_forecast(
        &self,
        coords: Coordinates,
        location_label: String,
    ) -> Result<WeatherData, FetchError>;

    /// City candidates for `query`. Never fails: any problem yields an empty
    /// list.
    async fn search_cities(&self, query: &str) -> Vec<SearchResult>;

    async fn fetch_by_coordinates(&self, coords: Coordinates) -> Result<WeatherData, FetchError> {
        self.fetch_forecast(coords, CURRENT_LOCATION_LABEL.to_string()).await
    }

    async fn fetch_by_city(
        &self,
        name: &str,
        country: &str,
        coords: Coordinates,
    ) -> Result<WeatherData, FetchError> {
        self.fetch_forecast(coords, format!("{name}, {country}")).await
    }
}
