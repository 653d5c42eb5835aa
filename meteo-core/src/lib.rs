//! Core library for the `meteo` weather lookup client.
//!
//! This crate defines:
//! - Configuration handling
//! - The Open-Meteo client and the response normalization
//! - Location resolution and debounced city search
//! - Headless Summary/Details views and their state machine
//!
//! It is used by `meteo-cli`, but can also be driven by any other host.

pub mod conditions;
pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;
pub mod search;
pub mod view;

pub use conditions::ConditionTable;
pub use config::Config;
pub use error::{FetchError, LocationError, classify_fetch_error};
pub use location::{FixedGeolocator, Geolocator, LocationResolver};
pub use model::{Coordinates, CurrentWeather, ForecastDay, SearchResult, WeatherData};
pub use provider::{OpenMeteoClient, WeatherProvider};
pub use search::{SearchDebouncer, SearchSettings, SearchUpdate};
pub use view::{
    DetailsHandoff, DetailsView, FetchResult, Navigator, Route, RouteHistory, SummaryView,
};
