//! Headless Summary and Details views.
//!
//! The views hold display state and talk to the provider; rendering them is
//! up to the host.

pub mod details;
pub mod navigation;
pub mod state;
pub mod summary;

pub use details::DetailsView;
pub use navigation::{DetailsHandoff, Navigator, Route, RouteHistory};
pub use state::{FetchTicket, SearchState, SummaryEvent, SummaryState, WeatherState};
pub use summary::{FetchResult, SummaryView};
