use serde::{Deserialize, Serialize};

use crate::model::{CurrentWeather, ForecastDay};

/// Snapshot handed from the Summary view to the Details view.
///
/// It is moved into the Details view when that view is opened and read once.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DetailsHandoff {
    pub weather: Option<CurrentWeather>,
    pub forecast: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Summary,
    Details(DetailsHandoff),
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::Summary => "summary",
            Route::Details(_) => "details",
        }
    }
}

pub trait Navigator {
    fn navigate(&mut self, route: Route);
}

/// Remembers every navigation, newest last.
#[derive(Debug, Default)]
pub struct RouteHistory {
    routes: Vec<Route>,
}

impl RouteHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Route> {
        self.routes.last()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Removes and returns the newest route.
    pub fn take_current(&mut self) -> Option<Route> {
        self.routes.pop()
    }
}

impl Navigator for RouteHistory {
    fn navigate(&mut self, route: Route) {
        tracing::debug!(route = route.name(), "navigating");
        self.routes.push(route);
    }
}
