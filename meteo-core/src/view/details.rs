use std::sync::Arc;

use crate::{
    conditions::ConditionTable,
    model::{CurrentWeather, ForecastDay},
};

use super::navigation::{DetailsHandoff, Navigator, Route};

/// Read-only view over a weather snapshot handed over by the Summary view.
#[derive(Debug, Clone)]
pub struct DetailsView {
    weather: CurrentWeather,
    forecast: Vec<ForecastDay>,
    conditions: Arc<ConditionTable>,
}

impl DetailsView {
    /// Opens the view over `handoff`.
    ///
    /// Without a handoff, or with one that carries no weather, this navigates
    /// straight back to the Summary view and returns `None`.
    pub fn open(
        handoff: Option<DetailsHandoff>,
        conditions: Arc<ConditionTable>,
        navigator: &mut dyn Navigator,
    ) -> Option<Self> {
        let Some(DetailsHandoff {
            weather: Some(weather),
            forecast,
        }) = handoff
        else {
            tracing::debug!("details opened without weather, redirecting to summary");
            navigator.navigate(Route::Summary);
            return None;
        };

        Some(Self {
            weather,
            forecast,
            conditions,
        })
    }

    pub fn weather(&self) -> &CurrentWeather {
        &self.weather
    }

    pub fn forecast(&self) -> &[ForecastDay] {
        &self.forecast
    }

    pub fn condition_for(&self, code: Option<i32>) -> &'static str {
        self.conditions.condition_for(code)
    }

    pub fn icon_for(&self, code: Option<i32>) -> &'static str {
        self.conditions.icon_for(code)
    }

    pub fn go_back(&self, navigator: &mut dyn Navigator) {
        navigator.navigate(Route::Summary);
    }
}
