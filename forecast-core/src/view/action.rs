//! Actions: user intents and async fetch results.
//!
//! Result actions use the `ForecastsDid*` prefix and carry the id of the
//! request they answer.

use crate::{
    api::Query,
    model::{TemperatureUnit, WeatherForecast},
};

use super::state::RequestId;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Session started; loads everything once.
    Mount,

    /// Load every forecast.
    FetchAll,

    /// Search box text changed. No fetch.
    SearchInput(String),

    /// Search for the current search box text; blank reads everything.
    Search,

    /// Clear the search box and load everything.
    Refresh,

    /// Issue an arbitrary read query.
    Lookup(Query),

    SetUnit(TemperatureUnit),

    ToggleUnit,

    SelectTab(usize),

    NextTab,

    PrevTab,

    ForecastsDidLoad {
        request: RequestId,
        forecasts: Vec<WeatherForecast>,
    },

    /// A filtered query came back 404.
    ForecastsDidNotFind { request: RequestId, label: String },

    ForecastsDidError { request: RequestId, message: String },
}

impl Action {
    /// Concise form for logging; avoids dumping whole forecast lists.
    pub fn summary(&self) -> String {
        match self {
            Action::ForecastsDidLoad { request, forecasts } => {
                format!("ForecastsDidLoad {{ request: {request}, count: {} }}", forecasts.len())
            }
            _ => format!("{self:?}"),
        }
    }

    /// The request id a result action answers; `None` for intents.
    pub fn request(&self) -> Option<RequestId> {
        match self {
            Action::ForecastsDidLoad { request, .. }
            | Action::ForecastsDidNotFind { request, .. }
            | Action::ForecastsDidError { request, .. } => Some(*request),
            _ => None,
        }
    }
}
