use crate::{
    group::{CityGroup, group_by_city},
    model::{TemperatureUnit, WeatherForecast},
};

/// Sequence number of a dispatched fetch. Strictly increasing per session.
pub type RequestId = u64;

/// Everything the screen needs to render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// Last successfully fetched list; replaced, never appended.
    pub forecasts: Vec<WeatherForecast>,

    /// Search box contents.
    pub search_city: String,

    /// True while the latest dispatched fetch is in flight.
    pub loading: bool,

    /// Set when the latest fetch failed or found nothing.
    pub error: Option<String>,

    pub unit: TemperatureUnit,

    /// Selected city tab, an index into [`ViewState::groups`].
    pub active_tab: usize,

    /// Id of the most recently dispatched fetch; `0` before the first one.
    pub latest_request: RequestId,
}

impl ViewState {
    pub fn new(unit: TemperatureUnit) -> Self {
        Self {
            unit,
            ..Self::default()
        }
    }

    pub fn groups(&self) -> Vec<CityGroup<'_>> {
        group_by_city(&self.forecasts)
    }

    /// Active tab index clamped to the current groups, if there are any.
    pub fn active_group_index(&self) -> Option<usize> {
        let count = self.groups().len();
        (count > 0).then(|| self.active_tab.min(count - 1))
    }

    pub fn use_celsius(&self) -> bool {
        self.unit == TemperatureUnit::Celsius
    }
}
