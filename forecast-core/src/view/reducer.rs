//! Reducer: `(state, action) -> effect`.
//!
//! All state mutation happens here. Fetch intents return an [`Effect`] for
//! the caller to execute; results older than the latest dispatched request
//! are dropped so a slow superseded response cannot overwrite a newer one.

use tracing::debug;

use crate::api::Query;

use super::{action::Action, effect::Effect, state::ViewState};

pub fn reduce(state: &mut ViewState, action: Action) -> Option<Effect> {
    debug!(action = %action.summary(), "reduce");

    if let Some(request) = action.request() {
        if request != state.latest_request {
            debug!(request, latest = state.latest_request, "discarding stale result");
            return None;
        }
    }

    match action {
        Action::Mount | Action::FetchAll => Some(begin_fetch(state, Query::All)),

        Action::SearchInput(text) => {
            state.search_city = text;
            None
        }

        Action::Search => {
            let query = Query::search(&state.search_city);
            Some(begin_fetch(state, query))
        }

        Action::Refresh => {
            state.search_city.clear();
            Some(begin_fetch(state, Query::All))
        }

        Action::Lookup(query) => Some(begin_fetch(state, query)),

        Action::SetUnit(unit) => {
            state.unit = unit;
            None
        }

        Action::ToggleUnit => {
            state.unit = state.unit.toggle();
            None
        }

        Action::SelectTab(index) => {
            let count = state.groups().len();
            if index < count {
                state.active_tab = index;
            }
            None
        }

        Action::NextTab => {
            let count = state.groups().len();
            if count > 0 {
                state.active_tab = (state.active_tab.min(count - 1) + 1) % count;
            }
            None
        }

        Action::PrevTab => {
            let count = state.groups().len();
            if count > 0 {
                let current = state.active_tab.min(count - 1);
                state.active_tab = (current + count - 1) % count;
            }
            None
        }

        Action::ForecastsDidLoad { forecasts, .. } => {
            state.forecasts = forecasts;
            state.error = None;
            state.loading = false;
            state.active_tab = 0;
            None
        }

        Action::ForecastsDidNotFind { label, .. } => {
            state.forecasts = Vec::new();
            state.error = Some(format!("No forecasts found for \"{label}\""));
            state.loading = false;
            state.active_tab = 0;
            None
        }

        // previous forecasts stay; the error panel replaces them on screen
        Action::ForecastsDidError { message, .. } => {
            state.error = Some(message);
            state.loading = false;
            None
        }
    }
}

fn begin_fetch(state: &mut ViewState, query: Query) -> Effect {
    state.latest_request += 1;
    state.loading = true;
    state.error = None;

    Effect::Fetch {
        request: state.latest_request,
        query,
    }
}
