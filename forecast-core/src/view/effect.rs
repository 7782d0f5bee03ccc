//! Effects - side effects declared by the reducer.
//!
//! The reducer stays synchronous; fetches are described as [`Effect`]s and
//! turned into result actions by [`execute`].

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::warn;

use crate::api::{ApiError, ForecastApi, Query};

use super::{action::Action, reducer::reduce, state::{RequestId, ViewState}};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Read `query` and answer with a result action tagged `request`.
    Fetch { request: RequestId, query: Query },
}

/// Run an effect to completion. Always yields exactly one result action.
pub async fn execute(api: &dyn ForecastApi, effect: Effect) -> Action {
    let Effect::Fetch { request, query } = effect;

    match api.forecasts(&query).await {
        Ok(forecasts) => Action::ForecastsDidLoad { request, forecasts },
        Err(ApiError::NotFound) if query.is_filtered() => Action::ForecastsDidNotFind {
            request,
            label: query.label(),
        },
        Err(e) => {
            warn!(request, query = %query.label(), error = %e, "fetch failed");
            Action::ForecastsDidError {
                request,
                message: e.to_string(),
            }
        }
    }
}

/// Execute `effect` on its own task and send the result action to `tx`.
pub fn spawn(
    api: Arc<dyn ForecastApi>,
    effect: Effect,
    tx: mpsc::UnboundedSender<Action>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let action = execute(api.as_ref(), effect).await;
        // receiver gone means the session ended
        let _ = tx.send(action);
    })
}

/// Reduce `action` and, if it asks for a fetch, run it inline and reduce the
/// result. Used by one-shot commands where nothing else can happen meanwhile.
pub async fn dispatch(state: &mut ViewState, api: &dyn ForecastApi, action: Action) {
    if let Some(effect) = reduce(state, action) {
        let result = execute(api, effect).await;
        reduce(state, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WeatherForecast;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Copy)]
    enum Reply {
        Ok,
        NotFound,
        ServerError,
    }

    #[derive(Debug)]
    struct ScriptedApi {
        reply: Reply,
        calls: Mutex<Vec<Query>>,
    }

    impl ScriptedApi {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Query> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ForecastApi for ScriptedApi {
        async fn forecasts(&self, query: &Query) -> Result<Vec<WeatherForecast>, ApiError> {
            self.calls.lock().unwrap().push(query.clone());
            match self.reply {
                Reply::Ok => Ok(vec![paris()]),
                Reply::NotFound if query.is_filtered() => Err(ApiError::NotFound),
                Reply::NotFound => Err(ApiError::Status(StatusCode::NOT_FOUND)),
                Reply::ServerError => Err(ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR)),
            }
        }
    }

    fn paris() -> WeatherForecast {
        WeatherForecast {
            id: "1".into(),
            city: "Paris".into(),
            country: "FR".into(),
            date: "2024-01-02".parse().unwrap(),
            temperature_celsius: 10.0,
            temperature_fahrenheit: 50.0,
            condition: "Rainy".into(),
            humidity: 80,
            wind_speed_kmh: 15.0,
            wind_direction: Some("NE".into()),
            description: Some("Light rain".into()),
        }
    }

    fn stale() -> WeatherForecast {
        WeatherForecast {
            id: "stale".into(),
            ..paris()
        }
    }

    #[tokio::test]
    async fn loading_spans_exactly_the_request_on_every_path() {
        for reply in [Reply::Ok, Reply::NotFound, Reply::ServerError] {
            let api = ScriptedApi::new(reply);
            let mut state = ViewState::default();
            state.search_city = "Paris".into();

            assert!(!state.loading);
            let effect = reduce(&mut state, Action::Search).expect("search fetches");
            assert!(state.loading, "{reply:?}: loading after start");

            let result = execute(&api, effect).await;
            assert!(state.loading, "{reply:?}: loading until result is applied");

            reduce(&mut state, result);
            assert!(!state.loading, "{reply:?}: idle after completion");
        }
    }

    #[tokio::test]
    async fn blank_search_hits_same_endpoint_as_fetch_all() {
        let api = ScriptedApi::new(Reply::Ok);
        let mut state = ViewState::default();

        dispatch(&mut state, &api, Action::FetchAll).await;
        dispatch(&mut state, &api, Action::SearchInput("  ".into())).await;
        dispatch(&mut state, &api, Action::Search).await;

        assert_eq!(api.calls(), vec![Query::All, Query::All]);
    }

    #[tokio::test]
    async fn search_404_empties_and_names_city() {
        let api = ScriptedApi::new(Reply::NotFound);
        let mut state = ViewState::default();
        state.forecasts = vec![stale()];

        dispatch(&mut state, &api, Action::SearchInput("Atlantis".into())).await;
        dispatch(&mut state, &api, Action::Search).await;

        assert!(state.forecasts.is_empty());
        let error = state.error.expect("error is set");
        assert!(error.contains("Atlantis"));
    }

    #[tokio::test]
    async fn fetch_all_404_is_generic_failure() {
        let api = ScriptedApi::new(Reply::NotFound);
        let mut state = ViewState::default();
        state.forecasts = vec![stale()];

        dispatch(&mut state, &api, Action::FetchAll).await;

        assert_eq!(state.forecasts, vec![stale()]);
        assert!(state.error.unwrap().starts_with("Failed to fetch weather data"));
    }

    #[tokio::test]
    async fn server_error_keeps_previous_forecasts() {
        for action in [Action::FetchAll, Action::Search] {
            let api = ScriptedApi::new(Reply::ServerError);
            let mut state = ViewState::default();
            state.forecasts = vec![stale()];
            state.search_city = "Paris".into();

            dispatch(&mut state, &api, action).await;

            assert_eq!(state.forecasts, vec![stale()]);
            assert!(state.error.unwrap().contains("Failed to fetch weather data"));
        }
    }

    #[tokio::test]
    async fn unit_toggle_makes_no_request() {
        let api = ScriptedApi::new(Reply::Ok);
        let mut state = ViewState::default();

        dispatch(&mut state, &api, Action::Mount).await;
        dispatch(&mut state, &api, Action::ToggleUnit).await;

        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn spawned_fetch_reports_through_channel() {
        let api: Arc<dyn ForecastApi> = Arc::new(ScriptedApi::new(Reply::Ok));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let effect = Effect::Fetch {
            request: 4,
            query: Query::All,
        };
        let handle = spawn(api, effect, tx);
        handle.await.unwrap();

        match rx.recv().await {
            Some(Action::ForecastsDidLoad { request, forecasts }) => {
                assert_eq!(request, 4);
                assert_eq!(forecasts, vec![paris()]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
