//! Core library for the `forecast` terminal client.
//!
//! This crate defines:
//! - Configuration (API base URL, preferred unit, timeout)
//! - The forecast API client and its error taxonomy
//! - Shared domain models (forecast records, health, stats)
//! - Condition classification and city grouping
//! - The view layer: state, transitions, effects, rendering
//!
//! It is used by `forecast-cli`, but can also be reused by other front ends.

pub mod api;
pub mod classify;
pub mod config;
pub mod group;
pub mod model;
pub mod view;

pub use api::{ApiError, ForecastApi, HttpForecastApi, Query};
pub use config::Config;
pub use model::{ApiHealth, ApiStats, TemperatureUnit, WeatherForecast};
pub use view::{Action, Effect, RenderOptions, ViewState, reduce, render};
