//! View layer: state store, transitions, side effects and rendering.
//!
//! - [`ViewState`] is the single source of truth for what is shown
//! - [`reduce`] is the only place state changes; it returns an [`Effect`]
//!   when a fetch has to be issued
//! - [`effect::execute`] runs an effect against a [`ForecastApi`](crate::api::ForecastApi)
//!   and yields the result [`Action`]
//! - [`render`] turns state into text

pub mod action;
pub mod effect;
pub mod reducer;
pub mod render;
pub mod state;

pub use action::Action;
pub use effect::{Effect, execute};
pub use reducer::reduce;
pub use render::{RenderOptions, render};
pub use state::{RequestId, ViewState};
