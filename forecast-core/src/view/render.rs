use crossterm::style::{Color, Stylize};
use std::fmt::Write;
use unicode_width::UnicodeWidthStr;

use crate::{
    classify::{Gradient, classify},
    model::{TemperatureUnit, WeatherForecast},
};

use super::state::ViewState;

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Emit ANSI colours for gradient stripes.
    pub color: bool,
    /// Card width in columns.
    pub card_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: false,
            card_width: 40,
        }
    }
}

/// Render the whole screen.
///
/// The loading and error blocks are independent; results (or the empty
/// hint) only show when neither is active.
pub fn render(state: &ViewState, options: &RenderOptions) -> String {
    let mut out = String::new();

    out.push_str("Weather Forecast\n");
    out.push_str("Real-time weather updates for cities worldwide\n\n");
    let _ = writeln!(
        out,
        "Search: {}    Units: {}",
        if state.search_city.is_empty() {
            "(all cities)"
        } else {
            state.search_city.as_str()
        },
        unit_selector(state.unit),
    );
    out.push('\n');

    if state.loading {
        out.push_str("  ⟳ Loading forecasts...\n");
    }

    if let Some(error) = &state.error {
        render_error(&mut out, error);
    }

    if !state.loading && state.error.is_none() {
        if state.forecasts.is_empty() {
            out.push_str("  ☁ No Weather Data\n");
            out.push_str("  Try searching for a different city or refresh\n");
        } else {
            render_tabs(&mut out, state, options);
        }
    }

    out
}

fn unit_selector(unit: TemperatureUnit) -> String {
    [TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit]
        .iter()
        .map(|u| {
            if *u == unit {
                format!("[{}]", u.label())
            } else {
                u.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Boxed error message. Sized in terminal columns, and never narrower than
/// the `─ Error ` title.
fn render_error(out: &mut String, error: &str) {
    // columns taken by "─ Error "
    const TITLE: usize = 8;

    let text = error.width();
    let width = (text + 2).max(TITLE);
    let pad = " ".repeat(width - text - 2);
    let _ = writeln!(out, "  ┌─ Error {}┐", "─".repeat(width - TITLE));
    let _ = writeln!(out, "  │ {error}{pad} │");
    let _ = writeln!(out, "  └{}┘", "─".repeat(width));
}

fn render_tabs(out: &mut String, state: &ViewState, options: &RenderOptions) {
    let groups = state.groups();
    let Some(active) = state.active_group_index() else {
        return;
    };

    let bar: Vec<String> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| {
            if i == active {
                format!("[{}]", g.key)
            } else {
                format!(" {} ", g.key)
            }
        })
        .collect();
    let _ = writeln!(out, "  {}", bar.join(" "));
    out.push('\n');

    for forecast in &groups[active].forecasts {
        render_card(out, forecast, state.unit, options);
        out.push('\n');
    }
}

/// One forecast card.
pub fn render_card(
    out: &mut String,
    forecast: &WeatherForecast,
    unit: TemperatureUnit,
    options: &RenderOptions,
) {
    let category = classify(&forecast.condition);
    let width = options.card_width.max(12);

    let _ = writeln!(out, "  {}", stripe(category.gradient(), width, options.color));

    let date = forecast.date.format("%a, %b %-d").to_string();
    let glyph = category.icon().glyph();
    let pad = width.saturating_sub(date.width() + glyph.width());
    let _ = writeln!(out, "  {date}{}{glyph}", " ".repeat(pad));
    let _ = writeln!(out, "  ({})", forecast.condition);

    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", unit.format(forecast.temperature_in(unit)));
    let _ = writeln!(
        out,
        "  {}",
        forecast
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("No description available")
    );
    let _ = writeln!(out);

    let direction = forecast
        .wind_direction
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or("N/A");
    let _ = writeln!(
        out,
        "  Humidity {}%  ·  Wind {} km/h  ·  Direction {direction}",
        forecast.humidity, forecast.wind_speed_kmh,
    );
}

fn stripe(gradient: Gradient, width: usize, color: bool) -> String {
    if !color {
        return "━".repeat(width);
    }

    let stops = gradient.stops();
    let third = width.div_ceil(3);
    (0..width)
        .map(|i| {
            let (r, g, b) = stops[(i / third).min(2)];
            format!("{}", "▀".with(Color::Rgb { r, g, b }))
        })
        .collect()
}
