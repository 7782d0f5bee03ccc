use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use forecast_core::{
    Action, Config, HttpForecastApi, Query, RenderOptions, TemperatureUnit, ViewState,
    config::DEFAULT_BASE_URL,
    render,
    view::{effect::dispatch, render::render_card},
};
use inquire::{CustomType, Select, Text};
use std::{io::IsTerminal, path::Path, process::ExitCode, sync::Arc};
use tracing::warn;

use crate::session;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Weather forecast terminal client")]
pub struct Cli {
    /// Defaults to `interactive` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive session: search, refresh, switch units and tabs.
    Interactive {
        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Fetch once, print the forecast cards and exit.
    Show(ShowArgs),

    /// Show a single forecast by id.
    Get {
        id: String,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Check that the API is up.
    Health,

    /// Show how many forecasts the API holds.
    Stats,

    /// Set the API base URL, default unit and request timeout.
    Configure,
}

#[derive(Debug, Clone, Default, Args)]
pub struct DisplayArgs {
    /// Show temperatures in Fahrenheit instead of the configured unit.
    #[arg(long)]
    pub fahrenheit: bool,

    /// Disable coloured output.
    #[arg(long)]
    pub no_color: bool,
}

impl DisplayArgs {
    fn unit(&self, config: &Config) -> TemperatureUnit {
        if self.fahrenheit {
            TemperatureUnit::Fahrenheit
        } else {
            config.unit()
        }
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            color: !self.no_color && std::io::stdout().is_terminal(),
            ..RenderOptions::default()
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct ShowArgs {
    /// City to show; all cities when omitted.
    pub city: Option<String>,

    /// Narrow the city to one country.
    #[arg(long, requires = "city", conflicts_with_all = ["date", "from"])]
    pub country: Option<String>,

    /// Single day, YYYY-MM-DD.
    #[arg(long, requires = "city", conflicts_with_all = ["from", "to"])]
    pub date: Option<NaiveDate>,

    /// Range start, YYYY-MM-DD.
    #[arg(long, requires = "city", requires = "to")]
    pub from: Option<NaiveDate>,

    /// Range end, YYYY-MM-DD.
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,

    #[command(flatten)]
    pub display: DisplayArgs,
}

impl ShowArgs {
    pub fn query(&self) -> Result<Query> {
        let Some(city) = self.city.clone() else {
            return Ok(Query::All);
        };

        let query = match (&self.country, self.date, self.from, self.to) {
            (Some(country), None, None, None) => Query::CityCountry {
                city,
                country: country.clone(),
            },
            (None, Some(date), None, None) => Query::CityDate { city, date },
            (None, None, Some(start), Some(end)) => Query::CityRange { city, start, end },
            (None, None, None, None) => Query::search(&city),
            _ => bail!("--country, --date and --from/--to cannot be combined"),
        };

        query.validate()?;
        Ok(query)
    }
}

impl Cli {
    pub async fn run(self) -> Result<ExitCode> {
        match self.command.unwrap_or(Command::Interactive {
            display: DisplayArgs::default(),
        }) {
            Command::Interactive { display } => {
                let config = Config::load()?;
                let api = Arc::new(HttpForecastApi::from_config(&config)?);
                session::run(api, display.unit(&config), display.render_options()).await?;
            }
            Command::Show(args) => return show(&Config::load()?, args).await,
            Command::Get { id, display } => {
                let config = Config::load()?;
                let api = HttpForecastApi::from_config(&config)?;
                let forecast = api
                    .forecast_by_id(&id)
                    .await
                    .with_context(|| format!("Failed to load forecast '{id}'"))?;

                let mut out = format!("{}\n\n", forecast.location_key());
                render_card(
                    &mut out,
                    &forecast,
                    display.unit(&config),
                    &display.render_options(),
                );
                print!("{out}");
            }
            Command::Health => {
                let api = HttpForecastApi::from_config(&Config::load()?)?;
                let health = api.health().await.context("Health check failed")?;
                println!(
                    "{} {} is {} ({})",
                    health.service, health.version, health.status, health.timestamp
                );
            }
            Command::Stats => {
                let api = HttpForecastApi::from_config(&Config::load()?)?;
                let stats = api.stats().await.context("Failed to load stats")?;
                println!(
                    "Total forecasts: {} (as of {})",
                    stats.total_forecasts, stats.timestamp
                );
            }
            Command::Configure => {
                let path = Config::config_file_path()?;
                configure(load_for_configure(&path), &path)?;
            }
        }

        Ok(ExitCode::SUCCESS)
    }
}

async fn show(config: &Config, args: ShowArgs) -> Result<ExitCode> {
    let query = args.query()?;
    let api = HttpForecastApi::from_config(config)?;

    let mut state = ViewState::new(args.display.unit(config));
    if let Some(city) = &args.city {
        state.search_city = city.clone();
    }
    dispatch(&mut state, &api, Action::Lookup(query)).await;

    print!("{}", render(&state, &args.display.render_options()));
    Ok(ExitCode::from(exit_status(&state)))
}

/// 1 when the fetch ended in an error, 0 otherwise.
fn exit_status(state: &ViewState) -> u8 {
    u8::from(state.error.is_some())
}

/// `configure` rewrites the whole file, so a file that no longer parses is
/// replaced instead of blocking the command that repairs it.
fn load_for_configure(path: &Path) -> Config {
    Config::load_from(path).unwrap_or_else(|e| {
        warn!(error = %format!("{e:#}"), "ignoring unreadable config, it will be overwritten");
        Config::default()
    })
}

fn configure(mut config: Config, path: &Path) -> Result<()> {
    let current = config
        .api_base_url
        .clone()
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let url = Text::new("API base URL:").with_default(&current).prompt()?;
    config.api_base_url = Some(url);
    config.resolve_base_url(None)?;

    let units = vec![TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit];
    let cursor = units.iter().position(|u| *u == config.unit()).unwrap_or(0);
    let unit = Select::new("Default temperature unit:", units)
        .with_starting_cursor(cursor)
        .prompt()?;
    config.default_unit = Some(unit);

    let timeout = CustomType::<u64>::new("Request timeout in seconds (0 = none):")
        .with_default(config.request_timeout_secs.unwrap_or(0))
        .prompt()?;
    config.request_timeout_secs = (timeout > 0).then_some(timeout);

    config.save_to(path)?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn parse(args: &[&str]) -> ShowArgs {
        let cli = Cli::try_parse_from(std::iter::once("forecast").chain(args.iter().copied()))
            .expect("arguments parse");
        match cli.command {
            Some(Command::Show(args)) => args,
            other => panic!("expected show, got {other:?}"),
        }
    }

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["forecast"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn show_without_city_reads_everything() {
        assert_eq!(parse(&["show"]).query().unwrap(), Query::All);
    }

    #[test]
    fn show_city_variants() {
        assert_eq!(
            parse(&["show", "Paris"]).query().unwrap(),
            Query::City("Paris".into())
        );
        assert_eq!(
            parse(&["show", "Paris", "--country", "FR"]).query().unwrap(),
            Query::CityCountry {
                city: "Paris".into(),
                country: "FR".into(),
            }
        );
        assert_eq!(
            parse(&["show", "Paris", "--date", "2024-01-02"]).query().unwrap(),
            Query::CityDate {
                city: "Paris".into(),
                date: day("2024-01-02"),
            }
        );
        assert_eq!(
            parse(&["show", "Paris", "--from", "2024-01-01", "--to", "2024-01-05"])
                .query()
                .unwrap(),
            Query::CityRange {
                city: "Paris".into(),
                start: day("2024-01-01"),
                end: day("2024-01-05"),
            }
        );
    }

    #[test]
    fn show_rejects_reversed_range() {
        let err = parse(&["show", "Paris", "--from", "2024-01-05", "--to", "2024-01-01"])
            .query()
            .unwrap_err();
        assert!(err.to_string().contains("Invalid date range"));
    }

    #[test]
    fn show_filters_require_city() {
        let res = Cli::try_parse_from(["forecast", "show", "--country", "FR"]);
        assert!(res.is_err());

        let res = Cli::try_parse_from([
            "forecast",
            "show",
            "Paris",
            "--date",
            "2024-01-02",
            "--country",
            "FR",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn fahrenheit_flag_overrides_config() {
        let config = Config {
            default_unit: Some(TemperatureUnit::Celsius),
            ..Config::default()
        };
        let display = DisplayArgs {
            fahrenheit: true,
            no_color: true,
        };
        assert_eq!(display.unit(&config), TemperatureUnit::Fahrenheit);

        let display = DisplayArgs::default();
        assert_eq!(display.unit(&config), TemperatureUnit::Celsius);
    }

    #[test]
    fn configure_replaces_unparsable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_base_url = [broken").unwrap();

        assert!(Config::load_from(&path).is_err());
        assert_eq!(load_for_configure(&path), Config::default());
    }

    #[test]
    fn configure_keeps_readable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let saved = Config {
            api_base_url: Some("https://weather.example.com".into()),
            ..Config::default()
        };
        saved.save_to(&path).unwrap();

        assert_eq!(load_for_configure(&path), saved);
    }

    #[test]
    fn show_exit_status_follows_error() {
        let mut state = ViewState::default();
        assert_eq!(exit_status(&state), 0);

        state.error = Some("Failed to fetch weather data".into());
        assert_eq!(exit_status(&state), 1);
    }
}
