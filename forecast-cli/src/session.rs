//! Interactive session loop.
//!
//! One task owns the [`ViewState`]. It waits on stdin lines and on result
//! actions from spawned fetches, so typing stays possible while a request is
//! in flight. Input running out (piped stdin) does not cut a pending fetch
//! short: its result is drawn before the session ends.

use anyhow::{Context, Result};
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use forecast_core::{
    Action, ForecastApi, RenderOptions, TemperatureUnit, ViewState, reduce, render,
    view::effect,
};
use std::{
    io::{IsTerminal, Write},
    sync::Arc,
};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::debug;

const HELP: &str = "\
  <city>        search for a city (empty line repeats the search)
  :r            refresh (clear search, load all)
  :c / :f / :u  celsius / fahrenheit / toggle unit
  :n / :p       next / previous city tab
  :t <n>        select city tab n
  :q            quit";

/// What a line of input asks for.
#[derive(Debug, PartialEq)]
pub enum Input {
    Actions(Vec<Action>),
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();

    let Some(command) = trimmed.strip_prefix(':') else {
        if trimmed.is_empty() {
            return Input::Actions(vec![Action::Search]);
        }
        return Input::Actions(vec![Action::SearchInput(line.to_string()), Action::Search]);
    };

    let mut parts = command.split_whitespace();
    let action = match (parts.next(), parts.next()) {
        (Some("q" | "quit"), None) => return Input::Quit,
        (Some("h" | "help"), None) => return Input::Help,
        (Some("r" | "refresh"), None) => Action::Refresh,
        (Some("s" | "search"), None) => Action::Search,
        (Some("c" | "celsius"), None) => Action::SetUnit(TemperatureUnit::Celsius),
        (Some("f" | "fahrenheit"), None) => Action::SetUnit(TemperatureUnit::Fahrenheit),
        (Some("u" | "unit"), None) => Action::ToggleUnit,
        (Some("n" | "next"), None) => Action::NextTab,
        (Some("p" | "prev"), None) => Action::PrevTab,
        (Some("t" | "tab"), Some(n)) => match n.parse::<usize>() {
            Ok(n) if n >= 1 => Action::SelectTab(n - 1),
            _ => return Input::Unknown(trimmed.to_string()),
        },
        _ => return Input::Unknown(trimmed.to_string()),
    };

    Input::Actions(vec![action])
}

pub async fn run(
    api: Arc<dyn ForecastApi>,
    unit: TemperatureUnit,
    options: RenderOptions,
) -> Result<()> {
    let stdout = std::io::stdout();
    let clear = stdout.is_terminal();
    let input = BufReader::new(tokio::io::stdin());

    drive(api, unit, input, Screen::new(stdout, options, clear)).await?;
    Ok(())
}

/// Runs the session over any line source until `:q`, or until the input ends
/// and the last requested fetch has been drawn.
pub async fn drive<R, W>(
    api: Arc<dyn ForecastApi>,
    unit: TemperatureUnit,
    input: R,
    mut screen: Screen<W>,
) -> Result<ViewState>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut state = ViewState::new(unit);
    let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
    let mut lines = input.lines();
    let mut input_open = true;
    let mut notice: Option<String> = None;

    debug!(?api, "starting session");
    apply(&mut state, Action::Mount, &api, &tx);
    screen.draw(&state, notice.as_deref())?;

    loop {
        if !input_open && !state.loading {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if input_open => {
                let Some(line) = line.context("Failed to read input")? else {
                    debug!(loading = state.loading, "input closed");
                    input_open = false;
                    continue;
                };
                notice = None;
                match parse_input(&line) {
                    Input::Quit => break,
                    Input::Help => notice = Some(HELP.to_string()),
                    Input::Unknown(cmd) => {
                        notice = Some(format!("  Unknown command '{cmd}', type :h for help"));
                    }
                    Input::Actions(actions) => {
                        for action in actions {
                            apply(&mut state, action, &api, &tx);
                        }
                    }
                }
            }
            Some(action) = rx.recv() => apply(&mut state, action, &api, &tx),
        }

        screen.draw(&state, notice.as_deref())?;
    }

    Ok(state)
}

fn apply(
    state: &mut ViewState,
    action: Action,
    api: &Arc<dyn ForecastApi>,
    tx: &mpsc::UnboundedSender<Action>,
) {
    if let Some(effect) = reduce(state, action) {
        effect::spawn(Arc::clone(api), effect, tx.clone());
    }
}

/// Where the session draws its frames.
pub struct Screen<W> {
    out: W,
    options: RenderOptions,
    clear: bool,
}

impl<W: Write> Screen<W> {
    pub fn new(out: W, options: RenderOptions, clear: bool) -> Self {
        Self {
            out,
            options,
            clear,
        }
    }

    fn draw(&mut self, state: &ViewState, notice: Option<&str>) -> Result<()> {
        if self.clear {
            execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        }

        write!(self.out, "{}", render(state, &self.options))?;
        if let Some(notice) = notice {
            writeln!(self.out, "{notice}")?;
        }
        write!(self.out, "\n(:h for help) > ")?;
        self.out.flush()?;
        Ok(())
    }
}
