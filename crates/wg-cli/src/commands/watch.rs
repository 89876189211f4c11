//! Watch command: a live week view that rotates stacks on a timer.
//!
//! The view re-renders after every rotation tick and after every command
//! read from stdin, one per line:
//!
//! - `advance <YYYY-MM-DD#N>`: rotate one cluster now
//! - `next` / `prev`: move one week forward or back
//! - `today`: jump to the current week
//! - `reload`: re-read the events file
//! - `quit`: stop watching (end of input also stops)

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use clap::Args;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use wg_core::calendar::{now_marker_offset, week_days};
use wg_core::{ClusterId, Event, LayoutConfig, LayoutEngine, ViewMode};

use super::render::write_pass;
use super::util::{load_events, parse_date};
use crate::Config;

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Any date inside the week to start on.
    #[arg(long, default_value = "today")]
    pub date: String,

    /// Events file, overriding the configured path.
    #[arg(long)]
    pub events: Option<PathBuf>,
}

/// A line of input to the watch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchCommand {
    Advance(ClusterId),
    Next,
    Prev,
    Today,
    Reload,
    Quit,
}

impl WatchCommand {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let command = match verb {
            "advance" | "a" => {
                let Some(raw) = words.next() else {
                    bail!("usage: advance <YYYY-MM-DD#N>");
                };
                Self::Advance(raw.parse()?)
            }
            "next" | "n" => Self::Next,
            "prev" | "p" => Self::Prev,
            "today" => Self::Today,
            "reload" => Self::Reload,
            "quit" | "q" | "exit" => Self::Quit,
            other => bail!("unknown command: {other}"),
        };
        if let Some(extra) = words.next() {
            bail!("unexpected argument: {extra}");
        }
        Ok(Some(command))
    }
}

/// State carried between renders of the watch loop.
struct WatchSession {
    engine: LayoutEngine,
    events_path: PathBuf,
    events: Vec<Event>,
    anchor: NaiveDate,
}

impl WatchSession {
    fn render<W: Write>(&mut self, writer: &mut W) -> Result<()> {
        let days = week_days(self.anchor);
        let pass = self
            .engine
            .render(ViewMode::Week, &days, &self.events, Instant::now());
        write_pass(writer, &pass)?;

        if let Some(offset) = now_line(self.engine.config(), &days, Local::now().naive_local()) {
            writeln!(writer, "Now line at {offset:.0}px")?;
        }
        writeln!(writer, "Tracking {} rotating clusters", self.engine.rotations().len())?;
        writer.flush()?;
        Ok(())
    }

    /// Applies one command. Returns `false` when the loop should stop.
    fn apply<W: Write>(&mut self, writer: &mut W, command: WatchCommand) -> Result<bool> {
        match command {
            WatchCommand::Advance(cluster_id) => {
                if !self.engine.advance(cluster_id) {
                    writeln!(writer, "No rotating cluster {cluster_id}")?;
                    return Ok(true);
                }
                writeln!(writer, "Advanced {cluster_id}")?;
            }
            WatchCommand::Next => self.anchor += Duration::weeks(1),
            WatchCommand::Prev => self.anchor -= Duration::weeks(1),
            WatchCommand::Today => self.anchor = Local::now().date_naive(),
            WatchCommand::Reload => match load_events(&self.events_path) {
                Ok(events) => self.events = events,
                Err(err) => {
                    tracing::warn!(error = %err, "reload failed, keeping previous events");
                    writeln!(writer, "error: {err:#}")?;
                    return Ok(true);
                }
            },
            WatchCommand::Quit => return Ok(false),
        }
        writeln!(writer)?;
        self.render(writer)?;
        Ok(true)
    }
}

pub fn run<W: Write>(writer: &mut W, args: &WatchArgs, config: &Config) -> Result<()> {
    let anchor = parse_date(&args.date)?;
    let layout = config.layout_config().context("invalid grid configuration")?;
    let events_path = args.events.clone().unwrap_or_else(|| config.events_path.clone());
    let events = load_events(&events_path)?;

    let session = WatchSession {
        engine: LayoutEngine::new(layout),
        events_path,
        events,
        anchor,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .enable_time()
        .build()
        .context("failed to initialize tokio runtime")?;
    runtime.block_on(watch_loop(writer, BufReader::new(tokio::io::stdin()), session))
}

/// Offset of the "now" line when `now` falls on a shown day inside the window.
fn now_line(config: &LayoutConfig, days: &[NaiveDate], now: NaiveDateTime) -> Option<f32> {
    if !days.contains(&now.date()) {
        return None;
    }
    now_marker_offset(config.window, config.metrics.row_height, now.time())
}

async fn watch_loop<W, R>(writer: &mut W, input: R, mut session: WatchSession) -> Result<()>
where
    W: Write,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    session.render(writer)?;

    loop {
        let deadline = session.engine.scheduler().next_due();
        tokio::select! {
            () = sleep_until(deadline) => {
                if session.engine.poll_timer(Instant::now()) {
                    writeln!(writer)?;
                    session.render(writer)?;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read command")? else {
                    tracing::debug!("input closed");
                    break;
                };
                match WatchCommand::parse(&line) {
                    Ok(Some(command)) => {
                        if !session.apply(writer, command)? {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(err) => writeln!(writer, "error: {err:#}")?,
                }
            }
        }
    }
    Ok(())
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
        None => std::future::pending().await,
    }
}
