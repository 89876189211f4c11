//! Show command: one render pass of a day or a week.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use wg_core::calendar::week_days;
use wg_core::{LayoutEngine, ViewMode};

use super::render::write_pass;
use super::util::{load_events, parse_date};
use crate::Config;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Date to show (YYYY-MM-DD, today, yesterday, tomorrow).
    #[arg(long, default_value = "today")]
    pub date: String,

    /// Show a single day with side-by-side columns instead of the week.
    #[arg(long)]
    pub day: bool,

    /// Output the layout as JSON.
    #[arg(long)]
    pub json: bool,

    /// Events file, overriding the configured path.
    #[arg(long)]
    pub events: Option<PathBuf>,
}

pub fn run<W: Write>(writer: &mut W, args: &ShowArgs, config: &Config) -> Result<()> {
    let date = parse_date(&args.date)?;
    run_for_date(writer, args, config, date)
}

fn run_for_date<W: Write>(writer: &mut W, args: &ShowArgs, config: &Config, date: NaiveDate) -> Result<()> {
    let layout = config.layout_config().context("invalid grid configuration")?;
    let events_path = args.events.as_deref().unwrap_or(&config.events_path);
    let events = load_events(events_path)?;

    let (mode, days) = if args.day {
        (ViewMode::Day, vec![date])
    } else {
        (ViewMode::Week, week_days(date))
    };

    let mut engine = LayoutEngine::new(layout);
    let pass = engine.render(mode, &days, &events, Instant::now());

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&pass)?)?;
    } else {
        write_pass(writer, &pass)?;
    }
    Ok(())
}
