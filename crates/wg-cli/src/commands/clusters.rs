//! Clusters command: overlap groups of a week and their rotation order.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use wg_core::calendar::week_days;
use wg_core::normalize::format_minute;
use wg_core::{ClusterSummary, EventId, LayoutEngine, ViewMode};

use super::util::{load_events, parse_date};
use crate::Config;

#[derive(Debug, Args)]
pub struct ClustersArgs {
    /// Any date inside the week to inspect.
    #[arg(long, default_value = "today")]
    pub date: String,

    /// Events file, overriding the configured path.
    #[arg(long)]
    pub events: Option<PathBuf>,

    /// Only list clusters with more than one member.
    #[arg(long)]
    pub overlapping: bool,
}

pub fn run<W: Write>(writer: &mut W, args: &ClustersArgs, config: &Config) -> Result<()> {
    let date = parse_date(&args.date)?;
    run_for_date(writer, args, config, date)
}

fn run_for_date<W: Write>(writer: &mut W, args: &ClustersArgs, config: &Config, date: NaiveDate) -> Result<()> {
    let layout = config.layout_config().context("invalid grid configuration")?;
    let events = load_events(args.events.as_deref().unwrap_or(&config.events_path))?;

    let mut engine = LayoutEngine::new(layout);
    let pass = engine.render(ViewMode::Week, &week_days(date), &events, Instant::now());

    let mut listed = 0usize;
    for cluster in pass.days.iter().flat_map(|day| &day.clusters) {
        if args.overlapping && cluster.members.len() < 2 {
            continue;
        }
        writeln!(writer, "{}", describe(cluster))?;
        listed += 1;
    }
    if listed == 0 {
        writeln!(writer, "No clusters.")?;
    }
    Ok(())
}

fn describe(cluster: &ClusterSummary) -> String {
    let mut line = format!(
        "{} {}-{} {}",
        cluster.id,
        format_minute(cluster.start),
        format_minute(cluster.end),
        join(&cluster.members, ", ")
    );
    if let Some(rotation) = &cluster.rotation {
        line.push_str(&format!(
            " (order {}, active {})",
            join(rotation.order(), " > "),
            rotation.active()
        ));
    }
    line
}

fn join(ids: &[EventId], separator: &str) -> String {
    ids.iter().map(EventId::as_str).collect::<Vec<_>>().join(separator)
}
