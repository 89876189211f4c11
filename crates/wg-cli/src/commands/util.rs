//! Shared utilities for CLI commands.

use std::path::Path;

use anyhow::{Context, bail};
use chrono::{Duration, Local, NaiveDate};
use serde_json::Value;
use wg_core::Event;

/// Reads events from a JSON file.
///
/// Accepts either a bare array of events or a calendar backup object with an
/// `events` array (other backup keys are ignored).
pub fn load_events(path: &Path) -> anyhow::Result<Vec<Event>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read events from {}", path.display()))?;
    let events =
        parse_events(&content).with_context(|| format!("invalid events file {}", path.display()))?;
    tracing::debug!(path = %path.display(), count = events.len(), "loaded events");
    Ok(events)
}

/// Parses the contents of an events file.
pub fn parse_events(content: &str) -> anyhow::Result<Vec<Event>> {
    let value: Value = serde_json::from_str(content).context("failed to parse JSON")?;
    let events = match value {
        Value::Array(events) => Value::Array(events),
        Value::Object(mut backup) => match backup.remove("events") {
            Some(events) => events,
            None => bail!("expected an `events` array in the backup object"),
        },
        _ => bail!("expected a JSON array of events or a backup object"),
    };
    serde_json::from_value(events).context("failed to decode events")
}

/// Parse a date as `YYYY-MM-DD` or one of `today`, `yesterday`, `tomorrow`.
pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    parse_date_relative_to(s, Local::now().date_naive())
}

fn parse_date_relative_to(s: &str, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    match s.trim() {
        "today" => Ok(today),
        "yesterday" => Ok(today - Duration::days(1)),
        "tomorrow" => Ok(today + Duration::days(1)),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d").with_context(|| {
            format!("Invalid date: {other}. Use YYYY-MM-DD, 'today', 'yesterday' or 'tomorrow'")
        }),
    }
}
