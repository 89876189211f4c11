//! Plain-text rendering of a layout pass.

use std::io::Write;

use anyhow::Result;
use wg_core::calendar::hour_labels;
use wg_core::normalize::format_minute;
use wg_core::{DayLayout, Placement, RenderPass, ViewMode};

/// Writes a render pass as an indented, human-readable listing.
pub fn write_pass<W: Write>(writer: &mut W, pass: &RenderPass) -> Result<()> {
    let window = pass.window;
    let span = format!(
        "{}-{}",
        format_minute(window.start_minute()),
        format_minute(window.end_minute())
    );
    match (pass.mode, pass.days.first()) {
        (ViewMode::Week, Some(first)) => writeln!(writer, "Week of {}, visible {span}", first.date)?,
        (ViewMode::Day, Some(first)) => writeln!(writer, "Day {}, visible {span}", first.date)?,
        (_, None) => writeln!(writer, "Nothing to show, visible {span}")?,
    }
    let rows = hour_labels(window);
    if let (Some(first), Some(last)) = (rows.first(), rows.last()) {
        writeln!(writer, "Rows {first}-{last}, {} hours", rows.len())?;
    }

    for day in &pass.days {
        writeln!(writer)?;
        write_day(writer, day)?;
    }
    Ok(())
}

fn write_day<W: Write>(writer: &mut W, day: &DayLayout) -> Result<()> {
    writeln!(writer, "{}", day.date.format("%a %Y-%m-%d"))?;
    if day.events.is_empty() {
        writeln!(writer, "  no events")?;
        return Ok(());
    }

    for cluster in &day.clusters {
        let rotating = if cluster.rotation.is_some() { " rotating" } else { "" };
        writeln!(
            writer,
            "  #{} {}-{}{rotating}",
            cluster.id.seq,
            format_minute(cluster.start),
            format_minute(cluster.end)
        )?;

        for member in &cluster.members {
            let Some(event) = day.events.iter().find(|e| &e.event_id == member) else {
                continue;
            };
            let Some(layout) = &event.layout else {
                continue;
            };
            let marker = if layout.active { '*' } else { '-' };
            let placement = match layout.placement {
                Placement::Column {
                    column,
                    column_count,
                } => format!("col {column}/{column_count}"),
                Placement::Stack { depth } => format!("depth {depth}"),
            };
            let mut line = format!("    {marker} {}", event.event_id);
            // short blocks have no room for a time label
            if layout.rect.shows_time_label() {
                line.push_str(&format!(
                    " {}-{}",
                    format_minute(layout.start),
                    format_minute(layout.end)
                ));
            }
            line.push(' ');
            line.push_str(&placement);
            if !event.title.is_empty() {
                line.push(' ');
                line.push_str(&event.title);
            }
            writeln!(writer, "{line}")?;
        }
    }

    for hidden in day.events.iter().filter(|e| !e.is_visible()) {
        writeln!(writer, "  hidden: {}", hidden.event_id)?;
    }
    Ok(())
}
