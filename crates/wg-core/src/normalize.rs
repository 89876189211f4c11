//! Interval normalization.
//!
//! Turns an event's raw `HH:mm` strings into an integer-minute interval,
//! corrected for degenerate durations and clipped to the visible window.
//! Malformed input never fails: defaults absorb it.

use serde::{Deserialize, Serialize};

use crate::types::{EventId, ValidationError};

/// Minutes in a day. Also the end-of-day sentinel for an `"00:00"` end time.
pub const END_OF_DAY: u32 = 24 * 60;

/// Synthetic duration given to zero or negative length events.
pub const MIN_DURATION_MINUTES: u32 = 15;

/// The configured range of hours drawn on the grid.
///
/// Covers `[start_hour * 60, end_hour * 60 + 59]` in minutes of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleWindow {
    start_hour: u32,
    end_hour: u32,
}

impl VisibleWindow {
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self, ValidationError> {
        if start_hour > 23 {
            return Err(ValidationError::HourOutOfRange {
                field: "start_hour",
                value: start_hour,
            });
        }
        if end_hour > 23 {
            return Err(ValidationError::HourOutOfRange {
                field: "end_hour",
                value: end_hour,
            });
        }
        if start_hour > end_hour {
            return Err(ValidationError::InvertedWindow {
                start: start_hour,
                end: end_hour,
            });
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    pub const fn start_hour(self) -> u32 {
        self.start_hour
    }

    pub const fn end_hour(self) -> u32 {
        self.end_hour
    }

    /// First visible minute of the day.
    pub const fn start_minute(self) -> u32 {
        self.start_hour * 60
    }

    /// Last visible minute of the day.
    pub const fn end_minute(self) -> u32 {
        self.end_hour * 60 + 59
    }
}

impl Default for VisibleWindow {
    fn default() -> Self {
        Self {
            start_hour: 7,
            end_hour: 22,
        }
    }
}

/// A clipped event interval in minutes of day. Always `end > start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub event_id: EventId,
    pub start: u32,
    pub end: u32,
}

impl Interval {
    pub const fn duration(&self) -> u32 {
        self.end - self.start
    }

    /// Half-open overlap test.
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Result of normalizing one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Visible(Interval),
    /// Entirely outside the window; skipped by clustering and layout.
    NotVisible,
}

impl Normalized {
    pub const fn as_visible(&self) -> Option<&Interval> {
        match self {
            Self::Visible(interval) => Some(interval),
            Self::NotVisible => None,
        }
    }
}

/// A parsed clock time. `defaulted` is set when any component was unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClockTime {
    minutes: u32,
    defaulted: bool,
}

fn parse_component(part: Option<&str>, max: u32) -> Option<u32> {
    part.map(str::trim)
        .and_then(|p| p.parse::<u32>().ok())
        .filter(|&v| v <= max)
}

fn parse_clock(raw: &str) -> ClockTime {
    let mut parts = raw.splitn(2, ':');
    let hours = parse_component(parts.next(), 24);
    let minutes = parse_component(parts.next(), 59);
    let defaulted = hours.is_none() || minutes.is_none();
    if defaulted {
        tracing::trace!(raw, "defaulting malformed time component to zero");
    }
    ClockTime {
        minutes: hours.unwrap_or(0) * 60 + minutes.unwrap_or(0),
        defaulted,
    }
}

/// Minute of day for a start time. Malformed components count as zero.
pub fn start_minute(raw: &str) -> u32 {
    parse_clock(raw).minutes
}

/// Minute of day for an end time.
///
/// A well-formed `"00:00"` means end of day (1440), never the next morning.
/// A missing or malformed end defaults to minute 0 like any other time. This
/// departs from reading "defaults to `00:00`" as the end-of-day sentinel; the
/// minimum duration then applies instead of stretching to midnight.
pub fn end_minute(raw: &str) -> u32 {
    let clock = parse_clock(raw);
    if clock.minutes == 0 && !clock.defaulted {
        END_OF_DAY
    } else {
        clock.minutes
    }
}

/// Parses both times and applies the minimum-duration correction.
///
/// The result is unclipped and is what overlap detection sees before
/// windowing.
pub fn corrected_span(start_time: &str, end_time: &str) -> (u32, u32) {
    let start = start_minute(start_time);
    let mut end = end_minute(end_time);
    if end <= start {
        end = start + MIN_DURATION_MINUTES;
    }
    (start, end)
}

/// Normalizes an event's times against the visible window.
pub fn normalize(
    event_id: &EventId,
    start_time: &str,
    end_time: &str,
    window: VisibleWindow,
) -> Normalized {
    let (start, end) = corrected_span(start_time, end_time);
    let visible_start = start.max(window.start_minute());
    let visible_end = end.min(window.end_minute());
    if visible_end <= visible_start {
        return Normalized::NotVisible;
    }
    Normalized::Visible(Interval {
        event_id: event_id.clone(),
        start: visible_start,
        end: visible_end,
    })
}

/// Formats a minute of day as `HH:mm`. 1440 renders as `24:00`.
pub fn format_minute(minute: u32) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}
