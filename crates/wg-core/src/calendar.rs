//! Week arithmetic and grid decorations.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike};

use crate::normalize::VisibleWindow;

/// Returns the Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let days_since_monday = date.weekday().num_days_from_monday();
    date - Duration::days(i64::from(days_since_monday))
}

/// The seven days, Monday through Sunday, of the week containing `date`.
pub fn week_days(date: NaiveDate) -> Vec<NaiveDate> {
    let monday = week_start(date);
    (0..7).map(|offset| monday + Duration::days(offset)).collect()
}

/// Row labels, one per visible hour including the last.
pub fn hour_labels(window: VisibleWindow) -> Vec<String> {
    (window.start_hour()..=window.end_hour())
        .map(|hour| format!("{hour:02}:00"))
        .collect()
}

/// Pixel offset of the "now" line from the top of the grid.
///
/// `None` when `now` falls before the window's first hour or after the
/// start of its last hour.
#[allow(
    clippy::cast_precision_loss,
    reason = "minute offsets are far below f32 precision limits"
)]
pub fn now_marker_offset(window: VisibleWindow, row_height: f32, now: NaiveTime) -> Option<f32> {
    let minute = now.hour() * 60 + now.minute();
    let first = window.start_minute();
    let last = window.end_hour() * 60;
    if minute < first || minute > last {
        return None;
    }
    Some((minute - first) as f32 / 60.0 * row_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_starts_on_monday() {
        // 2025-03-12 is a Wednesday
        assert_eq!(week_start(date(2025, 3, 12)), date(2025, 3, 10));
        assert_eq!(week_start(date(2025, 3, 10)), date(2025, 3, 10));
    }

    #[test]
    fn sunday_belongs_to_the_previous_monday() {
        assert_eq!(week_start(date(2025, 3, 16)), date(2025, 3, 10));
    }

    #[test]
    fn week_days_span_monday_to_sunday() {
        let days = week_days(date(2025, 12, 31));
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], date(2025, 12, 29));
        assert_eq!(days[6], date(2026, 1, 4));
    }

    #[test]
    fn labels_include_the_last_hour() {
        let labels = hour_labels(VisibleWindow::new(7, 9).unwrap());
        assert_eq!(labels, ["07:00", "08:00", "09:00"]);
    }

    #[test]
    fn now_marker_inside_window() {
        let window = VisibleWindow::default();
        let offset = now_marker_offset(window, 30.0, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert!((offset.unwrap() - 45.0).abs() < f32::EPSILON);
    }

    #[test]
    fn now_marker_outside_window() {
        let window = VisibleWindow::default();
        assert!(now_marker_offset(window, 30.0, NaiveTime::from_hms_opt(6, 59, 0).unwrap()).is_none());
        assert!(now_marker_offset(window, 30.0, NaiveTime::from_hms_opt(22, 1, 0).unwrap()).is_none());
        assert!(now_marker_offset(window, 30.0, NaiveTime::from_hms_opt(22, 0, 0).unwrap()).is_some());
    }
}
