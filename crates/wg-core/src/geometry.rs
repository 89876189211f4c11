//! Mapping of clipped intervals and layout decisions onto the grid.

use serde::{Deserialize, Serialize};

use crate::normalize::{Interval, VisibleWindow};
use crate::types::ValidationError;

/// Pixel and percentage constants of the time grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridMetrics {
    /// Height of one hour row in pixels.
    pub row_height: f32,
    /// Smallest drawn height, so short events stay clickable.
    pub min_height: f32,
    /// Horizontal gap subtracted from each column's width, in percent.
    pub column_gutter: f32,
}

impl GridMetrics {
    /// Blocks at most this tall only show their title.
    pub const TIME_LABEL_MIN_HEIGHT: f32 = 20.0;

    pub fn new(row_height: f32, min_height: f32, column_gutter: f32) -> Result<Self, ValidationError> {
        if row_height.is_nan() || row_height <= 0.0 {
            return Err(ValidationError::NotPositive {
                field: "row_height",
                value: row_height,
            });
        }
        if min_height.is_nan() || min_height <= 0.0 {
            return Err(ValidationError::NotPositive {
                field: "min_height",
                value: min_height,
            });
        }
        Ok(Self {
            row_height,
            min_height,
            column_gutter: if column_gutter.is_nan() { 0.0 } else { column_gutter.max(0.0) },
        })
    }
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            row_height: 30.0,
            min_height: 15.0,
            column_gutter: 1.0,
        }
    }
}

/// How an event shares horizontal space with its cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Placement {
    /// Side by side at reduced width (single-day view).
    Column { column: usize, column_count: usize },
    /// Full width, ordered by depth (multi-day view).
    Stack { depth: u32 },
}

/// Where an event is drawn. `top`/`height` are pixels, `left`/`width` percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f32,
    pub height: f32,
    pub left: f32,
    pub width: f32,
    pub depth: u32,
}

impl Rect {
    /// Whether the block is tall enough for a `HH:mm - HH:mm` line under the title.
    pub fn shows_time_label(&self) -> bool {
        self.height > GridMetrics::TIME_LABEL_MIN_HEIGHT
    }
}

/// Computes the rectangle of a visible interval.
#[allow(
    clippy::cast_precision_loss,
    reason = "minute offsets and column counts are far below f32 precision limits"
)]
pub fn place(interval: &Interval, window: VisibleWindow, metrics: GridMetrics, placement: Placement) -> Rect {
    let offset = interval.start.saturating_sub(window.start_minute());
    let top = offset as f32 / 60.0 * metrics.row_height;
    let height = (interval.duration() as f32 / 60.0 * metrics.row_height).max(metrics.min_height);

    match placement {
        Placement::Column {
            column,
            column_count,
        } => {
            let share = 100.0 / column_count.max(1) as f32;
            Rect {
                top,
                height,
                left: column as f32 * share,
                width: (share - metrics.column_gutter).max(0.0),
                depth: 0,
            }
        }
        Placement::Stack { depth } => Rect {
            top,
            height,
            left: 0.0,
            width: 100.0,
            depth,
        },
    }
}
