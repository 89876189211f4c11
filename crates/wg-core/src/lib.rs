//! Core layout engine for the week grid calendar.
//!
//! This crate decides how a day's events are presented when their time
//! ranges overlap:
//! - Normalization: raw `HH:mm` strings to clipped minute intervals
//! - Clustering: maximal groups of overlapping intervals per day
//! - Columns: side-by-side placement for the single-day view
//! - Rotation: stacked, periodically rotating placement for the week view
//! - Geometry: pixel rectangles and stacking depth

pub mod calendar;
pub mod cluster;
pub mod columns;
pub mod event;
pub mod geometry;
mod layout;
pub mod normalize;
pub mod rotation;
pub mod scheduler;
pub mod source;
pub mod types;

pub use cluster::{Cluster, ClusterId, build_clusters};
pub use columns::{ColumnAssignment, assign_columns};
pub use event::Event;
pub use geometry::{GridMetrics, Placement, Rect};
pub use layout::{
    ClusterSummary, DayLayout, EventLayout, LayoutConfig, LayoutEngine, RenderPass, ViewMode,
    VisibleLayout,
};
pub use normalize::{Interval, Normalized, VisibleWindow, normalize};
pub use rotation::{InitialActive, RotationRegistry, RotationState};
pub use scheduler::RotationScheduler;
pub use source::{EventSource, PriorityTier};
pub use types::{EventId, ValidationError};
