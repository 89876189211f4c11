//! Render passes over one or more calendar days.
//!
//! [`LayoutEngine`] is the single owner of layout state: the configuration,
//! the rotation registry and the rotation scheduler. Every call that changes
//! what is on screen goes through it, and clusters are always addressed by
//! [`ClusterId`].
//!
//! # Pipeline
//!
//! For each day: normalize every event against the visible window, cluster
//! the visible intervals, then either assign columns ([`ViewMode::Day`]) or
//! look up stack depths in the rotation registry ([`ViewMode::Week`]), and
//! finally map everything to grid rectangles.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use serde::Serialize;

use crate::cluster::{Cluster, ClusterId, build_clusters};
use crate::columns::assign_columns;
use crate::event::Event;
use crate::geometry::{GridMetrics, Placement, Rect, place};
use crate::normalize::{Normalized, VisibleWindow, normalize};
use crate::rotation::{InitialActive, RotationMember, RotationRegistry, RotationState};
use crate::scheduler::{DEFAULT_PERIOD, RotationScheduler};
use crate::source::PriorityTier;
use crate::types::EventId;

/// Engine settings, usually built from the user's configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub window: VisibleWindow,
    pub metrics: GridMetrics,
    pub initial_active: InitialActive,
    pub rotation_period: Duration,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            window: VisibleWindow::default(),
            metrics: GridMetrics::default(),
            initial_active: InitialActive::default(),
            rotation_period: DEFAULT_PERIOD,
        }
    }
}

/// Presentation strategy for overlapping events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// One day, overlapping events side by side in columns.
    Day,
    /// Several days, overlapping events stacked and rotated.
    Week,
}

/// Layout of one visible event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleLayout {
    pub cluster: ClusterId,
    /// Clipped start minute.
    pub start: u32,
    /// Clipped end minute.
    pub end: u32,
    pub placement: Placement,
    pub rect: Rect,
    /// Drawn on top of a rotating stack.
    pub active: bool,
}

/// Layout descriptor of one event. `layout` is `None` when the event lies
/// entirely outside the visible window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventLayout {
    pub event_id: EventId,
    pub title: String,
    pub layout: Option<VisibleLayout>,
}

impl EventLayout {
    pub const fn is_visible(&self) -> bool {
        self.layout.is_some()
    }
}

/// A cluster as seen by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSummary {
    pub id: ClusterId,
    /// Members in sweep order.
    pub members: Vec<EventId>,
    pub start: u32,
    pub end: u32,
    /// Present for stacked clusters in the week view.
    pub rotation: Option<RotationState>,
}

/// Everything drawn for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayLayout {
    pub date: NaiveDate,
    /// Events of the day in input order.
    pub events: Vec<EventLayout>,
    pub clusters: Vec<ClusterSummary>,
}

impl DayLayout {
    pub fn event(&self, event_id: &str) -> Option<&EventLayout> {
        self.events.iter().find(|e| e.event_id.as_str() == event_id)
    }
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPass {
    pub mode: ViewMode,
    pub window: VisibleWindow,
    pub days: Vec<DayLayout>,
}

impl RenderPass {
    pub fn day(&self, date: NaiveDate) -> Option<&DayLayout> {
        self.days.iter().find(|d| d.date == date)
    }
}

/// Intermediate per-day state between clustering and placement.
struct DayBuild<'a> {
    date: NaiveDate,
    events: Vec<&'a Event>,
    clusters: Vec<Cluster>,
}

fn rotation_members(cluster: &Cluster, events: &HashMap<&EventId, &Event>) -> Vec<RotationMember> {
    cluster
        .members
        .iter()
        .map(|m| RotationMember {
            event_id: m.event_id.clone(),
            tier: events
                .get(&m.event_id)
                .map_or(PriorityTier::General, |e| e.priority_tier()),
            start: m.start,
        })
        .collect()
}

/// Owner of all layout state across render passes.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: LayoutConfig,
    rotations: RotationRegistry,
    scheduler: RotationScheduler,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            rotations: RotationRegistry::new(config.initial_active),
            scheduler: RotationScheduler::new(config.rotation_period),
            config,
        }
    }

    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub const fn rotations(&self) -> &RotationRegistry {
        &self.rotations
    }

    pub const fn scheduler(&self) -> &RotationScheduler {
        &self.scheduler
    }

    /// Lays out `days` from scratch.
    ///
    /// Events dated outside `days` are ignored, as are repeated ids after
    /// their first occurrence. In week mode the rotation registry is synced
    /// against the new clusters; in day mode nothing is tracked. Afterwards the
    /// scheduler runs exactly when at least one cluster is tracked.
    pub fn render(&mut self, mode: ViewMode, days: &[NaiveDate], events: &[Event], now: Instant) -> RenderPass {
        let window = self.config.window;
        let mut seen: HashSet<&EventId> = HashSet::new();
        let mut hidden = 0usize;
        let mut builds: Vec<DayBuild<'_>> = Vec::with_capacity(days.len());

        for &date in days {
            let day_events: Vec<&Event> = events
                .iter()
                .filter(|e| e.date == date)
                .filter(|&e| {
                    let first = seen.insert(&e.id);
                    if !first {
                        tracing::warn!(event_id = %e.id, "skipping duplicate event id");
                    }
                    first
                })
                .collect();

            let mut intervals = Vec::with_capacity(day_events.len());
            for event in &day_events {
                match normalize(&event.id, &event.start_time, &event.end_time, window) {
                    Normalized::Visible(interval) => intervals.push(interval),
                    Normalized::NotVisible => hidden += 1,
                }
            }

            builds.push(DayBuild {
                date,
                clusters: build_clusters(date, intervals),
                events: day_events,
            });
        }

        let report = match mode {
            ViewMode::Week => {
                let stacked: Vec<(ClusterId, Vec<RotationMember>)> = builds
                    .iter()
                    .flat_map(|build| {
                        let by_id: HashMap<&EventId, &Event> =
                            build.events.iter().map(|&e| (&e.id, e)).collect();
                        build
                            .clusters
                            .iter()
                            .filter(|c| !c.is_standalone())
                            .map(move |c| (c.id, rotation_members(c, &by_id)))
                            .collect::<Vec<_>>()
                    })
                    .collect();
                self.rotations.sync(stacked)
            }
            ViewMode::Day => self.rotations.sync(std::iter::empty()),
        };
        self.arm_scheduler(now);

        let days: Vec<DayLayout> = builds
            .into_iter()
            .map(|build| self.lay_out_day(mode, build))
            .collect();

        tracing::debug!(
            ?mode,
            days = days.len(),
            hidden,
            kept = report.kept,
            rebuilt = report.rebuilt,
            dropped = report.dropped,
            "render pass complete"
        );

        RenderPass { mode, window, days }
    }

    /// Rotates one cluster on user request. Unknown ids are ignored.
    pub fn advance(&mut self, cluster_id: ClusterId) -> bool {
        self.rotations.advance(cluster_id)
    }

    /// Rotates every tracked cluster once.
    pub fn tick(&mut self) -> usize {
        let rotated = self.rotations.tick();
        tracing::info!(rotated, "rotation tick");
        rotated
    }

    /// Ticks if the rotation timer is due at `now`.
    pub fn poll_timer(&mut self, now: Instant) -> bool {
        if self.scheduler.poll(now) {
            self.tick();
            true
        } else {
            false
        }
    }

    fn arm_scheduler(&mut self, now: Instant) {
        if self.rotations.is_empty() {
            self.scheduler.stop();
        } else if !self.scheduler.is_running() {
            self.scheduler.start(now);
        }
    }

    fn lay_out_day(&self, mode: ViewMode, build: DayBuild<'_>) -> DayLayout {
        let window = self.config.window;
        let metrics = self.config.metrics;
        let mut placed: HashMap<EventId, VisibleLayout> = HashMap::new();
        let mut clusters = Vec::with_capacity(build.clusters.len());

        for cluster in &build.clusters {
            let rotation = match mode {
                ViewMode::Week => self.rotations.get(cluster.id),
                ViewMode::Day => None,
            };
            let columns = match mode {
                ViewMode::Day => assign_columns(cluster),
                ViewMode::Week => Vec::new(),
            };

            for (index, member) in cluster.members.iter().enumerate() {
                let (placement, active) = if let Some(assignment) = columns.get(index) {
                    let placement = Placement::Column {
                        column: assignment.column,
                        column_count: assignment.column_count,
                    };
                    (placement, false)
                } else if let Some(state) = rotation {
                    let depth = state.depth_of(&member.event_id).unwrap_or(0);
                    (Placement::Stack { depth }, state.is_active(&member.event_id))
                } else {
                    (Placement::Stack { depth: 0 }, false)
                };

                placed.insert(
                    member.event_id.clone(),
                    VisibleLayout {
                        cluster: cluster.id,
                        start: member.start,
                        end: member.end,
                        placement,
                        rect: place(member, window, metrics, placement),
                        active,
                    },
                );
            }

            clusters.push(ClusterSummary {
                id: cluster.id,
                members: cluster.member_ids().cloned().collect(),
                start: cluster.bounds_start(),
                end: cluster.bounds_end,
                rotation: rotation.cloned(),
            });
        }

        let events = build
            .events
            .into_iter()
            .map(|event| EventLayout {
                event_id: event.id.clone(),
                title: event.title.clone(),
                layout: placed.remove(&event.id),
            })
            .collect();

        DayLayout {
            date: build.date,
            events,
            clusters,
        }
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}
