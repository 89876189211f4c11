//! Sweep-line grouping of a day's intervals into overlap clusters.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::normalize::Interval;
use crate::types::{EventId, ValidationError};

/// Identifies a cluster by its day and its position among that day's clusters.
///
/// Renders as `YYYY-MM-DD#N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClusterId {
    pub date: NaiveDate,
    pub seq: usize,
}

impl ClusterId {
    pub const fn new(date: NaiveDate, seq: usize) -> Self {
        Self { date, seq }
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.date.format("%Y-%m-%d"), self.seq)
    }
}

impl FromStr for ClusterId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidClusterId {
            value: s.to_string(),
        };
        let (date, seq) = s.trim().split_once('#').ok_or_else(invalid)?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid())?;
        let seq = seq.parse().map_err(|_| invalid())?;
        Ok(Self { date, seq })
    }
}

impl TryFrom<String> for ClusterId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClusterId> for String {
    fn from(id: ClusterId) -> Self {
        id.to_string()
    }
}

/// A maximal connected component of a day's interval-overlap graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub id: ClusterId,
    /// Members in sweep order (start ascending).
    pub members: Vec<Interval>,
    /// Latest end among the members.
    pub bounds_end: u32,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True for a single event that overlaps nothing.
    pub fn is_standalone(&self) -> bool {
        self.members.len() == 1
    }

    pub fn bounds_start(&self) -> u32 {
        self.members.first().map_or(0, |m| m.start)
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &EventId> {
        self.members.iter().map(|m| &m.event_id)
    }
}

/// Groups one day's visible intervals into maximal overlapping clusters.
///
/// Intervals are sorted by `(start, end)`, ties keeping input order. A new
/// cluster opens whenever an interval starts at or after the furthest end
/// seen in the open cluster, so touching intervals are separate.
pub fn build_clusters(date: NaiveDate, mut intervals: Vec<Interval>) -> Vec<Cluster> {
    intervals.sort_by_key(|i| (i.start, i.end));

    let mut clusters: Vec<Cluster> = Vec::new();
    for interval in intervals {
        match clusters.last_mut() {
            Some(open) if interval.start < open.bounds_end => {
                open.bounds_end = open.bounds_end.max(interval.end);
                open.members.push(interval);
            }
            _ => {
                let id = ClusterId::new(date, clusters.len());
                clusters.push(Cluster {
                    id,
                    bounds_end: interval.end,
                    members: vec![interval],
                });
            }
        }
    }

    tracing::trace!(%date, clusters = clusters.len(), "built clusters");
    clusters
}
