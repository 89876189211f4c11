//! Greedy column assignment for the single-day view.

use serde::{Deserialize, Serialize};

use crate::cluster::Cluster;
use crate::types::EventId;

/// Where one event sits among its cluster's side-by-side columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnAssignment {
    pub event_id: EventId,
    pub column: usize,
    pub column_count: usize,
}

/// Colors a cluster's interval graph left to right.
///
/// Members are visited in sweep order; each takes the leftmost column whose
/// current occupant has ended by the member's start (`end <= start`, the same
/// half-open rule the cluster builder uses), or opens a new column. Visiting
/// by start time makes the column count equal the cluster's peak overlap.
pub fn assign_columns(cluster: &Cluster) -> Vec<ColumnAssignment> {
    let mut column_end: Vec<u32> = Vec::new();
    let mut placed: Vec<(EventId, usize)> = Vec::with_capacity(cluster.len());

    for member in &cluster.members {
        let column = if let Some(free) = column_end.iter().position(|&end| end <= member.start) {
            column_end[free] = member.end;
            free
        } else {
            column_end.push(member.end);
            column_end.len() - 1
        };
        placed.push((member.event_id.clone(), column));
    }

    let column_count = column_end.len();
    placed
        .into_iter()
        .map(|(event_id, column)| ColumnAssignment {
            event_id,
            column,
            column_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::build_clusters;
    use crate::normalize::Interval;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn iv(id: &str, start: u32, end: u32) -> Interval {
        Interval {
            event_id: EventId::new(id).unwrap(),
            start,
            end,
        }
    }

    fn single_cluster(intervals: Vec<Interval>) -> Cluster {
        let mut clusters = build_clusters(day(), intervals);
        assert_eq!(clusters.len(), 1, "fixture must form one cluster");
        clusters.remove(0)
    }

    fn column_of(assignments: &[ColumnAssignment], id: &str) -> usize {
        assignments
            .iter()
            .find(|a| a.event_id.as_str() == id)
            .map(|a| a.column)
            .unwrap()
    }

    #[test]
    fn standalone_event_gets_one_column() {
        let cluster = single_cluster(vec![iv("solo", 600, 660)]);
        let assignments = assign_columns(&cluster);
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].column, 0);
        assert_eq!(assignments[0].column_count, 1);
    }

    #[test]
    fn three_mutually_overlapping_use_three_columns() {
        let cluster = single_cluster(vec![iv("a", 540, 660), iv("b", 560, 640), iv("c", 580, 620)]);
        let assignments = assign_columns(&cluster);
        assert!(assignments.iter().all(|a| a.column_count == 3));
        assert_eq!(column_of(&assignments, "a"), 0);
        assert_eq!(column_of(&assignments, "b"), 1);
        assert_eq!(column_of(&assignments, "c"), 2);
    }

    #[test]
    fn two_chains_sharing_a_pivot_use_two_columns() {
        // a and c never overlap; p overlaps both
        let cluster = single_cluster(vec![iv("a", 540, 600), iv("p", 570, 690), iv("c", 660, 720)]);
        let assignments = assign_columns(&cluster);
        assert!(assignments.iter().all(|a| a.column_count <= 2));
        assert_eq!(column_of(&assignments, "a"), column_of(&assignments, "c"));
        assert_ne!(column_of(&assignments, "a"), column_of(&assignments, "p"));
    }

    #[test]
    fn touching_member_reuses_column() {
        // c starts exactly when a ends
        let cluster = single_cluster(vec![iv("a", 540, 600), iv("b", 570, 660), iv("c", 600, 630)]);
        let assignments = assign_columns(&cluster);
        assert_eq!(assignments[0].column_count, 2);
        assert_eq!(column_of(&assignments, "c"), 0);
    }

    fn arb_cluster() -> impl Strategy<Value = Vec<Interval>> {
        prop::collection::vec((0u32..600, 1u32..180), 1..30).prop_map(|spans| {
            spans
                .into_iter()
                .enumerate()
                .map(|(n, (start, len))| iv(&format!("e{n}"), start, start + len))
                .collect()
        })
    }

    fn peak_overlap(members: &[Interval]) -> usize {
        members
            .iter()
            .map(|probe| members.iter().filter(|m| m.start <= probe.start && probe.start < m.end).count())
            .max()
            .unwrap_or(0)
    }

    proptest! {
        #[test]
        fn no_overlap_within_a_column(intervals in arb_cluster()) {
            for cluster in build_clusters(day(), intervals) {
                let assignments = assign_columns(&cluster);
                for (i, x) in cluster.members.iter().enumerate() {
                    for (j, y) in cluster.members.iter().enumerate().skip(i + 1) {
                        if assignments[i].column == assignments[j].column {
                            prop_assert!(!x.overlaps(y));
                        }
                    }
                }
            }
        }

        #[test]
        fn column_count_matches_peak_overlap(intervals in arb_cluster()) {
            for cluster in build_clusters(day(), intervals) {
                let assignments = assign_columns(&cluster);
                prop_assert_eq!(assignments[0].column_count, peak_overlap(&cluster.members));
                prop_assert!(assignments.iter().all(|a| a.column < a.column_count));
            }
        }
    }
}
