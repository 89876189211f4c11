//! Rotation of overlapping events in the multi-day view.
//!
//! Every cluster with two or more members is drawn as a full-width stack with
//! one active member on top. The active member rotates on user request
//! ([`RotationRegistry::advance`]) and on every timer tick
//! ([`RotationRegistry::tick`]).
//!
//! Rotation state is the only layout state that outlives a render pass. It is
//! kept for as long as a cluster's membership is unchanged and rebuilt
//! otherwise.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cluster::ClusterId;
use crate::source::PriorityTier;
use crate::types::EventId;

/// Which member of a freshly built stack starts on top.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InitialActive {
    /// The last entry of the priority order, i.e. the least urgent event.
    #[default]
    LowestPriority,
    /// The first entry of the priority order.
    HighestPriority,
}

/// What the rotation manager needs to know about a cluster member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationMember {
    pub event_id: EventId,
    pub tier: PriorityTier,
    /// Clipped start minute.
    pub start: u32,
}

/// Rotation state of one stacked cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RotationState {
    cluster_id: ClusterId,
    order: Vec<EventId>,
    active_index: usize,
}

impl RotationState {
    /// Orders members by `(tier, start)` and picks the initial active member.
    ///
    /// Returns `None` for clusters with fewer than two members; those are
    /// drawn without rotation.
    pub fn new(
        cluster_id: ClusterId,
        mut members: Vec<RotationMember>,
        initial: InitialActive,
    ) -> Option<Self> {
        if members.len() < 2 {
            return None;
        }
        members.sort_by_key(|m| (m.tier, m.start));
        let order: Vec<EventId> = members.into_iter().map(|m| m.event_id).collect();
        let active_index = match initial {
            InitialActive::LowestPriority => order.len() - 1,
            InitialActive::HighestPriority => 0,
        };
        Some(Self {
            cluster_id,
            order,
            active_index,
        })
    }

    pub const fn cluster_id(&self) -> ClusterId {
        self.cluster_id
    }

    /// Members in priority order. Fixed for the state's lifetime.
    pub fn order(&self) -> &[EventId] {
        &self.order
    }

    pub const fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active(&self) -> &EventId {
        &self.order[self.active_index]
    }

    pub fn is_active(&self, event_id: &EventId) -> bool {
        self.active() == event_id
    }

    /// Moves the active marker one position along the order, wrapping.
    pub fn advance(&mut self) {
        self.active_index = (self.active_index + 1) % self.order.len();
    }

    /// Stacking depth of a member; higher draws on top.
    ///
    /// The active member gets `len`. Others get `len - 1 - k` for their
    /// position `k`, so higher-priority members stay above lower-priority ones.
    pub fn depth_of(&self, event_id: &EventId) -> Option<u32> {
        let k = self.order.iter().position(|id| id == event_id)?;
        let len = self.order.len();
        let depth = if k == self.active_index { len } else { len - 1 - k };
        u32::try_from(depth).ok()
    }

    fn has_members<'a>(&self, ids: impl Iterator<Item = &'a EventId>) -> bool {
        let mut current: Vec<&EventId> = self.order.iter().collect();
        let mut incoming: Vec<&EventId> = ids.collect();
        current.sort();
        incoming.sort();
        current == incoming
    }
}

/// Outcome counts of a [`RotationRegistry::sync`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub kept: usize,
    pub rebuilt: usize,
    pub dropped: usize,
}

/// Rotation states of every stacked cluster in the current render pass,
/// keyed by cluster id.
#[derive(Debug, Clone, Default)]
pub struct RotationRegistry {
    states: BTreeMap<ClusterId, RotationState>,
    initial: InitialActive,
}

impl RotationRegistry {
    pub fn new(initial: InitialActive) -> Self {
        Self {
            states: BTreeMap::new(),
            initial,
        }
    }

    /// Replaces the tracked cluster set with the clusters of a new render pass.
    ///
    /// A state survives when a cluster on the same day has exactly the same
    /// members, even if its sequence number changed; it is re-keyed under the
    /// new id. Any change in membership rebuilds it. Clusters missing from
    /// `clusters`, or with fewer than two members, stop being tracked.
    pub fn sync<I>(&mut self, clusters: I) -> SyncReport
    where
        I: IntoIterator<Item = (ClusterId, Vec<RotationMember>)>,
    {
        let mut previous = std::mem::take(&mut self.states);
        let mut report = SyncReport::default();

        for (cluster_id, members) in clusters {
            if members.len() < 2 {
                continue;
            }
            let carried = previous
                .iter()
                .find(|(id, state)| {
                    id.date == cluster_id.date
                        && state.has_members(members.iter().map(|m| &m.event_id))
                })
                .map(|(id, _)| *id);
            let existing = carried.and_then(|id| previous.remove(&id));
            let state = if let Some(mut state) = existing {
                if state.cluster_id != cluster_id {
                    tracing::debug!(from = %state.cluster_id, to = %cluster_id, "re-keyed rotation state");
                    state.cluster_id = cluster_id;
                }
                report.kept += 1;
                state
            } else if let Some(state) = RotationState::new(cluster_id, members, self.initial) {
                tracing::debug!(cluster = %cluster_id, active = %state.active(), "built rotation state");
                report.rebuilt += 1;
                state
            } else {
                continue;
            };
            self.states.insert(cluster_id, state);
        }

        report.dropped = previous.len();
        report
    }

    /// Rotates one cluster. Unknown ids are ignored and return `false`.
    pub fn advance(&mut self, cluster_id: ClusterId) -> bool {
        let Some(state) = self.states.get_mut(&cluster_id) else {
            tracing::debug!(cluster = %cluster_id, "advance on untracked cluster ignored");
            return false;
        };
        state.advance();
        tracing::debug!(cluster = %cluster_id, active = %state.active(), "advanced rotation");
        true
    }

    /// Rotates every tracked cluster once. Returns how many were rotated.
    pub fn tick(&mut self) -> usize {
        for state in self.states.values_mut() {
            state.advance();
        }
        self.states.len()
    }

    pub fn get(&self, cluster_id: ClusterId) -> Option<&RotationState> {
        self.states.get(&cluster_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RotationState> {
        self.states.values()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn cid(seq: usize) -> ClusterId {
        ClusterId::new(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(), seq)
    }

    fn member(id: &str, tier: PriorityTier, start: u32) -> RotationMember {
        RotationMember {
            event_id: EventId::new(id).unwrap(),
            tier,
            start,
        }
    }

    fn eid(id: &str) -> EventId {
        EventId::new(id).unwrap()
    }

    fn pair() -> Vec<RotationMember> {
        vec![
            member("a", PriorityTier::General, 540),
            member("b", PriorityTier::Classroom, 570),
        ]
    }

    #[test]
    fn single_member_has_no_rotation() {
        let members = vec![member("a", PriorityTier::General, 540)];
        assert!(RotationState::new(cid(0), members, InitialActive::default()).is_none());
    }

    #[test]
    fn orders_by_tier_then_start() {
        let members = vec![
            member("late-general", PriorityTier::General, 600),
            member("early-general", PriorityTier::General, 540),
            member("study", PriorityTier::Study, 620),
            member("classroom", PriorityTier::Classroom, 630),
        ];
        let state = RotationState::new(cid(0), members, InitialActive::default()).unwrap();
        let order: Vec<&str> = state.order().iter().map(EventId::as_str).collect();
        assert_eq!(order, ["classroom", "study", "early-general", "late-general"]);
    }

    #[test]
    fn lowest_priority_starts_active_by_default() {
        let state = RotationState::new(cid(0), pair(), InitialActive::LowestPriority).unwrap();
        assert_eq!(state.active_index(), 1);
        assert_eq!(state.active().as_str(), "a");
    }

    #[test]
    fn highest_priority_can_start_active() {
        let state = RotationState::new(cid(0), pair(), InitialActive::HighestPriority).unwrap();
        assert_eq!(state.active_index(), 0);
        assert_eq!(state.active().as_str(), "b");
    }

    #[test]
    fn advance_wraps_after_a_full_cycle() {
        let members = vec![
            member("x", PriorityTier::General, 540),
            member("y", PriorityTier::General, 550),
            member("z", PriorityTier::General, 560),
        ];
        let mut state = RotationState::new(cid(0), members, InitialActive::default()).unwrap();
        let original = state.active_index();
        for _ in 0..3 {
            state.advance();
        }
        assert_eq!(state.active_index(), original);
    }

    #[test]
    fn active_member_is_on_top_and_priority_breaks_the_rest() {
        let members = vec![
            member("c1", PriorityTier::Classroom, 540),
            member("s1", PriorityTier::Study, 540),
            member("g1", PriorityTier::General, 540),
        ];
        let mut state = RotationState::new(cid(0), members, InitialActive::default()).unwrap();
        // g1 active
        assert_eq!(state.depth_of(&eid("g1")), Some(3));
        assert_eq!(state.depth_of(&eid("c1")), Some(2));
        assert_eq!(state.depth_of(&eid("s1")), Some(1));

        state.advance(); // c1 active
        assert_eq!(state.depth_of(&eid("c1")), Some(3));
        assert_eq!(state.depth_of(&eid("s1")), Some(1));
        assert_eq!(state.depth_of(&eid("g1")), Some(0));
        assert_eq!(state.depth_of(&eid("missing")), None);
    }

    #[test]
    fn sync_keeps_state_when_membership_is_unchanged() {
        let mut registry = RotationRegistry::default();
        registry.sync([(cid(0), pair())]);
        assert!(registry.advance(cid(0)));
        assert_eq!(registry.get(cid(0)).unwrap().active_index(), 0);

        // same members in a different input order
        let mut reordered = pair();
        reordered.reverse();
        let report = registry.sync([(cid(0), reordered)]);
        assert_eq!(report, SyncReport { kept: 1, rebuilt: 0, dropped: 0 });
        assert_eq!(registry.get(cid(0)).unwrap().active_index(), 0);
    }

    #[test]
    fn sync_carries_state_to_a_shifted_id() {
        let mut registry = RotationRegistry::default();
        registry.sync([(cid(0), pair())]);
        registry.advance(cid(0));

        let report = registry.sync([(cid(1), pair())]);
        assert_eq!(report, SyncReport { kept: 1, rebuilt: 0, dropped: 0 });
        assert!(registry.get(cid(0)).is_none());
        let state = registry.get(cid(1)).unwrap();
        assert_eq!(state.cluster_id(), cid(1));
        assert_eq!(state.active_index(), 0);
    }

    #[test]
    fn sync_does_not_carry_state_across_days() {
        let mut registry = RotationRegistry::default();
        registry.sync([(cid(0), pair())]);
        registry.advance(cid(0));

        let tuesday = ClusterId::new(NaiveDate::from_ymd_opt(2025, 3, 11).unwrap(), 0);
        let report = registry.sync([(tuesday, pair())]);
        assert_eq!(report, SyncReport { kept: 0, rebuilt: 1, dropped: 1 });
        assert_eq!(registry.get(tuesday).unwrap().active_index(), 1);
    }

    #[test]
    fn sync_rebuilds_when_membership_changes() {
        let mut registry = RotationRegistry::default();
        registry.sync([(cid(0), pair())]);
        registry.advance(cid(0));

        let mut grown = pair();
        grown.push(member("c", PriorityTier::Study, 580));
        let report = registry.sync([(cid(0), grown)]);
        assert_eq!(report.rebuilt, 1);
        let state = registry.get(cid(0)).unwrap();
        assert_eq!(state.order().len(), 3);
        assert_eq!(state.active_index(), 2);
    }

    #[test]
    fn sync_drops_vanished_and_shrunk_clusters() {
        let mut registry = RotationRegistry::default();
        registry.sync([(cid(0), pair()), (cid(1), pair())]);
        assert_eq!(registry.len(), 2);

        let shrunk = vec![member("a", PriorityTier::General, 540)];
        let report = registry.sync([(cid(0), shrunk)]);
        assert_eq!(report.dropped, 2);
        assert!(registry.is_empty());
    }

    #[test]
    fn advance_on_unknown_cluster_is_a_no_op() {
        let mut registry = RotationRegistry::default();
        registry.sync([(cid(0), pair())]);
        assert!(!registry.advance(cid(7)));
        assert_eq!(registry.get(cid(0)).unwrap().active_index(), 1);
    }

    #[test]
    fn tick_rotates_every_tracked_cluster() {
        let mut registry = RotationRegistry::default();
        registry.sync([(cid(0), pair()), (cid(1), pair())]);
        assert_eq!(registry.tick(), 2);
        assert!(registry.iter().all(|s| s.active_index() == 0));
    }

    #[test]
    fn advance_and_tick_commute() {
        let mut first = RotationRegistry::default();
        first.sync([(cid(0), pair())]);
        let mut second = first.clone();

        first.advance(cid(0));
        first.tick();
        second.tick();
        second.advance(cid(0));
        assert_eq!(first.get(cid(0)), second.get(cid(0)));
    }
}
