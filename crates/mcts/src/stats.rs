//! Global search statistics.
//!
//! Q-values and visit counts are not stored on tree nodes: they live in
//! one table owned by the planner, addressed by a [`StatKey`]. Under the
//! default [`StatScope::SharedByState`] keying, two tree paths that reach
//! an identical state value alias the same entry - a deliberate sharing
//! decision inherited from the global-table formulation of the algorithm,
//! made switchable here via [`StatScope::PerNode`].

use crate::node::NodeId;
use std::collections::HashMap;
use std::hash::Hash;

/// How statistics entries are keyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StatScope {
    /// One entry per distinct state value. Tree paths that reach the same
    /// state share Q-values and visit counts.
    #[default]
    SharedByState,

    /// One entry per tree node. Every node keeps private statistics.
    PerNode,
}

/// Key of one statistics entry, per the configured [`StatScope`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StatKey<S> {
    State(S),
    Node(NodeId),
}

/// Per-action statistics of one entry: N(s,a) and Q(s,a).
#[derive(Clone, Debug, Default)]
pub struct EdgeStats {
    /// Visit count of the (state, action) pair.
    pub visits: u64,

    /// Incremental sample mean of the discounted returns observed after
    /// taking this action. 0.0 until the first visit.
    pub q: f64,
}

/// Statistics of one key: N(s) plus one [`EdgeStats`] slot per action.
#[derive(Clone, Debug)]
pub struct StateStats {
    /// Visit count of the state, always the sum of its edge visits.
    pub visits: u64,

    /// Per-action statistics, indexed by action.
    pub edges: Vec<EdgeStats>,
}

impl StateStats {
    fn new(action_count: usize) -> Self {
        Self {
            visits: 0,
            edges: vec![EdgeStats::default(); action_count],
        }
    }
}

/// The planner's Q/N tables.
///
/// Entries materialize on first update with zeroed counts and Q-values,
/// so an absent entry and a zero entry are indistinguishable to readers.
#[derive(Debug)]
pub struct StatTable<S> {
    action_count: usize,
    entries: HashMap<StatKey<S>, StateStats>,
}

impl<S: Clone + Eq + Hash> StatTable<S> {
    /// Create an empty table for the given action count.
    pub fn new(action_count: usize) -> Self {
        Self {
            action_count,
            entries: HashMap::new(),
        }
    }

    /// Fold one observed return into the edge `(key, action)`:
    /// N(s) and N(s,a) each grow by one and Q(s,a) moves by
    /// `(sample - Q) / N(s,a)`, the incremental sample mean.
    pub fn record(&mut self, key: StatKey<S>, action: usize, sample: f64) {
        debug_assert!(action < self.action_count);
        let action_count = self.action_count;
        let entry = self
            .entries
            .entry(key)
            .or_insert_with(|| StateStats::new(action_count));
        entry.visits += 1;
        let edge = &mut entry.edges[action];
        edge.visits += 1;
        edge.q += (sample - edge.q) / edge.visits as f64;
    }

    /// Look up the entry for a key, if any update has touched it.
    pub fn get(&self, key: &StatKey<S>) -> Option<&StateStats> {
        self.entries.get(key)
    }

    /// Number of keys with materialized entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no update has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check the table-wide invariant N(s) == sum over a of N(s,a).
    ///
    /// Holds after every completed backpropagation; exposed so tests can
    /// verify it per simulation.
    pub fn is_consistent(&self) -> bool {
        self.entries
            .values()
            .all(|entry| entry.visits == entry.edges.iter().map(|e| e.visits).sum::<u64>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_first_visit() {
        let mut table: StatTable<u8> = StatTable::new(2);
        table.record(StatKey::State(0), 1, 5.0);

        let entry = table.get(&StatKey::State(0)).unwrap();
        assert_eq!(entry.visits, 1);
        assert_eq!(entry.edges[0].visits, 0);
        assert_eq!(entry.edges[0].q, 0.0);
        assert_eq!(entry.edges[1].visits, 1);
        assert_eq!(entry.edges[1].q, 5.0);
    }

    #[test]
    fn test_record_incremental_mean() {
        let mut table: StatTable<u8> = StatTable::new(2);
        table.record(StatKey::State(0), 0, 1.0);
        table.record(StatKey::State(0), 0, 3.0);
        table.record(StatKey::State(0), 0, 8.0);

        let entry = table.get(&StatKey::State(0)).unwrap();
        assert_eq!(entry.edges[0].visits, 3);
        assert!((entry.edges[0].q - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_state_visits_sum_edges() {
        let mut table: StatTable<u8> = StatTable::new(3);
        table.record(StatKey::State(0), 0, 1.0);
        table.record(StatKey::State(0), 2, -1.0);
        table.record(StatKey::State(0), 2, 2.0);

        let entry = table.get(&StatKey::State(0)).unwrap();
        assert_eq!(entry.visits, 3);
        assert!(table.is_consistent());
    }

    #[test]
    fn test_state_and_node_keys_are_distinct() {
        let mut table: StatTable<u8> = StatTable::new(1);
        table.record(StatKey::State(0), 0, 1.0);
        table.record(StatKey::Node(NodeId::ROOT), 0, -1.0);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&StatKey::State(0)).unwrap().edges[0].q, 1.0);
        assert_eq!(table.get(&StatKey::Node(NodeId::ROOT)).unwrap().edges[0].q, -1.0);
    }

    #[test]
    fn test_missing_entry_reads_none() {
        let table: StatTable<u8> = StatTable::new(2);
        assert!(table.get(&StatKey::State(9)).is_none());
        assert!(table.is_empty());
        assert!(table.is_consistent());
    }
}
