use std::ops::AddAssign;

use serde::Serialize;

/// Counters collected by one slice. Slices are merged by summing.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStatistics {
    pub roots: usize,
    pub oracle_calls: usize,
    pub incremental_calls: usize,

    /// Extensions discarded by time window propagation, never sent to the
    /// oracle
    pub pruned: usize,
    pub rejected: usize,
    pub permutations_checked: usize,
    pub stores: usize,
    pub replacements: usize,
}

impl SearchStatistics {
    pub fn total_oracle_calls(&self) -> usize {
        self.oracle_calls + self.incremental_calls
    }
}

impl AddAssign for SearchStatistics {
    fn add_assign(&mut self, other: Self) {
        self.roots += other.roots;
        self.oracle_calls += other.oracle_calls;
        self.incremental_calls += other.incremental_calls;
        self.pruned += other.pruned;
        self.rejected += other.rejected;
        self.permutations_checked += other.permutations_checked;
        self.stores += other.stores;
        self.replacements += other.replacements;
    }
}
