use std::collections::hash_map::Entry;

use fxhash::FxHashMap;

use crate::{
    error::InternalFailure, keys::SortedTupleKey, oracle::route_candidate::RouteCandidate,
};

use super::{OfferOutcome, RouteTable, replace_if_better};

/// Sorted-tuple table for pools whose key domain is too large to enumerate.
#[derive(Default)]
pub struct HashedTable {
    map: FxHashMap<SortedTupleKey, RouteCandidate>,
}

impl HashedTable {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RouteTable for HashedTable {
    type Key = SortedTupleKey;

    fn offer(
        &mut self,
        key: SortedTupleKey,
        candidate: &RouteCandidate,
    ) -> Result<OfferOutcome, InternalFailure> {
        let outcome = match self.map.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(candidate.clone());
                OfferOutcome::Inserted
            }
            Entry::Occupied(mut entry) => replace_if_better(entry.get_mut(), candidate),
        };
        Ok(outcome)
    }

    fn get(&self, key: &SortedTupleKey) -> Option<&RouteCandidate> {
        self.map.get(key)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn compact(self) -> Vec<(SortedTupleKey, RouteCandidate)> {
        let mut entries: Vec<(SortedTupleKey, RouteCandidate)> = self.map.into_iter().collect();
        entries.sort_unstable_by_key(|(key, _)| *key);
        entries
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        keys::SubsetKeyEncoding,
        problem::{order::OrderIdx, time_window::TimeWindow},
        test_utils::order_indices,
    };

    use super::*;

    fn candidate(stops: &[usize], cost: i64) -> RouteCandidate {
        RouteCandidate::new(
            stops.iter().copied().map(OrderIdx::new).collect(),
            cost,
            TimeWindow::new(0, 0),
            stops.iter().map(|_| 0).collect(),
            0,
        )
    }

    #[test]
    fn test_equal_cost_prefers_smaller_stop_sequence() {
        let mut table = HashedTable::new();
        let key = SortedTupleKey::encode(&order_indices(&[100, 40])).unwrap();

        table.offer(key, &candidate(&[100, 40], 7)).unwrap();
        assert_eq!(
            table.offer(key, &candidate(&[40, 100], 7)),
            Ok(OfferOutcome::Replaced)
        );
        assert_eq!(
            table.get(&key).map(|c| c.stops().to_vec()),
            Some(order_indices(&[40, 100]))
        );
    }

    #[test]
    fn test_compact_sorts_keys() {
        let mut table = HashedTable::new();
        for stops in [&[900][..], &[2, 3][..], &[2][..]] {
            let key = SortedTupleKey::encode(&order_indices(stops)).unwrap();
            table.offer(key, &candidate(stops, 1)).unwrap();
        }

        let compacted = table.compact();
        let keys: Vec<SortedTupleKey> = compacted.iter().map(|(key, _)| *key).collect();
        let mut sorted = keys.clone();
        sorted.sort();

        assert_eq!(keys, sorted);
        assert_eq!(compacted.len(), 3);
    }
}
