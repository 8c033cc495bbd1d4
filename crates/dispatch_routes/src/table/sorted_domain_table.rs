use itertools::Itertools;

use crate::{
    error::InternalFailure,
    keys::{SortedTupleKey, SubsetKeyEncoding},
    oracle::route_candidate::RouteCandidate,
    problem::order::OrderIdx,
};

use super::{OfferOutcome, RouteTable, offer_into};

/// Sorted-tuple table over a key domain enumerated up front.
///
/// Keys are kept as packed integers in ascending order and looked up by
/// binary search, which relies on packing being monotonic.
pub struct SortedDomainTable {
    keys: Vec<u128>,
    slots: Vec<Option<RouteCandidate>>,
    len: usize,
}

impl SortedDomainTable {
    /// Number of subsets of size `1..=level` of a pool, `None` on overflow.
    pub fn domain_size(pool_size: usize, level: usize) -> Option<usize> {
        let mut total: usize = 0;
        let mut binomial: usize = 1;
        for size in 1..=level.min(pool_size) {
            // C(n, k) = C(n, k - 1) * (n - k + 1) / k, exact at every step
            binomial = binomial.checked_mul(pool_size - size + 1)? / size;
            total = total.checked_add(binomial)?;
        }
        Some(total)
    }

    /// Enumerates every subset of size `1..=level` of the pool.
    pub fn new(pool_size: usize, level: usize) -> Result<Self, InternalFailure> {
        let mut keys = Vec::with_capacity(Self::domain_size(pool_size, level).unwrap_or(0));
        for size in 1..=level.min(pool_size) {
            for combination in (0..pool_size).map(OrderIdx::new).combinations(size) {
                keys.push(SortedTupleKey::encode(&combination)?.pack());
            }
        }
        keys.sort_unstable();

        let slots = vec![None; keys.len()];
        Ok(SortedDomainTable {
            keys,
            slots,
            len: 0,
        })
    }

    pub fn domain_len(&self) -> usize {
        self.keys.len()
    }

    fn position(&self, key: &SortedTupleKey) -> Option<usize> {
        self.keys.binary_search(&key.pack()).ok()
    }
}

impl RouteTable for SortedDomainTable {
    type Key = SortedTupleKey;

    fn offer(
        &mut self,
        key: SortedTupleKey,
        candidate: &RouteCandidate,
    ) -> Result<OfferOutcome, InternalFailure> {
        let position = self
            .position(&key)
            .ok_or(InternalFailure::KeyOutsideDomain)?;

        let outcome = offer_into(&mut self.slots[position], candidate);
        if outcome == OfferOutcome::Inserted {
            self.len += 1;
        }
        Ok(outcome)
    }

    fn get(&self, key: &SortedTupleKey) -> Option<&RouteCandidate> {
        self.position(key)
            .and_then(|position| self.slots[position].as_ref())
    }

    fn len(&self) -> usize {
        self.len
    }

    fn compact(self) -> Vec<(SortedTupleKey, RouteCandidate)> {
        self.keys
            .into_iter()
            .zip(self.slots)
            .filter_map(|(packed, slot)| {
                slot.map(|candidate| (SortedTupleKey::unpack(packed), candidate))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::{problem::time_window::TimeWindow, test_utils::order_indices};

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
    fn test_domain_size() {
        // 5 + 10 + 10
        assert_eq!(SortedDomainTable::domain_size(5, 3), Some(25));
        assert_eq!(SortedDomainTable::domain_size(3, 8), Some(7));
        assert_eq!(SortedDomainTable::domain_size(1000, 2), Some(1000 + 499_500));
        assert_eq!(SortedDomainTable::domain_size(usize::MAX, 8), None);
    }

    #[test]
    fn test_domain_is_enumerated() {
        let table = SortedDomainTable::new(5, 3).unwrap();
        assert_eq!(table.domain_len(), 25);
        assert!(table.is_empty());
    }

    #[test]
    fn test_offer_and_compact() {
        let mut table = SortedDomainTable::new(30, 2).unwrap();
        for (stops, cost) in [(&[29][..], 4), (&[3, 1][..], 9), (&[1, 3][..], 6)] {
            let key = SortedTupleKey::encode(&order_indices(stops)).unwrap();
            table.offer(key, &candidate(stops, cost)).unwrap();
        }

        assert_eq!(table.len(), 2);

        let compacted = table.compact();
        assert_eq!(compacted.len(), 2);
        assert_eq!(compacted[0].0.decode().as_slice(), order_indices(&[1, 3]).as_slice());
        assert_eq!(compacted[0].1.cost(), 6);
        assert_eq!(compacted[1].0.decode().as_slice(), order_indices(&[29]).as_slice());
    }

    #[test]
    fn test_rejects_key_outside_domain() {
        let mut table = SortedDomainTable::new(4, 1).unwrap();
        let key = SortedTupleKey::encode(&order_indices(&[0, 1])).unwrap();

        assert_eq!(
            table.offer(key, &candidate(&[0, 1], 1)),
            Err(InternalFailure::KeyOutsideDomain)
        );
    }
}
