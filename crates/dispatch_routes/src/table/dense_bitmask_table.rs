use crate::{
    error::InternalFailure, keys::BitmaskKey, oracle::route_candidate::RouteCandidate,
};

use super::{OfferOutcome, RouteTable, replace_if_better};

const EMPTY_SLOT: u32 = u32::MAX;

/// Table addressed directly by the bitmask value.
///
/// `slots` has one entry per possible subset of the pool (`2^N`) and points
/// into `entries`, which only holds the subsets actually found.
pub struct DenseBitmaskTable {
    slots: Vec<u32>,
    entries: Vec<(BitmaskKey, RouteCandidate)>,
}

impl DenseBitmaskTable {
    /// `pool_size` must not exceed [`BITMASK_POOL_LIMIT`](crate::keys::BITMASK_POOL_LIMIT).
    pub fn new(pool_size: usize) -> Self {
        DenseBitmaskTable {
            slots: vec![EMPTY_SLOT; 1usize << pool_size],
            entries: Vec::new(),
        }
    }
}

impl RouteTable for DenseBitmaskTable {
    type Key = BitmaskKey;

    fn offer(
        &mut self,
        key: BitmaskKey,
        candidate: &RouteCandidate,
    ) -> Result<OfferOutcome, InternalFailure> {
        let slot = self
            .slots
            .get_mut(key.bits() as usize)
            .ok_or(InternalFailure::KeyOutsideDomain)?;

        if *slot == EMPTY_SLOT {
            *slot = self.entries.len() as u32;
            self.entries.push((key, candidate.clone()));
            return Ok(OfferOutcome::Inserted);
        }

        let (_, existing) = &mut self.entries[*slot as usize];
        Ok(replace_if_better(existing, candidate))
    }

    fn get(&self, key: &BitmaskKey) -> Option<&RouteCandidate> {
        match self.slots.get(key.bits() as usize) {
            Some(&slot) if slot != EMPTY_SLOT => Some(&self.entries[slot as usize].1),
            _ => None,
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn compact(self) -> Vec<(BitmaskKey, RouteCandidate)> {
        let mut entries: Vec<Option<(BitmaskKey, RouteCandidate)>> =
            self.entries.into_iter().map(Some).collect();

        self.slots
            .iter()
            .filter(|&&slot| slot != EMPTY_SLOT)
            .filter_map(|&slot| entries[slot as usize].take())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

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
    fn test_keeps_cheapest() {
        let mut table = DenseBitmaskTable::new(4);
        let key = BitmaskKey::encode(&order_indices(&[1, 2])).unwrap();

        assert_eq!(table.offer(key, &candidate(&[1, 2], 10)), Ok(OfferOutcome::Inserted));
        assert_eq!(table.offer(key, &candidate(&[2, 1], 12)), Ok(OfferOutcome::Kept));
        assert_eq!(table.offer(key, &candidate(&[2, 1], 8)), Ok(OfferOutcome::Replaced));

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&key).map(|c| c.cost()), Some(8));
    }

    #[test]
    fn test_compact_is_ascending() {
        let mut table = DenseBitmaskTable::new(4);
        for stops in [&[3][..], &[0, 1][..], &[1][..], &[0][..]] {
            let key = BitmaskKey::encode(&order_indices(stops)).unwrap();
            table.offer(key, &candidate(stops, 1)).unwrap();
        }

        let keys: Vec<u32> = table.compact().iter().map(|(key, _)| key.bits()).collect();
        assert_eq!(keys, vec![0b0001, 0b0010, 0b0011, 0b1000]);
    }

    #[test]
    fn test_rejects_key_outside_pool() {
        let mut table = DenseBitmaskTable::new(2);
        let key = BitmaskKey::from_bits(0b100);
        let route = RouteCandidate::new(
            smallvec![OrderIdx::new(2)],
            1,
            TimeWindow::new(0, 0),
            smallvec![0],
            0,
        );

        assert_eq!(
            table.offer(key, &route),
            Err(InternalFailure::KeyOutsideDomain)
        );
        assert!(table.get(&key).is_none());
    }
}
