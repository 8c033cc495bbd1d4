use serde::Serialize;

use crate::{
    oracle::route_candidate::{MAX_ROUTE_LENGTH, Stops},
    problem::order::OrderIdx,
};

use super::{KeyError, SubsetKey, SubsetKeyEncoding, check_length};

/// Pads the unused slots of a [`SortedTupleKey`].
pub const SENTINEL: u16 = u16::MAX;

/// Orders must have an index below this to be encoded in a sorted tuple.
pub const SORTED_TUPLE_POOL_LIMIT: usize = SENTINEL as usize;

const SLOT_BITS: u32 = u16::BITS;

/// Ascending order indices in fixed slots, unused slots set to [`SENTINEL`].
///
/// Packing places slot 0 in the most significant 16 bits of a `u128`, so the
/// packed integers sort exactly like the tuples do.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SortedTupleKey([u16; MAX_ROUTE_LENGTH]);

impl SortedTupleKey {
    pub fn slots(&self) -> &[u16; MAX_ROUTE_LENGTH] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.iter().take_while(|&&slot| slot != SENTINEL).count()
    }

    pub fn is_empty(&self) -> bool {
        self.0[0] == SENTINEL
    }

    pub fn pack(&self) -> u128 {
        self.0
            .iter()
            .fold(0u128, |packed, &slot| (packed << SLOT_BITS) | u128::from(slot))
    }

    pub fn unpack(packed: u128) -> Self {
        let mut slots = [SENTINEL; MAX_ROUTE_LENGTH];
        for (position, slot) in slots.iter_mut().enumerate() {
            let shift = SLOT_BITS * (MAX_ROUTE_LENGTH - 1 - position) as u32;
            *slot = (packed >> shift) as u16;
        }
        SortedTupleKey(slots)
    }
}

impl SubsetKeyEncoding for SortedTupleKey {
    fn encode(stops: &[OrderIdx]) -> Result<Self, KeyError> {
        check_length(stops)?;

        let mut slots = [SENTINEL; MAX_ROUTE_LENGTH];
        for (slot, stop) in slots.iter_mut().zip(stops) {
            let index = stop.get();
            *slot = u16::try_from(index)
                .ok()
                .filter(|&value| value != SENTINEL)
                .ok_or(KeyError::IndexOutOfRange {
                    index,
                    limit: SORTED_TUPLE_POOL_LIMIT,
                })?;
        }

        let used = &mut slots[..stops.len()];
        used.sort_unstable();
        if let Some(pair) = used.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(KeyError::DuplicateIndex(usize::from(pair[0])));
        }

        Ok(SortedTupleKey(slots))
    }

    fn decode(&self) -> Stops {
        self.0
            .iter()
            .take_while(|&&slot| slot != SENTINEL)
            .map(|&slot| OrderIdx::new(usize::from(slot)))
            .collect()
    }

    fn into_subset_key(self) -> SubsetKey {
        SubsetKey::SortedTuple(self)
    }
}
