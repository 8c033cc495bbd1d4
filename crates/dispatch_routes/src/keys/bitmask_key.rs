use serde::Serialize;

use crate::{oracle::route_candidate::Stops, problem::order::OrderIdx};

use super::{KeyError, SubsetKey, SubsetKeyEncoding, check_length};

/// Largest pool the bitmask encoding (and its dense `2^N` table) accepts.
pub const BITMASK_POOL_LIMIT: usize = 24;

/// Bit `i` is set iff order `i` belongs to the subset.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct BitmaskKey(u32);

impl BitmaskKey {
    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn from_bits(bits: u32) -> Self {
        BitmaskKey(bits)
    }

    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, order: OrderIdx) -> bool {
        order.get() < BITMASK_POOL_LIMIT && self.0 & (1 << order.get()) != 0
    }
}

impl SubsetKeyEncoding for BitmaskKey {
    fn encode(stops: &[OrderIdx]) -> Result<Self, KeyError> {
        check_length(stops)?;

        let mut bits = 0u32;
        for stop in stops {
            let index = stop.get();
            if index >= BITMASK_POOL_LIMIT {
                return Err(KeyError::IndexOutOfRange {
                    index,
                    limit: BITMASK_POOL_LIMIT,
                });
            }

            let bit = 1u32 << index;
            if bits & bit != 0 {
                return Err(KeyError::DuplicateIndex(index));
            }
            bits |= bit;
        }

        Ok(BitmaskKey(bits))
    }

    fn decode(&self) -> Stops {
        let mut stops = Stops::new();
        let mut remaining = self.0;
        while remaining != 0 {
            let index = remaining.trailing_zeros() as usize;
            stops.push(OrderIdx::new(index));
            remaining &= remaining - 1;
        }
        stops
    }

    fn into_subset_key(self) -> SubsetKey {
        SubsetKey::Bitmask(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::order_indices;

    use super::*;

    #[test]
    fn test_encode_sets_bits() {
        let key = BitmaskKey::encode(&order_indices(&[3, 0, 5])).unwrap();
        assert_eq!(key.bits(), 0b101001);
        assert_eq!(key.len(), 3);
        assert!(key.contains(OrderIdx::new(5)));
        assert!(!key.contains(OrderIdx::new(1)));
    }

    #[test]
    fn test_discovery_order_does_not_matter() {
        let a = BitmaskKey::encode(&order_indices(&[7, 2, 11])).unwrap();
        let b = BitmaskKey::encode(&order_indices(&[11, 7, 2])).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_decode_is_ascending() {
        let key = BitmaskKey::encode(&order_indices(&[23, 4, 0])).unwrap();
        assert_eq!(key.decode().as_slice(), order_indices(&[0, 4, 23]).as_slice());
    }

    #[test]
    fn test_rejects_index_past_limit() {
        assert_eq!(
            BitmaskKey::encode(&order_indices(&[24])),
            Err(KeyError::IndexOutOfRange {
                index: 24,
                limit: BITMASK_POOL_LIMIT
            })
        );
    }

    #[test]
    fn test_rejects_duplicates_and_bad_lengths() {
        assert_eq!(
            BitmaskKey::encode(&order_indices(&[1, 1])),
            Err(KeyError::DuplicateIndex(1))
        );
        assert_eq!(BitmaskKey::encode(&[]), Err(KeyError::InvalidLength(0)));
        assert_eq!(
            BitmaskKey::encode(&order_indices(&[0, 1, 2, 3, 4, 5, 6, 7, 8])),
            Err(KeyError::InvalidLength(9))
        );
    }
}
