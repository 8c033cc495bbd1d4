use std::cmp::Ordering;

use serde::Serialize;

use crate::{
    keys::{SubsetKey, SubsetKeyEncoding},
    oracle::route_candidate::{MAX_ROUTE_LENGTH, RouteCandidate},
};

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BestRoute {
    pub key: SubsetKey,
    pub route: RouteCandidate,
}

/// The compacted result of a search: one best route per subset, ascending
/// by key, no gaps.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct BestRouteTable {
    entries: Vec<BestRoute>,
}

impl BestRouteTable {
    /// `compacted` must already be ascending by key.
    pub fn from_compacted<K: SubsetKeyEncoding>(compacted: Vec<(K, RouteCandidate)>) -> Self {
        debug_assert!(compacted.is_sorted_by(|(a, _), (b, _)| a < b));
        BestRouteTable {
            entries: compacted
                .into_iter()
                .map(|(key, route)| BestRoute {
                    key: key.into_subset_key(),
                    route,
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[BestRoute] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<BestRoute> {
        self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &BestRoute> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &SubsetKey) -> Option<&RouteCandidate> {
        self.entries
            .binary_search_by(|entry| entry.key.cmp(key))
            .ok()
            .map(|position| &self.entries[position].route)
    }

    /// Number of entries per subset size; index 0 is always zero.
    pub fn count_by_size(&self) -> [usize; MAX_ROUTE_LENGTH + 1] {
        let mut counts = [0; MAX_ROUTE_LENGTH + 1];
        for entry in &self.entries {
            if let Some(count) = counts.get_mut(entry.key.len()) {
                *count += 1;
            }
        }
        counts
    }

    /// Keeps, for every key present in either table, the better-ranked route.
    ///
    /// The result does not depend on the argument order, so slice tables can be
    /// merged as they complete.
    pub fn merge(self, other: BestRouteTable) -> BestRouteTable {
        let mut merged = Vec::with_capacity(self.entries.len().max(other.entries.len()));
        let mut left = self.entries.into_iter().peekable();
        let mut right = other.entries.into_iter().peekable();

        loop {
            let ordering = match (left.peek(), right.peek()) {
                (Some(a), Some(b)) => a.key.cmp(&b.key),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => break,
            };

            let next = match ordering {
                Ordering::Less => left.next(),
                Ordering::Greater => right.next(),
                Ordering::Equal => match (left.next(), right.next()) {
                    (Some(a), Some(b)) => Some(if b.route.ranks_before(&a.route) { b } else { a }),
                    (a, b) => a.or(b),
                },
            };

            if let Some(entry) = next {
                merged.push(entry);
            }
        }

        BestRouteTable { entries: merged }
    }

    pub fn merge_all<I>(tables: I) -> BestRouteTable
    where
        I: IntoIterator<Item = BestRouteTable>,
    {
        tables
            .into_iter()
            .fold(BestRouteTable::default(), BestRouteTable::merge)
    }
}
