//! Per-subset storage of the cheapest route found so far.

use crate::{
    error::InternalFailure, keys::SubsetKeyEncoding, oracle::route_candidate::RouteCandidate,
};

mod best_route_table;
mod dense_bitmask_table;
mod hashed_table;
mod sorted_domain_table;

pub use best_route_table::{BestRoute, BestRouteTable};
pub use dense_bitmask_table::DenseBitmaskTable;
pub use hashed_table::HashedTable;
pub use sorted_domain_table::SortedDomainTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferOutcome {
    Inserted,
    Replaced,
    Kept,
}

/// Map from subset key to the best-ranked candidate offered for it.
///
/// Entries are only ever inserted or replaced by a better-ranked candidate,
/// never removed while the search runs. Candidates rank by cost and then by
/// stop sequence, so an equally cheap candidate whose stops compare smaller
/// does replace the stored one. This keeps the stored route independent of
/// discovery order.
pub trait RouteTable: Send {
    type Key: SubsetKeyEncoding;

    fn offer(
        &mut self,
        key: Self::Key,
        candidate: &RouteCandidate,
    ) -> Result<OfferOutcome, InternalFailure>;

    fn get(&self, key: &Self::Key) -> Option<&RouteCandidate>;

    fn contains(&self, key: &Self::Key) -> bool {
        self.get(key).is_some()
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every stored entry, ascending by key.
    fn compact(self) -> Vec<(Self::Key, RouteCandidate)>
    where
        Self: Sized;
}

/// Replacement rule shared by every backing.
pub(crate) fn replace_if_better(
    existing: &mut RouteCandidate,
    candidate: &RouteCandidate,
) -> OfferOutcome {
    if candidate.ranks_before(existing) {
        *existing = candidate.clone();
        OfferOutcome::Replaced
    } else {
        OfferOutcome::Kept
    }
}

pub(crate) fn offer_into(
    slot: &mut Option<RouteCandidate>,
    candidate: &RouteCandidate,
) -> OfferOutcome {
    match slot {
        None => {
            *slot = Some(candidate.clone());
            OfferOutcome::Inserted
        }
        Some(existing) => replace_if_better(existing, candidate),
    }
}
