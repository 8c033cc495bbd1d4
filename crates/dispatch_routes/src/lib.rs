//! Best route per order subset for courier dispatch.
//!
//! Given a shop's pending orders and one vehicle, the search enumerates stop
//! orderings of up to eight orders, prunes them with time window propagation,
//! validates the survivors through a [`FeasibilityOracle`] and keeps the
//! cheapest route for every subset of orders it finds.
//!
//! [`FeasibilityOracle`]: oracle::feasibility_oracle::FeasibilityOracle

pub mod error;
pub mod json;
pub mod keys;
pub mod oracle;
pub mod problem;
pub mod search;
pub mod table;
mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
