pub mod fan_out;
pub mod pruning;
mod route_search;
pub mod search_params;
pub mod slice;
pub mod statistics;
