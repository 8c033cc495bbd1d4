pub mod feasibility_oracle;
pub mod route_candidate;
pub mod time_window_oracle;
