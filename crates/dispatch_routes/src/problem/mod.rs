pub mod dispatch_problem;
pub mod error;
pub mod geo_matrix;
pub mod order;
pub mod shop;
pub mod time_window;
pub mod vehicle;
