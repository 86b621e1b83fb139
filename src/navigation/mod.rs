//! Route resolution and the navigation loop that consults the guard.

pub mod navigator;
pub mod route_table;

pub use navigator::{Navigation, Navigator};
pub use route_table::RouteTable;
