//! Routing module
//!
//! Provides the static route table and exact `(method, path)` matching.

mod table;

pub use table::{Route, RouteHandler, RouteMatch, RouteTable};
