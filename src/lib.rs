//! Liveness server
//!
//! Answers `GET /` with `200 OK` on all interfaces; every other request gets a
//! non-2xx status. The binary in `main.rs` wires configuration, logging and the
//! Tokio runtime around the pieces exported here.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;

pub use config::{AppState, Config};
pub use error::ServerError;
