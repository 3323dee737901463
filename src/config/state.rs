// Application state module
// Read-only state shared by every connection task

use std::sync::atomic::AtomicUsize;

use super::types::Config;
use crate::logger::AccessLogFormat;
use crate::routing::RouteTable;

/// Application state
pub struct AppState {
    pub config: Config,
    pub routes: RouteTable,
    /// Parsed once from `logging.access_log_format`
    pub access_log_format: AccessLogFormat,
    /// Connections currently being served
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let access_log_format = AccessLogFormat::parse(&config.logging.access_log_format);
        Self {
            config,
            routes: RouteTable::liveness(),
            access_log_format,
            active_connections: AtomicUsize::new(0),
        }
    }
}
