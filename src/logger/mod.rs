//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Server lifecycle logging
//! - Access logging in combined, common or json format
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::{AccessLogEntry, AccessLogFormat};

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => writer::write_stdout(message),
    }
}

fn write_warning(message: &str) {
    match writer::get() {
        Some(w) => w.write_warning(message),
        None => writer::write_stderr(message),
    }
}

fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => writer::write_stderr(message),
    }
}

fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => writer::write_stdout(message),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Liveness server started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info("Route: GET / -> 200 OK");
    match config.server.workers {
        Some(workers) => write_info(&format!("Worker threads: {workers}")),
        None => write_info("Worker threads: default (CPU cores)"),
    }
    if let Some(max) = config.performance.max_connections {
        write_info(&format!("Max connections: {max}"));
    }
    if config.performance.connection_timeout > 0 {
        write_info(&format!(
            "Connection timeout: {}s",
            config.performance.connection_timeout
        ));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================");
}

pub fn log_connection_error(peer_addr: &SocketAddr, err: &hyper::Error) {
    write_warning(&format!("[WARN] Connection from {peer_addr} failed: {err}"));
}

pub fn log_connection_timeout(peer_addr: &SocketAddr, secs: u64) {
    write_warning(&format!(
        "[WARN] Connection from {peer_addr} timed out after {secs} seconds"
    ));
}

pub fn log_connection_rejected(peer_addr: &SocketAddr, active: usize, max: u64) {
    write_warning(&format!(
        "[WARN] Max connections reached: {active}/{max}. Connection from {peer_addr} rejected."
    ));
}

pub fn log_accept_error(err: &std::io::Error) {
    write_error(&format!("[ERROR] Failed to accept connection: {err}"));
}

pub fn log_listener_closed(addr: &SocketAddr) {
    write_info(&format!("Listener on {addr} closed"));
}

pub fn log_shutdown(signal: &str) {
    write_info(&format!("[SIGNAL] {signal} received, shutting down"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_warning(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: AccessLogFormat) {
    write_access(&entry.format(format));
}
