//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::Level;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger from configuration
///
/// Should be called once at application startup. Until then messages go
/// straight to stdout/stderr without level filtering.
pub fn init(config: &Config) -> std::io::Result<()> {
    let level = config.logging.level.parse::<Level>().unwrap_or_else(|e| {
        eprintln!("[WARN] {e}, falling back to info");
        Level::Info
    });

    writer::init(
        level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn write(level: Level, message: &str) {
    match writer::get() {
        Some(w) => w.write(level, message),
        None if level <= Level::Warn => eprintln!("{message}"),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    log_info("======================================");
    log_info("Twitter hello server started");
    log_info(&format!("Listening on: http://{addr}"));
    log_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        log_info(&format!("Worker threads: {workers}"));
    }
    log_info(&format!("Twitter API: {}", config.twitter.api_base_url));
    log_info(&format!("Serving user: {}", config.twitter.user_id));
    if let Some(ref dir) = config.templates.dir {
        log_info(&format!("Template overrides: {dir}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        log_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        log_info(&format!("Error log: {path}"));
    }
    log_info("======================================");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log_error(&format!("Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write(Level::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write(Level::Warn, &format!("[WARN] {message}"));
}

pub fn log_info(message: &str) {
    write(Level::Info, message);
}

pub fn log_debug(message: &str) {
    write(Level::Debug, &format!("[DEBUG] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}

pub fn log_shutdown_requested(active: usize) {
    log_info(&format!(
        "[Shutdown] Stopped accepting connections, {active} still active"
    ));
}

pub fn log_shutdown_complete(remaining: usize) {
    if remaining == 0 {
        log_info("[Shutdown] All connections closed");
    } else {
        log_warning(&format!(
            "[Shutdown] Grace period elapsed with {remaining} connection(s) still open"
        ));
    }
}
