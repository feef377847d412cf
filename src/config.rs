// Runtime configuration shared by the CLI and the server

use std::path::PathBuf;

pub const DEFAULT_DB_FILE: &str = "credly_data.db";
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// `LOG_FORMAT=json` selects JSON lines; anything else is human-readable.
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT") {
            Ok(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub server_addr: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Read `CREDLY_DB`, `CREDLY_ADDR` and `LOG_FORMAT`, after loading `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Config {
            db_path: std::env::var("CREDLY_DB")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_FILE)),
            server_addr: std::env::var("CREDLY_ADDR")
                .unwrap_or_else(|_| DEFAULT_SERVER_ADDR.to_string()),
            log_format: LogFormat::from_env(),
        }
    }
}

/// Structured logging to stderr; level from `RUST_LOG`, default `info`.
pub fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
    }
}
