// Configuration module entry point
// Loads configuration from defaults, an optional file and the PORT variable

mod state;
mod types;

use std::net::{IpAddr, SocketAddr};

use crate::error::ServerError;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LogLevel, LoggingConfig, PerformanceConfig, ServerConfig};

/// Config file looked up when none is given (`config.toml`, `config.json`, ...)
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Port used when neither `PORT` nor the config file sets one
pub const DEFAULT_PORT: u16 = 3000;

/// Environment variable overriding `server.port`
pub const PORT_ENV: &str = "PORT";

impl Config {
    /// Load configuration from the default config file and the environment
    pub fn load() -> Result<Self, ServerError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (without extension)
    /// The file is optional; `PORT` from the environment wins over it
    pub fn load_from(config_path: &str) -> Result<Self, ServerError> {
        let port = std::env::var(PORT_ENV).ok();
        Self::build(Some(config_path), port.as_deref())
    }

    /// Build configuration from an optional file and an optional raw `PORT` value.
    ///
    /// An empty or blank `PORT` counts as unset. Anything else must parse as a `u16`.
    pub fn build(config_path: Option<&str>, port: Option<&str>) -> Result<Self, ServerError> {
        let mut builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 0)?;

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        let port = match port.map(str::trim).filter(|p| !p.is_empty()) {
            Some(raw) => Some(parse_port(raw)?),
            None => None,
        };

        let settings = builder
            .set_override_option("server.port", port.map(i64::from))?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let ip: IpAddr =
            self.server
                .host
                .parse()
                .map_err(|e: std::net::AddrParseError| ServerError::InvalidAddress {
                    addr: format!("{}:{}", self.server.host, self.server.port),
                    reason: e.to_string(),
                })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}

fn parse_port(raw: &str) -> Result<u16, ServerError> {
    raw.parse::<u16>().map_err(|e| ServerError::InvalidPort {
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
