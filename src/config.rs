use serde::Deserialize;
use std::net::SocketAddr;

use crate::store::ContactStore;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub performance: PerformanceConfig,
    pub static_files: StaticConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub workers: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub allowed_origin: String,
    pub max_body_size: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    #[serde(default)]
    pub max_connections: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StaticConfig {
    pub public_root: String,
    pub index_file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub contacts_file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
}

impl Config {
    /// Load configuration from an optional `config.toml` plus `PORTFOLIO_*`
    /// environment overrides (double underscore separates nested keys,
    /// e.g. `PORTFOLIO_SERVER__PORT=8080`).
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("PORTFOLIO").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("http.allowed_origin", "*")?
            .set_default("http.max_body_size", 102_400)? // 100 KB
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("static_files.public_root", "public")?
            .set_default("static_files.index_file", "index.html")?
            .set_default("storage.contacts_file", "data/contacts.json")?
            .set_default("logging.access_log", true)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Shared application state: immutable configuration plus the contact store.
pub struct AppState {
    pub config: Config,
    pub store: ContactStore,
}

impl AppState {
    pub fn new(config: Config, store: ContactStore) -> Self {
        Self { config, store }
    }
}
