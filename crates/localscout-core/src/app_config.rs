use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    /// Log filter used when neither `RUST_LOG` nor `LOCALSCOUT_LOG_LEVEL` is set.
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Environment::Development => "debug",
            Environment::Test | Environment::Production => "info",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub places_api_key: Option<String>,
    pub places_base_url: String,
    pub places_timeout_secs: u64,
    pub query_delay_ms: u64,
    pub cors_origins: Vec<String>,
    pub taxonomy_path: Option<PathBuf>,
}

impl AppConfig {
    #[must_use]
    pub fn has_places_api_key(&self) -> bool {
        self.places_api_key.is_some()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "places_api_key",
                &self.places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("places_base_url", &self.places_base_url)
            .field("places_timeout_secs", &self.places_timeout_secs)
            .field("query_delay_ms", &self.query_delay_ms)
            .field("cors_origins", &self.cors_origins)
            .field("taxonomy_path", &self.taxonomy_path)
            .finish()
    }
}
