use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost,http://localhost:80";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The places credential is deliberately optional here: a missing key is
/// reported per request as a configuration error rather than failing startup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let non_empty = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u16 = |var: &str, default: &str| -> Result<u16, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u16>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env_name = non_empty("LOCALSCOUT_ENV")
        .or_else(|| non_empty("NODE_ENV"))
        .unwrap_or_else(|| "development".to_string());
    let env = parse_environment(&env_name);

    let port = parse_u16("PORT", "3000")?;
    let bind_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let log_level = non_empty("LOCALSCOUT_LOG_LEVEL")
        .unwrap_or_else(|| env.default_log_level().to_string());

    let places_api_key = non_empty("GOOGLE_PLACES_API_KEY");
    let places_base_url = or_default("LOCALSCOUT_PLACES_BASE_URL", DEFAULT_PLACES_BASE_URL);
    let places_timeout_secs = parse_u64("LOCALSCOUT_PLACES_TIMEOUT_SECS", "30")?;
    let query_delay_ms = parse_u64("LOCALSCOUT_QUERY_DELAY_MS", "200")?;

    let cors_origins = parse_origins(&or_default("LOCALSCOUT_CORS_ORIGINS", DEFAULT_CORS_ORIGINS));
    if cors_origins.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "LOCALSCOUT_CORS_ORIGINS".to_string(),
            reason: "at least one origin is required".to_string(),
        });
    }

    let taxonomy_path = non_empty("LOCALSCOUT_TAXONOMY_PATH").map(PathBuf::from);

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        places_api_key,
        places_base_url,
        places_timeout_secs,
        query_delay_ms,
        cors_origins,
        taxonomy_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_owned())
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
