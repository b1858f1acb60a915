use crate::app_config::{AppConfig, Environment, GeocodeConfig};
use crate::ConfigError;

const DEFAULT_GEOCODE_BASE_URL: &str = "https://app.geocodeapi.io/api/v1";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a configured value is invalid.
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
/// Returns `ConfigError` if a configured value is invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Ok(raw)
        } else {
            Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected an http(s) URL, got '{raw}'"),
            })
        }
    };

    let env = parse_environment(&or_default("RENTQ_ENV", "development"))?;
    let log_level = or_default("RENTQ_LOG_LEVEL", "info");
    let api_base_url = parse_url("RENTQ_API_BASE_URL", "http://localhost:5000")?;
    let request_timeout_secs = parse_u64("RENTQ_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("RENTQ_USER_AGENT", "rentq/0.1 (offer-search)");
    let geocode_base_url = parse_url("GEOCODE_BASE_URL", DEFAULT_GEOCODE_BASE_URL)?;

    Ok(AppConfig {
        env,
        log_level,
        api_base_url,
        request_timeout_secs,
        user_agent,
        geocode: optional("GEOCODE_API_KEY").map(|api_key| GeocodeConfig {
            api_key,
            base_url: geocode_base_url,
        }),
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "RENTQ_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
