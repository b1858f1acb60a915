use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
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

/// Connection settings for the geocoding provider.
///
/// Passed explicitly to the geocode client at construction; the key is never
/// chosen implicitly from the build mode.
#[derive(Clone, PartialEq, Eq)]
pub struct GeocodeConfig {
    pub api_key: String,
    pub base_url: String,
}

impl std::fmt::Debug for GeocodeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodeConfig")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Origin of the marketplace API serving `/api/offers/*` and `/api/categories/*`.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// `None` when `GEOCODE_API_KEY` is unset; only location search needs it.
    pub geocode: Option<GeocodeConfig>,
}

impl AppConfig {
    /// Geocode settings, required by anything that resolves locations.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] naming `GEOCODE_API_KEY` when no
    /// key was configured.
    pub fn require_geocode(&self) -> Result<&GeocodeConfig, ConfigError> {
        self.geocode
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("GEOCODE_API_KEY".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("geocode", &self.geocode)
            .finish()
    }
}
