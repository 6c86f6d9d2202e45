use crate::correspondents::{DEFAULT_MIN_CONFIDENCE, DEFAULT_STORAGE_CATEGORY};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub normalization: NormalizationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            normalization: NormalizationConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the alias and legal-suffix tables come from and how storage paths
/// and AI candidates are treated.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationConfig {
    pub rules_path: Option<PathBuf>,
    pub default_category: String,
    pub min_confidence: f64,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            rules_path: None,
            default_category: DEFAULT_STORAGE_CATEGORY.to_string(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

impl NormalizationConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let rules_path = env::var("PAPERFLOW_RULES_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let default_category = env::var("PAPERFLOW_DEFAULT_CATEGORY")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_STORAGE_CATEGORY.to_string());

        let min_confidence = match env::var("PAPERFLOW_MIN_CONFIDENCE") {
            Ok(raw) => {
                let parsed = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| ConfigError::InvalidConfidence { value: raw.clone() })?;
                if !(0.0..=1.0).contains(&parsed) {
                    return Err(ConfigError::InvalidConfidence { value: raw });
                }
                parsed
            }
            Err(_) => DEFAULT_MIN_CONFIDENCE,
        };

        Ok(Self {
            rules_path,
            default_category,
            min_confidence,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidConfidence { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidConfidence { value } => write!(
                f,
                "PAPERFLOW_MIN_CONFIDENCE must be a number between 0 and 1 (got '{}')",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidConfidence { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("PAPERFLOW_RULES_PATH");
        env::remove_var("PAPERFLOW_DEFAULT_CATEGORY");
        env::remove_var("PAPERFLOW_MIN_CONFIDENCE");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.normalization, NormalizationConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn reads_normalization_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("PAPERFLOW_RULES_PATH", "/etc/paperflow/rules.json");
        env::set_var("PAPERFLOW_DEFAULT_CATEGORY", " inbox ");
        env::set_var("PAPERFLOW_MIN_CONFIDENCE", "0.75");

        let config = NormalizationConfig::from_env().expect("overrides load");
        assert_eq!(
            config.rules_path,
            Some(PathBuf::from("/etc/paperflow/rules.json"))
        );
        assert_eq!(config.default_category, "inbox");
        assert!((config.min_confidence - 0.75).abs() < f64::EPSILON);
        reset_env();
    }

    #[test]
    fn rejects_out_of_range_confidence() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        for value in ["1.5", "-0.1", "often"] {
            env::set_var("PAPERFLOW_MIN_CONFIDENCE", value);
            let error = NormalizationConfig::from_env().expect_err("invalid confidence");
            assert!(matches!(error, ConfigError::InvalidConfidence { .. }), "{value}");
        }
        reset_env();
    }
}
