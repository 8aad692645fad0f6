use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

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
    pub classifier: ClassifierConfig,
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
        let max_upload_bytes = env::var("FOOD_SHARE_MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidUploadLimit)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let mode = match env::var("FOOD_SHARE_CLASSIFIER") {
            Ok(raw) => ClassifierMode::parse(&raw)
                .ok_or(ConfigError::InvalidClassifier { value: raw })?,
            Err(_) => ClassifierMode::Heuristic,
        };
        let service_url =
            env::var("FOOD_SHARE_ML_URL").unwrap_or_else(|_| DEFAULT_ML_URL.to_string());
        let timeout_secs = env::var("FOOD_SHARE_ML_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout)?;

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                max_upload_bytes,
            },
            telemetry: TelemetryConfig { log_level },
            classifier: ClassifierConfig {
                mode,
                service_url,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

const DEFAULT_ML_URL: &str = "http://localhost:5000";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Which image classifier backs quality assessments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierMode {
    Heuristic,
    Remote,
}

impl ClassifierMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "heuristic" | "local" => Some(Self::Heuristic),
            "remote" | "ml" => Some(Self::Remote),
            _ => None,
        }
    }
}

/// Remote model endpoint and the strategy used to reach it.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub mode: ClassifierMode,
    pub service_url: String,
    pub timeout: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            mode: ClassifierMode::Heuristic,
            service_url: DEFAULT_ML_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidClassifier { value: String },
    InvalidTimeout,
    InvalidUploadLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidClassifier { value } => write!(
                f,
                "FOOD_SHARE_CLASSIFIER must be 'heuristic' or 'remote' (got '{value}')"
            ),
            ConfigError::InvalidTimeout => {
                write!(f, "FOOD_SHARE_ML_TIMEOUT_SECS must be a whole number of seconds")
            }
            ConfigError::InvalidUploadLimit => {
                write!(f, "FOOD_SHARE_MAX_UPLOAD_BYTES must be a byte count")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidClassifier { .. }
            | ConfigError::InvalidTimeout
            | ConfigError::InvalidUploadLimit => None,
        }
    }
}
