use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::scoring::policy::{
    ApprovalDisplay, DecisionPolicy, PolicyError, DEFAULT_REJECTION_THRESHOLD,
};

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
    pub model: ModelConfig,
    pub policy: DecisionPolicy,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "7860".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let scaler_path = env::var("RISK_SCALER_PATH")
            .unwrap_or_else(|_| "artifacts/scaler.json".to_string())
            .into();
        let classifier_path = env::var("RISK_MODEL_PATH")
            .unwrap_or_else(|_| "artifacts/credit_risk_model.json".to_string())
            .into();

        let threshold = match env::var("RISK_REJECTION_THRESHOLD") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidThreshold { source: None })?,
            Err(_) => DEFAULT_REJECTION_THRESHOLD,
        };
        let approval_display = match env::var("RISK_APPROVAL_DISPLAY") {
            Ok(raw) => raw
                .parse::<ApprovalDisplay>()
                .map_err(|source| ConfigError::InvalidApprovalDisplay { source })?,
            Err(_) => ApprovalDisplay::default(),
        };
        let policy = DecisionPolicy::new(threshold, approval_display).map_err(|source| {
            ConfigError::InvalidThreshold {
                source: Some(source),
            }
        })?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            model: ModelConfig {
                scaler_path,
                classifier_path,
            },
            policy,
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

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Locations of the exported scaler and classifier.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub scaler_path: PathBuf,
    pub classifier_path: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidThreshold { source: Option<PolicyError> },
    InvalidApprovalDisplay { source: PolicyError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidThreshold { .. } => write!(
                f,
                "RISK_REJECTION_THRESHOLD must be a probability between 0 and 1"
            ),
            ConfigError::InvalidApprovalDisplay { .. } => {
                write!(f, "RISK_APPROVAL_DISPLAY must be `complement` or `raw`")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidThreshold { source } => source
                .as_ref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            ConfigError::InvalidApprovalDisplay { source } => Some(source),
        }
    }
}
