use crate::dataset::Year;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the tool.
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

/// Top-level configuration for the estimator.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub data: DataConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("ATAR_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let data_dir = env::var("ATAR_DATA_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let default_year = match env::var("ATAR_DEFAULT_YEAR") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<Year>()
                    .map_err(|_| ConfigError::InvalidYear { value: raw.clone() })?,
            ),
            _ => None,
        };

        let log_level = env::var("ATAR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            data: DataConfig {
                data_dir,
                default_year,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where cohort datasets come from and which cohort is used when none is named.
#[derive(Debug, Clone, Default)]
pub struct DataConfig {
    /// Directory of dataset files; the bundled datasets are used when unset.
    pub data_dir: Option<PathBuf>,
    pub default_year: Option<Year>,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidYear { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidYear { value } => {
                write!(f, "ATAR_DEFAULT_YEAR must be a calendar year, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
