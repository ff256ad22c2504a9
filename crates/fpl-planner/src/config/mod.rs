use crate::planner::domain::Position;
use crate::planner::lineup::LineupRules;
use crate::planner::scoring::ScoringConfig;
use crate::planner::squad::SquadRules;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// Distinguishes runtime behavior for different stages of the driver.
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
    pub engine: EngineConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let mut engine = match env::var("FPL_ENGINE_CONFIG") {
            Ok(path) if !path.trim().is_empty() => EngineConfig::from_path(path.trim())?,
            _ => EngineConfig::default(),
        };

        if let Ok(raw) = env::var("FPL_BUDGET") {
            engine.squad.budget = raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidBudget(raw.clone()))?;
        }

        if let Ok(raw) = env::var("FPL_GROUP_CAP") {
            engine.squad.group_cap = raw
                .trim()
                .parse::<u8>()
                .map_err(|_| ConfigError::InvalidGroupCap(raw.clone()))?;
        }

        engine.validate()?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            engine,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Every tunable the decision engine reads. Defaults describe the standard game: 1000 tenths,
/// three per club, a 2/5/5/3 squad and an eleven with at least 1/3/2/1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub squad: SquadRules,
    pub lineup: LineupRules,
    pub scoring: ScoringConfig,
}

impl EngineConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::EngineFile {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::EngineParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Rejects formations the lineup selector could never satisfy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lineup = &self.lineup;
        if lineup.size == 0 {
            return Err(ConfigError::InvalidLineup(
                "lineup size must be positive".to_string(),
            ));
        }
        if usize::from(lineup.size) > self.squad.size() {
            return Err(ConfigError::InvalidLineup(format!(
                "lineup of {} exceeds squad of {}",
                lineup.size,
                self.squad.size()
            )));
        }
        if lineup.minima.total() > usize::from(lineup.size) {
            return Err(ConfigError::InvalidLineup(format!(
                "lineup minima add up to {} but only {} start",
                lineup.minima.total(),
                lineup.size
            )));
        }

        for position in Position::ALL {
            let minimum = *lineup.minima.get(position);
            if let Some(maximum) = lineup.maxima.get(position) {
                if minimum > *maximum {
                    return Err(ConfigError::InvalidLineup(format!(
                        "{position} minimum {minimum} exceeds maximum {maximum}"
                    )));
                }
            }
            if minimum > *self.squad.shape.get(position) {
                return Err(ConfigError::InvalidLineup(format!(
                    "{position} minimum {minimum} exceeds squad allocation {}",
                    self.squad.shape.get(position)
                )));
            }
        }

        Ok(())
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidBudget(String),
    InvalidGroupCap(String),
    InvalidLineup(String),
    EngineFile {
        path: PathBuf,
        source: std::io::Error,
    },
    EngineParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBudget(raw) => {
                write!(f, "FPL_BUDGET must be a whole number of tenths, got '{raw}'")
            }
            ConfigError::InvalidGroupCap(raw) => {
                write!(f, "FPL_GROUP_CAP must be a valid u8, got '{raw}'")
            }
            ConfigError::InvalidLineup(reason) => {
                write!(f, "invalid lineup rules: {reason}")
            }
            ConfigError::EngineFile { path, .. } => {
                write!(f, "unable to read engine config {}", path.display())
            }
            ConfigError::EngineParse { path, .. } => {
                write!(f, "engine config {} is not valid JSON", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidBudget(_)
            | ConfigError::InvalidGroupCap(_)
            | ConfigError::InvalidLineup(_) => None,
            ConfigError::EngineFile { source, .. } => Some(source),
            ConfigError::EngineParse { source, .. } => Some(source),
        }
    }
}
