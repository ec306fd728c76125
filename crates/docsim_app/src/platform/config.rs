use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use docsim_core::ValidationPolicy;
use docsim_engine::SimulationSettings;
use docsim_logging::sim_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILENAME: &str = "docsim.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub validation: ValidationSection,
    pub simulation: SimulationSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSection {
    pub allowed_media_types: Vec<String>,
    pub max_bytes: u64,
}

impl Default for ValidationSection {
    fn default() -> Self {
        let policy = ValidationPolicy::default();
        Self {
            allowed_media_types: policy.allowed_media_types,
            max_bytes: policy.max_bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSection {
    pub tick_interval_ms: u64,
    pub increment_min: u8,
    pub increment_max: u8,
    pub analysis_duration_ms: u64,
    pub fail_marker: Option<String>,
    pub analysis_fault: Option<String>,
}

impl Default for SimulationSection {
    fn default() -> Self {
        let settings = SimulationSettings::default();
        Self {
            tick_interval_ms: settings.tick_interval.as_millis() as u64,
            increment_min: settings.increment_min,
            increment_max: settings.increment_max,
            analysis_duration_ms: settings.analysis_duration.as_millis() as u64,
            fail_marker: settings.fail_marker,
            analysis_fault: settings.analysis_fault,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if sim.increment_min == 0 {
            return Err(ConfigError::Invalid(
                "simulation.increment_min must be at least 1".to_string(),
            ));
        }
        if sim.increment_min > sim.increment_max {
            return Err(ConfigError::Invalid(format!(
                "simulation.increment_min ({}) exceeds increment_max ({})",
                sim.increment_min, sim.increment_max
            )));
        }
        if sim.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "simulation.tick_interval_ms must be positive".to_string(),
            ));
        }
        if self.validation.allowed_media_types.is_empty() {
            return Err(ConfigError::Invalid(
                "validation.allowed_media_types must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            allowed_media_types: self.validation.allowed_media_types.clone(),
            max_bytes: self.validation.max_bytes,
        }
    }

    pub fn settings(&self) -> SimulationSettings {
        let sim = &self.simulation;
        SimulationSettings {
            tick_interval: Duration::from_millis(sim.tick_interval_ms),
            increment_min: sim.increment_min,
            increment_max: sim.increment_max,
            analysis_duration: Duration::from_millis(sim.analysis_duration_ms),
            fail_marker: sim.fail_marker.clone(),
            analysis_fault: sim.analysis_fault.clone(),
        }
    }
}

/// Loads the config from `explicit`, or from `./docsim.ron` if present.
///
/// An explicit path must exist; the default path may be absent.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILENAME), false),
    };

    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
            return Ok(AppConfig::default());
        }
        Err(source) => return Err(ConfigError::Io { path, source }),
    };

    let config: AppConfig = ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.clone(),
        message: err.to_string(),
    })?;
    config.validate()?;
    sim_info!("Loaded config from {:?}", path);
    Ok(config)
}
