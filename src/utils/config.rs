//! Survey configuration with JSON persistence

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::algorithms::trilateration::EpicenterSolver;
use crate::core::{
    DEFAULT_PS_INTERVAL_S, DEFAULT_P_VELOCITY_KMS, DEFAULT_S_VELOCITY_KMS, KM_PER_DEGREE_LAT,
    KM_PER_DEGREE_LON,
};

/// Planar frame scale parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Kilometers per degree of longitude
    pub km_per_degree_lon: f64,
    /// Kilometers per degree of latitude
    pub km_per_degree_lat: f64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            km_per_degree_lon: KM_PER_DEGREE_LON,
            km_per_degree_lat: KM_PER_DEGREE_LAT,
        }
    }
}

/// Solver iteration parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub max_iterations: usize,
    pub convergence_tolerance: f64,
    pub initial_damping: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let solver = EpicenterSolver::default();
        Self {
            max_iterations: solver.max_iterations,
            convergence_tolerance: solver.convergence_tolerance,
            initial_damping: solver.initial_damping,
        }
    }
}

/// Complete survey configuration: wave velocities, projection scales, and
/// solver parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyConfig {
    /// P-wave velocity (km/s)
    pub p_velocity_kms: f64,
    /// S-wave velocity (km/s)
    pub s_velocity_kms: f64,
    /// PS interval assigned to newly added stations (seconds)
    pub default_interval_s: f64,
    pub frame: FrameConfig,
    pub solver: SolverConfig,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            p_velocity_kms: DEFAULT_P_VELOCITY_KMS,
            s_velocity_kms: DEFAULT_S_VELOCITY_KMS,
            default_interval_s: DEFAULT_PS_INTERVAL_S,
            frame: FrameConfig::default(),
            solver: SolverConfig::default(),
        }
    }
}

/// Outcome of configuration validation
#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ConfigError>,
    pub warnings: Vec<String>,
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    IoError {
        message: String,
    },
    SerializationError {
        message: String,
    },
}

impl SurveyConfig {
    /// Load a configuration from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("failed to read config file '{}': {}", path_str, e),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
            message: format!("failed to parse config file '{}': {}", path_str, e),
        })
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializationError {
                message: format!("failed to serialize config: {}", e),
            })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("failed to write config file '{}': {}", path_str, e),
        })
    }

    /// Check every parameter range before a session is built from this
    /// configuration.
    pub fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if self.p_velocity_kms <= 0.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "p_velocity_kms".to_string(),
                value: self.p_velocity_kms.to_string(),
                reason: "P-wave velocity must be positive".to_string(),
            });
        }
        if self.s_velocity_kms <= 0.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "s_velocity_kms".to_string(),
                value: self.s_velocity_kms.to_string(),
                reason: "S-wave velocity must be positive".to_string(),
            });
        }
        if self.p_velocity_kms <= self.s_velocity_kms {
            errors.push(ConfigError::InvalidParameter {
                parameter: "s_velocity_kms".to_string(),
                value: self.s_velocity_kms.to_string(),
                reason: "P-wave velocity must exceed S-wave velocity".to_string(),
            });
        }

        if self.frame.km_per_degree_lon <= 0.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "frame.km_per_degree_lon".to_string(),
                value: self.frame.km_per_degree_lon.to_string(),
                reason: "longitude scale must be positive".to_string(),
            });
        }
        if self.frame.km_per_degree_lat <= 0.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "frame.km_per_degree_lat".to_string(),
                value: self.frame.km_per_degree_lat.to_string(),
                reason: "latitude scale must be positive".to_string(),
            });
        }

        if self.solver.max_iterations == 0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "solver.max_iterations".to_string(),
                value: self.solver.max_iterations.to_string(),
                reason: "at least one iteration is required".to_string(),
            });
        }
        if self.solver.convergence_tolerance <= 0.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "solver.convergence_tolerance".to_string(),
                value: self.solver.convergence_tolerance.to_string(),
                reason: "tolerance must be positive".to_string(),
            });
        }
        if self.solver.initial_damping <= 0.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "solver.initial_damping".to_string(),
                value: self.solver.initial_damping.to_string(),
                reason: "damping must be positive".to_string(),
            });
        }

        if self.solver.convergence_tolerance > 1e-3 {
            warnings.push("loose convergence tolerance will stop iterations early".to_string());
        }
        if self.default_interval_s < 0.0 {
            warnings.push("negative seed interval produces negative seed ranges".to_string());
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidParameter {
                parameter,
                value,
                reason,
            } => write!(f, "invalid parameter '{}' = '{}': {}", parameter, value, reason),
            ConfigError::IoError { message } => write!(f, "I/O error: {}", message),
            ConfigError::SerializationError { message } => {
                write!(f, "serialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
