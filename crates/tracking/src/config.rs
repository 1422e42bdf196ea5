//! Environment configuration.
//!
//! Configuration is parsed into typed records first and validated before any
//! environment is built from it.

use crate::error::TrackingError;
use crate::reference_line::PadMode;
use kinematics::{BoxSpace, ModelSpec};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_max_archived_episodes() -> usize {
    1000
}

/// Episode-level hyper-parameters of the trajectory-tracking environment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Seconds advanced by each step.
    pub step_interval: f64,
    pub tracking_length_lb: usize,
    pub tracking_length_ub: usize,
    #[serde(default)]
    pub reference_line_pad_mode: PadMode,
    pub init_state_lb: Vec<f64>,
    pub init_state_ub: Vec<f64>,
    pub n_observation_steps: usize,
    #[serde(default = "default_max_archived_episodes", alias = "max_n_episodes")]
    pub max_archived_episodes: usize,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            step_interval: 0.1,
            tracking_length_lb: 60,
            tracking_length_ub: 60,
            reference_line_pad_mode: PadMode::Repeat,
            init_state_lb: vec![0.0, 0.0, -std::f64::consts::PI, 0.0],
            init_state_ub: vec![0.0, 0.0, std::f64::consts::PI, 10.0],
            n_observation_steps: 15,
            max_archived_episodes: default_max_archived_episodes(),
        }
    }
}

impl EnvironmentConfig {
    /// Check the record for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Configuration`] describing the first problem.
    pub fn validate(&self) -> Result<(), TrackingError> {
        if !(self.step_interval.is_finite() && self.step_interval > 0.0) {
            return Err(TrackingError::Configuration(format!(
                "step_interval must be positive, got {}",
                self.step_interval
            )));
        }
        if self.tracking_length_lb < 1 || self.tracking_length_lb > self.tracking_length_ub {
            return Err(TrackingError::Configuration(format!(
                "tracking length bounds must satisfy 1 <= lb <= ub, got [{}, {}]",
                self.tracking_length_lb, self.tracking_length_ub
            )));
        }
        self.init_state_space()?;
        Ok(())
    }

    /// Box from which initial states are drawn when none is supplied.
    ///
    /// # Errors
    ///
    /// Fails on mismatched lengths, non-finite bounds or `lb > ub`.
    pub fn init_state_space(&self) -> Result<BoxSpace, TrackingError> {
        if self
            .init_state_lb
            .iter()
            .chain(&self.init_state_ub)
            .any(|b| !b.is_finite())
        {
            return Err(TrackingError::Configuration(
                "initial state bounds must be finite".into(),
            ));
        }
        BoxSpace::new(self.init_state_lb.clone(), self.init_state_ub.clone())
            .map_err(|e| TrackingError::Configuration(format!("initial state bounds: {e}")))
    }
}

/// Everything needed to build a trajectory-tracking environment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackingConfig {
    pub environment: EnvironmentConfig,
    pub dynamics_models: Vec<ModelSpec>,
}

impl TrackingConfig {
    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Malformed documents, unknown pad modes and invalid values are all
    /// reported as [`TrackingError::Configuration`].
    pub fn from_json(json: &str) -> Result<Self, TrackingError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TrackingError::Configuration(e.to_string()))?;
        config.environment.validate()?;
        if config.dynamics_models.is_empty() {
            return Err(TrackingError::Configuration(
                "at least one dynamics model must be configured".into(),
            ));
        }
        Ok(config)
    }

    /// Read and parse a JSON file.
    ///
    /// # Errors
    ///
    /// See [`Self::from_json`]; unreadable files yield [`TrackingError::Io`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TrackingError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
