//! # Episode Trace
//!
//! Recorded history of tracking episodes. The trace is the interchange format
//! between simulation, training and replay: it carries everything needed to
//! rebuild an identical environment and re-run any recorded episode.

use crate::config::{EnvironmentConfig, TrackingConfig};
use crate::error::TrackingError;
use crate::reference_line::ReferenceLine;
use kinematics::{Action, DebugInfo, HyperParameter, State};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which configured variant drove an episode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DynamicsModelRecord {
    #[serde(rename = "type")]
    pub type_tag: String,
    pub name: String,
    pub index: usize,
    pub hyper_parameter: HyperParameter,
}

/// One run from reset to termination.
///
/// `states`, `actions`, `rewards` and `debug_infos` hold one entry per step
/// taken. `observations` holds the observation returned by reset plus one per
/// non-terminal step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub step_index: usize,
    pub tracking_length: usize,
    /// Environment hyper-parameters in force when the episode started.
    pub environment: EnvironmentConfig,
    pub dynamics_model: DynamicsModelRecord,
    /// The reference line as supplied or generated, before padding.
    pub reference_line: ReferenceLine,
    pub init_state: State,
    pub states: Vec<State>,
    pub actions: Vec<Action>,
    pub observations: Vec<Vec<f32>>,
    pub rewards: Vec<f64>,
    /// Diagnostics written by each step, captured after the step is applied.
    pub debug_infos: Vec<DebugInfo>,
}

impl Episode {
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.step_index >= self.tracking_length
    }

    #[must_use]
    pub fn total_reward(&self) -> f64 {
        self.rewards.iter().sum()
    }
}

/// Serializable snapshot of an environment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentTrace {
    pub config: TrackingConfig,
    pub current: Option<Episode>,
    /// Archived episodes, oldest first.
    pub archived: Vec<Episode>,
}

impl EnvironmentTrace {
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn to_json(&self) -> Result<String, TrackingError> {
        Ok(serde_json::to_string(self)?)
    }

    /// # Errors
    ///
    /// Fails on malformed documents.
    pub fn from_json(json: &str) -> Result<Self, TrackingError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the trace as JSON.
    ///
    /// # Errors
    ///
    /// Fails on serialization or i/o errors.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TrackingError> {
        let file = std::io::BufWriter::new(std::fs::File::create(path)?);
        serde_json::to_writer(file, self)?;
        Ok(())
    }

    /// Read a trace written by [`Self::save`].
    ///
    /// # Errors
    ///
    /// Fails on i/o errors or malformed documents.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TrackingError> {
        let file = std::io::BufReader::new(std::fs::File::open(path)?);
        Ok(serde_json::from_reader(file)?)
    }

    /// Every recorded episode, oldest first, the current one last.
    pub fn episodes(&self) -> impl Iterator<Item = &Episode> {
        self.archived.iter().chain(self.current.as_ref())
    }
}
