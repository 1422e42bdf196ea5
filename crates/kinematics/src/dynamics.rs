//! # Dynamics Model Interface
//!
//! A dynamics model is a kinematic simulation of a controllable body. It owns
//! its state exclusively and maps `(state, action, dt)` to the next state.
//! New vehicle types are added by implementing [`DynamicsModel`] and
//! registering a factory in [`crate::registry::ModelRegistry`].

use crate::error::KinematicsError;
use crate::space::BoxSpace;
use crate::types::{Action, BodyState, DebugInfo, HyperParameter, State};
use std::fmt;

pub trait DynamicsModel: fmt::Debug + Send + Sync {
    /// Registry tag of this model type.
    fn type_tag(&self) -> &'static str;

    /// Snapshot of the immutable hyper-parameters.
    fn hyper_parameter(&self) -> HyperParameter;

    /// Full state in vector form.
    fn state(&self) -> Vec<f64>;

    /// Replace the full state. Headings are renormalized.
    ///
    /// # Errors
    ///
    /// Fails on a dimension mismatch.
    fn set_state(&mut self, state: &[f64]) -> Result<(), KinematicsError>;

    /// Vector state to structured state.
    ///
    /// # Errors
    ///
    /// Fails on a dimension mismatch.
    fn serialize_state(&self, state: &[f64]) -> Result<State, KinematicsError>;

    /// Structured state to vector state.
    ///
    /// # Errors
    ///
    /// Fails if the record belongs to another model type.
    fn deserialize_state(&self, state: &State) -> Result<Vec<f64>, KinematicsError>;

    /// Vector action to structured action.
    ///
    /// # Errors
    ///
    /// Fails on a dimension mismatch.
    fn serialize_action(&self, action: &[f64]) -> Result<Action, KinematicsError>;

    /// Structured action to vector action.
    ///
    /// # Errors
    ///
    /// Fails if the record belongs to another model type.
    fn deserialize_action(&self, action: &Action) -> Result<Vec<f64>, KinematicsError>;

    /// Next state after applying `action` for `dt` seconds. Does not mutate
    /// the model.
    ///
    /// # Errors
    ///
    /// Fails on a dimension mismatch.
    fn compute_next_state(&self, action: &[f64], dt: f64) -> Result<Vec<f64>, KinematicsError>;

    /// Advance the owned state: equivalent to
    /// `state <- compute_next_state(action, dt)`. The debug buffer is cleared
    /// first and refilled by the step.
    ///
    /// # Errors
    ///
    /// Fails on a dimension mismatch; the state is left untouched.
    fn step(&mut self, action: &[f64], dt: f64) -> Result<(), KinematicsError>;

    fn state_space(&self) -> BoxSpace;

    fn action_space(&self) -> BoxSpace;

    fn body_state(&self) -> BodyState;

    /// Hyper-parameter features exposed to the policy.
    fn dynamics_model_observation(&self) -> Vec<f64>;

    fn dynamics_model_observation_space(&self) -> BoxSpace {
        BoxSpace::unbounded(self.dynamics_model_observation().len())
    }

    /// State features exposed to the policy.
    fn state_observation(&self) -> Vec<f64>;

    fn state_observation_space(&self) -> BoxSpace;

    /// Linearization at `(state, action)`: a row-major matrix of shape
    /// `(n_state, n_state + n_action)`.
    ///
    /// # Errors
    ///
    /// Models without a linearization return [`KinematicsError::Unimplemented`].
    fn jacobian(&self, _state: &[f64], _action: &[f64]) -> Result<Vec<Vec<f64>>, KinematicsError> {
        Err(KinematicsError::Unimplemented("jacobian"))
    }

    /// Diagnostics written by the latest `step`.
    fn debug_info(&self) -> &DebugInfo;

    fn clone_box(&self) -> Box<dyn DynamicsModel>;
}

impl Clone for Box<dyn DynamicsModel> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
