//! Observation composition.
//!
//! An observation is the reference-line window, then the model's state
//! features, then its hyper-parameter features. Bounds are composed in the
//! same order. Values cross the policy boundary as `f32`.

use crate::error::TrackingError;
use crate::reference_line::ReferenceLineManager;
use kinematics::{BoxSpace, DynamicsModel};

/// Concatenate the three observation parts.
#[must_use]
pub fn compose(window: &[f64], state_observation: &[f64], model_observation: &[f64]) -> Vec<f32> {
    window
        .iter()
        .chain(state_observation)
        .chain(model_observation)
        .map(|&v| v as f32)
        .collect()
}

/// Bounds matching [`compose`].
#[must_use]
pub fn compose_space(
    window: &BoxSpace,
    state_observation: &BoxSpace,
    model_observation: &BoxSpace,
) -> BoxSpace {
    BoxSpace::concat(&[window, state_observation, model_observation])
}

/// Observe `model` at `step_index` of the installed reference line.
///
/// # Errors
///
/// Fails when the look-ahead window runs past the reference line.
pub fn observe(
    reference_line: &ReferenceLineManager,
    step_index: usize,
    model: &dyn DynamicsModel,
) -> Result<Vec<f32>, TrackingError> {
    let window = reference_line.window(step_index, &model.body_state())?;
    Ok(compose(
        &window,
        &model.state_observation(),
        &model.dynamics_model_observation(),
    ))
}
