//! Tracking facade for deployment: one environment plus one policy.

use crate::config::TrackingConfig;
use crate::error::TrackingError;
use crate::policy::{roll_out_one_episode, Policy};
use crate::reference_line::ReferenceLine;
use crate::trajectory_tracking::{ResetOptions, TrajectoryTrackingEnv};
use kinematics::ModelRegistry;

pub struct TrajectoryTracker<P> {
    env: TrajectoryTrackingEnv,
    policy: P,
}

impl<P: Policy> TrajectoryTracker<P> {
    /// # Errors
    ///
    /// Fails if the environment cannot be built from `config`.
    pub fn new(
        config: TrackingConfig,
        registry: &ModelRegistry,
        policy: P,
        seed: u64,
    ) -> Result<Self, TrackingError> {
        let env = TrajectoryTrackingEnv::new(config, registry, fastrand::Rng::with_seed(seed))?;
        Ok(Self { env, policy })
    }

    /// Track a reference line given as `[x, y]` points and return the visited
    /// `(x, y, r, v)` states and applied actions, one of each per step.
    ///
    /// Missing inputs are filled the way reset fills them: the initial state
    /// is estimated from the line, the model is sampled, the line generated.
    ///
    /// # Errors
    ///
    /// Propagates reset and step failures.
    pub fn track_reference_line(
        &mut self,
        init_state: Option<[f64; 4]>,
        model_name: Option<&str>,
        reference_line: Option<&[[f64; 2]]>,
    ) -> Result<(Vec<Vec<f64>>, Vec<Vec<f64>>), TrackingError> {
        let options = ResetOptions {
            init_state: init_state.map(|s| s.to_vec()),
            model_name: model_name.map(str::to_string),
            reference_line: reference_line.map(ReferenceLine::from_points),
            tracking_length: None,
        };
        let rollout = roll_out_one_episode(&mut self.env, &mut self.policy, options)?;
        Ok((rollout.states, rollout.actions))
    }

    #[must_use]
    pub fn step_interval(&self) -> f64 {
        self.env.step_interval()
    }

    #[must_use]
    pub fn dynamics_model_info(&self) -> String {
        self.env.dynamics_model_info()
    }

    /// The line tracked by the latest call.
    #[must_use]
    pub fn reference_line(&self) -> Vec<[f64; 2]> {
        self.env.reference_line().to_points()
    }

    #[must_use]
    pub fn env(&self) -> &TrajectoryTrackingEnv {
        &self.env
    }
}
