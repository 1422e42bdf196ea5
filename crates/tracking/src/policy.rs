//! Policies and episode rollouts.

use crate::error::TrackingError;
use crate::trajectory_tracking::{ResetOptions, TrajectoryTrackingEnv};
use kinematics::BoxSpace;

/// Maps an observation to an action.
pub trait Policy {
    fn act(&mut self, observation: &[f32]) -> Vec<f64>;
}

impl<F> Policy for F
where
    F: FnMut(&[f32]) -> Vec<f64>,
{
    fn act(&mut self, observation: &[f32]) -> Vec<f64> {
        self(observation)
    }
}

/// Uniformly samples actions from a bounded space.
pub struct RandomPolicy {
    action_space: BoxSpace,
    rng: fastrand::Rng,
}

impl RandomPolicy {
    /// # Errors
    ///
    /// Fails if the space has an infinite bound.
    pub fn new(action_space: BoxSpace, seed: u64) -> Result<Self, TrackingError> {
        if !action_space.is_bounded() {
            return Err(TrackingError::Configuration(
                "random policy needs a bounded action space".into(),
            ));
        }
        Ok(Self {
            action_space,
            rng: fastrand::Rng::with_seed(seed),
        })
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _observation: &[f32]) -> Vec<f64> {
        self.action_space.sample(&mut self.rng)
    }
}

/// What a single rollout visited.
///
/// The three sequences have one entry per step: the state and observation
/// the action was chosen from, and the action itself.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rollout {
    pub states: Vec<Vec<f64>>,
    pub actions: Vec<Vec<f64>>,
    pub observations: Vec<Vec<f32>>,
}

/// Reset `env` with `options` and drive it with `policy` until termination.
///
/// # Errors
///
/// Propagates reset and step failures.
pub fn roll_out_one_episode(
    env: &mut TrajectoryTrackingEnv,
    policy: &mut impl Policy,
    options: ResetOptions,
) -> Result<Rollout, TrackingError> {
    let mut rollout = Rollout::default();
    let mut observation = env.reset(options)?;
    loop {
        let action = policy.act(&observation);
        rollout.states.push(env.state());
        rollout.observations.push(observation);
        rollout.actions.push(action.clone());

        let transition = env.step(&action)?;
        if transition.terminated {
            break;
        }
        observation = transition.observation;
    }
    Ok(rollout)
}
