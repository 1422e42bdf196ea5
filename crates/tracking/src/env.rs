use crate::error::TrackingError;

/// Reinforcement learning environment trait.
///
/// The Gym-style interface a training harness drives. Each call to [`step`]
/// advances the simulation by one action and returns the new observation
/// vector, a reward signal, and whether the episode has terminated.
/// Observations, actions and rewards cross this boundary as `f32`.
///
/// [`step`]: Env::step
pub trait Env {
    /// Advance the environment by one action.
    ///
    /// Returns `(obs, reward, done)`.
    ///
    /// # Errors
    ///
    /// Fails when no episode is active or the action has the wrong size.
    fn step(&mut self, action: &[f32]) -> Result<(Vec<f32>, f32, bool), TrackingError>;

    /// Start a new episode and return its first observation.
    ///
    /// # Errors
    ///
    /// Fails when the episode cannot be set up.
    fn reset(&mut self) -> Result<Vec<f32>, TrackingError>;

    /// Size of the observation vector.
    fn obs_size(&self) -> usize;

    /// Size of the action vector.
    fn action_size(&self) -> usize;
}
