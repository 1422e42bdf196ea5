//! Random-walk reference line generation.

use crate::error::TrackingError;
use crate::reference_line::{ReferenceLine, Waypoint};
use kinematics::{Action, DynamicsModel, State};
use serde::{Deserialize, Serialize};

/// State and the action applied from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryWaypoint {
    pub state: State,
    pub action: Action,
}

pub type Trajectory = Vec<TrajectoryWaypoint>;

/// Drive `model` with uniformly sampled actions for `walk_length - 1` steps.
///
/// Each waypoint is the position before the step; the final position is
/// appended last and paired with a zero action. The model is advanced in
/// place, so pass a clone when the live model must stay untouched.
///
/// # Errors
///
/// Fails for `walk_length < 1` or an action space that cannot be sampled.
pub fn random_walk(
    model: &mut dyn DynamicsModel,
    step_interval: f64,
    walk_length: usize,
    rng: &mut fastrand::Rng,
) -> Result<(ReferenceLine, Trajectory), TrackingError> {
    if walk_length < 1 {
        return Err(TrackingError::Configuration(
            "random walk length must be at least 1".into(),
        ));
    }
    let action_space = model.action_space();
    if !action_space.is_bounded() {
        return Err(TrackingError::Configuration(
            "random walk needs a bounded action space".into(),
        ));
    }

    let mut line = ReferenceLine::default();
    let mut trajectory = Vec::with_capacity(walk_length);
    let mut record = |model: &dyn DynamicsModel, action: &[f64]| -> Result<(), TrackingError> {
        let state = model.state();
        line.push(Waypoint::new(state[0], state[1]));
        trajectory.push(TrajectoryWaypoint {
            state: model.serialize_state(&state)?,
            action: model.serialize_action(action)?,
        });
        Ok(())
    };

    for _ in 1..walk_length {
        let action = action_space.sample(rng);
        record(&*model, &action)?;
        model.step(&action, step_interval)?;
    }
    record(&*model, &vec![0.0; action_space.len()])?;

    Ok((line, trajectory))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinematics::{BicycleModel, BicycleModelConfig};

    #[test]
    fn test_walk_shape() {
        let mut model = BicycleModel::new(&BicycleModelConfig::default()).unwrap();
        model.set_state(&[1.0, 2.0, 0.3, 4.0]).unwrap();
        let mut rng = fastrand::Rng::with_seed(3);
        let (line, trajectory) = random_walk(&mut model, 0.1, 12, &mut rng).unwrap();
        assert_eq!(line.len(), 12);
        assert_eq!(trajectory.len(), 12);
        assert_eq!(line.waypoints[0], Waypoint::new(1.0, 2.0));
        let last = model.state();
        assert_eq!(line.waypoints[11], Waypoint::new(last[0], last[1]));
        assert_eq!(
            model.deserialize_action(&trajectory[11].action).unwrap(),
            vec![0.0, 0.0]
        );
    }

    #[test]
    fn test_single_waypoint_walk() {
        let mut model = BicycleModel::new(&BicycleModelConfig::default()).unwrap();
        let mut rng = fastrand::Rng::with_seed(3);
        let (line, _) = random_walk(&mut model, 0.1, 1, &mut rng).unwrap();
        assert_eq!(line.len(), 1);
        assert!(random_walk(&mut model, 0.1, 0, &mut rng).is_err());
    }
}
