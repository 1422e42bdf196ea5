//! Bicycle kinematics model for vehicle trajectory tracking
//!
//! State is `(x, y, r, v)`: position of the centre of gravity, heading and
//! scalar speed. Action is `(a, s)`: longitudinal acceleration and steering
//! angle. The slip angle at the centre of gravity follows from the steering
//! angle and the axle geometry; the state is advanced by explicit Euler.

use crate::dynamics::DynamicsModel;
use crate::error::{check_len, KinematicsError};
use crate::geometry::normalize_angle;
use crate::integrator::euler_step;
use crate::space::BoxSpace;
use crate::types::{
    Action, BicycleAction, BicycleHyperParameter, BicycleState, BodyState, DebugInfo,
    HyperParameter, State,
};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Registry tag of the bicycle model.
pub const BICYCLE_MODEL_TAG: &str = "BicycleModel";

/// Configuration for a bicycle model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BicycleModelConfig {
    /// Distance from the front axle to the front bumper (m)
    pub front_overhang: f64,
    /// Distance between the axles (m)
    pub wheelbase: f64,
    /// Distance from the rear axle to the rear bumper (m)
    pub rear_overhang: f64,
    /// Vehicle width (m)
    pub width: f64,
    /// Lower bound of `(a, s)`
    #[serde(alias = "action_space_lb")]
    pub action_lb: [f64; 2],
    /// Upper bound of `(a, s)`
    #[serde(alias = "action_space_ub")]
    pub action_ub: [f64; 2],
}

impl Default for BicycleModelConfig {
    fn default() -> Self {
        Self {
            front_overhang: 0.9,
            wheelbase: 2.7,
            rear_overhang: 0.9,
            width: 1.8,
            action_lb: [-3.0, -PI / 6.0],
            action_ub: [3.0, PI / 6.0],
        }
    }
}

impl BicycleModelConfig {
    /// Check the geometry and derive the full hyper-parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::Configuration`] for non-finite or
    /// non-physical values and for empty action bounds.
    pub fn validate(&self) -> Result<BicycleHyperParameter, KinematicsError> {
        let scalars = [
            ("front_overhang", self.front_overhang),
            ("wheelbase", self.wheelbase),
            ("rear_overhang", self.rear_overhang),
            ("width", self.width),
        ];
        for (name, value) in scalars {
            if !value.is_finite() || value < 0.0 {
                return Err(KinematicsError::Configuration(format!(
                    "`{name}` must be finite and non-negative, got {value}"
                )));
            }
        }
        if self.wheelbase <= 0.0 || self.width <= 0.0 {
            return Err(KinematicsError::Configuration(
                "`wheelbase` and `width` must be positive".into(),
            ));
        }
        for i in 0..BicycleAction::DIM {
            let (lb, ub) = (self.action_lb[i], self.action_ub[i]);
            if !lb.is_finite() || !ub.is_finite() || lb >= ub {
                return Err(KinematicsError::Configuration(format!(
                    "action bound {i} must be finite with lb < ub, got [{lb}, {ub}]"
                )));
            }
        }

        let length = self.front_overhang + self.wheelbase + self.rear_overhang;
        let frontwheel_to_cog = self.wheelbase + self.rear_overhang - length / 2.0;
        let rearwheel_to_cog = self.wheelbase + self.front_overhang - length / 2.0;
        if rearwheel_to_cog <= 0.0 {
            return Err(KinematicsError::Configuration(format!(
                "centre of gravity must lie ahead of the rear axle, got rearwheel_to_cog={rearwheel_to_cog}"
            )));
        }

        Ok(BicycleHyperParameter {
            front_overhang: self.front_overhang,
            wheelbase: self.wheelbase,
            rear_overhang: self.rear_overhang,
            width: self.width,
            length,
            frontwheel_to_cog,
            rearwheel_to_cog,
            action_lb: self.action_lb,
            action_ub: self.action_ub,
        })
    }
}

#[derive(Clone, Debug)]
pub struct BicycleModel {
    hyper_parameter: BicycleHyperParameter,
    state: BicycleState,
    debug_info: DebugInfo,
}

/// Continuous-time derivative together with the intermediate angles.
struct Derivative {
    rate: BicycleState,
    beta: f64,
    omega: f64,
}

impl BicycleModel {
    /// Create a model at rest at the origin.
    ///
    /// # Errors
    ///
    /// Fails if the configuration does not validate.
    pub fn new(config: &BicycleModelConfig) -> Result<Self, KinematicsError> {
        Ok(Self {
            hyper_parameter: config.validate()?,
            state: BicycleState::default(),
            debug_info: DebugInfo::new(),
        })
    }

    #[must_use]
    pub fn hyper_parameters(&self) -> &BicycleHyperParameter {
        &self.hyper_parameter
    }

    #[must_use]
    pub fn bicycle_state(&self) -> BicycleState {
        self.state
    }

    /// Relative position of the centre of gravity between the axles, in `(0, 1]`.
    #[must_use]
    pub fn cog_relative_position(&self) -> f64 {
        let hp = &self.hyper_parameter;
        hp.rearwheel_to_cog / (hp.rearwheel_to_cog + hp.frontwheel_to_cog)
    }

    fn derivative(&self, state: &BicycleState, action: &BicycleAction) -> Derivative {
        let beta = self.cog_relative_position();
        let omega = normalize_angle((beta * action.s.tan()).atan());
        let rate = BicycleState {
            x: state.v * (state.r + omega).cos(),
            y: state.v * (state.r + omega).sin(),
            r: state.v / self.hyper_parameter.rearwheel_to_cog * omega.sin(),
            v: action.a,
        };
        Derivative { rate, beta, omega }
    }

    fn advance(&self, action: &[f64], dt: f64) -> Result<(BicycleState, Derivative), KinematicsError> {
        check_len("bicycle action", action, BicycleAction::DIM)?;
        let action = BicycleAction::from_array([action[0], action[1]]);
        let derivative = self.derivative(&self.state, &action);
        let mut next = BicycleState::from_array(euler_step(
            self.state.to_array(),
            derivative.rate.to_array(),
            dt,
        ));
        next.r = normalize_angle(next.r);
        Ok((next, derivative))
    }
}

fn state_from_slice(state: &[f64]) -> Result<BicycleState, KinematicsError> {
    check_len("bicycle state", state, BicycleState::DIM)?;
    Ok(BicycleState {
        x: state[0],
        y: state[1],
        r: normalize_angle(state[2]),
        v: state[3],
    })
}

impl DynamicsModel for BicycleModel {
    fn type_tag(&self) -> &'static str {
        BICYCLE_MODEL_TAG
    }

    fn hyper_parameter(&self) -> HyperParameter {
        HyperParameter::Bicycle(self.hyper_parameter)
    }

    fn state(&self) -> Vec<f64> {
        self.state.to_array().to_vec()
    }

    fn set_state(&mut self, state: &[f64]) -> Result<(), KinematicsError> {
        self.state = state_from_slice(state)?;
        Ok(())
    }

    fn serialize_state(&self, state: &[f64]) -> Result<State, KinematicsError> {
        Ok(State::Bicycle(state_from_slice(state)?))
    }

    fn deserialize_state(&self, state: &State) -> Result<Vec<f64>, KinematicsError> {
        match state {
            State::Bicycle(s) => Ok(s.to_array().to_vec()),
        }
    }

    fn serialize_action(&self, action: &[f64]) -> Result<Action, KinematicsError> {
        check_len("bicycle action", action, BicycleAction::DIM)?;
        Ok(Action::Bicycle(BicycleAction::from_array([action[0], action[1]])))
    }

    fn deserialize_action(&self, action: &Action) -> Result<Vec<f64>, KinematicsError> {
        match action {
            Action::Bicycle(a) => Ok(a.to_array().to_vec()),
        }
    }

    fn compute_next_state(&self, action: &[f64], dt: f64) -> Result<Vec<f64>, KinematicsError> {
        let (next, _) = self.advance(action, dt)?;
        Ok(next.to_array().to_vec())
    }

    fn step(&mut self, action: &[f64], dt: f64) -> Result<(), KinematicsError> {
        self.debug_info.clear();
        let (next, derivative) = self.advance(action, dt)?;
        self.debug_info.insert("beta".into(), derivative.beta);
        self.debug_info.insert("omega".into(), derivative.omega);
        self.state = next;
        Ok(())
    }

    fn state_space(&self) -> BoxSpace {
        BoxSpace::from_parts(
            vec![f64::NEG_INFINITY, f64::NEG_INFINITY, -PI, 0.0],
            vec![f64::INFINITY, f64::INFINITY, PI, f64::INFINITY],
        )
    }

    fn action_space(&self) -> BoxSpace {
        let hp = &self.hyper_parameter;
        BoxSpace::from_parts(hp.action_lb.to_vec(), hp.action_ub.to_vec())
    }

    fn body_state(&self) -> BodyState {
        self.state.body_state()
    }

    fn dynamics_model_observation(&self) -> Vec<f64> {
        let hp = &self.hyper_parameter;
        vec![
            hp.front_overhang,
            hp.wheelbase,
            hp.rear_overhang,
            hp.width,
            hp.length,
        ]
    }

    fn state_observation(&self) -> Vec<f64> {
        vec![self.state.v]
    }

    fn state_observation_space(&self) -> BoxSpace {
        BoxSpace::from_parts(vec![0.0], vec![f64::INFINITY])
    }

    fn jacobian(&self, state: &[f64], action: &[f64]) -> Result<Vec<Vec<f64>>, KinematicsError> {
        let state = state_from_slice(state)?;
        check_len("bicycle action", action, BicycleAction::DIM)?;
        let s = action[1];
        let beta = self.cog_relative_position();
        let omega = (beta * s.tan()).atan();
        let domega_ds = beta / (s.cos().powi(2) + (beta * s.sin()).powi(2));
        let heading = state.r + omega;
        let (sin_h, cos_h) = heading.sin_cos();
        let inv_rear = 1.0 / self.hyper_parameter.rearwheel_to_cog;

        // columns: x, y, r, v | a, s
        Ok(vec![
            vec![0.0, 0.0, -state.v * sin_h, cos_h, 0.0, -state.v * sin_h * domega_ds],
            vec![0.0, 0.0, state.v * cos_h, sin_h, 0.0, state.v * cos_h * domega_ds],
            vec![
                0.0,
                0.0,
                0.0,
                omega.sin() * inv_rear,
                0.0,
                state.v * omega.cos() * domega_ds * inv_rear,
            ],
            vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        ])
    }

    fn debug_info(&self) -> &DebugInfo {
        &self.debug_info
    }

    fn clone_box(&self) -> Box<dyn DynamicsModel> {
        Box::new(self.clone())
    }
}
