//! Structured state, action and hyper-parameter records.
//!
//! These are the serialized forms exchanged through episode traces. Every
//! dynamics-model variant contributes one arm to each tagged enum.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Planar pose of a tracked body. Heading `r` lies in `[-pi, pi)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl BodyState {
    #[must_use]
    pub const fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }

    #[must_use]
    pub const fn position(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BicycleState {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub v: f64,
}

impl BicycleState {
    pub const DIM: usize = 4;

    #[must_use]
    pub const fn from_array(v: [f64; 4]) -> Self {
        Self {
            x: v[0],
            y: v[1],
            r: v[2],
            v: v[3],
        }
    }

    #[must_use]
    pub const fn to_array(&self) -> [f64; 4] {
        [self.x, self.y, self.r, self.v]
    }

    #[must_use]
    pub const fn body_state(&self) -> BodyState {
        BodyState::new(self.x, self.y, self.r)
    }
}

/// Longitudinal acceleration `a` and steering angle `s`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BicycleAction {
    pub a: f64,
    pub s: f64,
}

impl BicycleAction {
    pub const DIM: usize = 2;

    #[must_use]
    pub const fn from_array(v: [f64; 2]) -> Self {
        Self { a: v[0], s: v[1] }
    }

    #[must_use]
    pub const fn to_array(&self) -> [f64; 2] {
        [self.a, self.s]
    }
}

/// Geometric constants of a bicycle model, including the derived ones.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BicycleHyperParameter {
    pub front_overhang: f64,
    pub wheelbase: f64,
    pub rear_overhang: f64,
    pub width: f64,
    pub length: f64,
    pub frontwheel_to_cog: f64,
    pub rearwheel_to_cog: f64,
    pub action_lb: [f64; 2],
    pub action_ub: [f64; 2],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
#[non_exhaustive]
pub enum State {
    #[serde(rename = "BicycleModel")]
    Bicycle(BicycleState),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
#[non_exhaustive]
pub enum Action {
    #[serde(rename = "BicycleModel")]
    Bicycle(BicycleAction),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
#[non_exhaustive]
pub enum HyperParameter {
    #[serde(rename = "BicycleModel")]
    Bicycle(BicycleHyperParameter),
}

/// Per-step diagnostic values written by a model while stepping.
pub type DebugInfo = BTreeMap<String, f64>;
