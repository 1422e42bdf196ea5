#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
//! # Vehicle Kinematics
//!
//! Deterministic kinematic models of controllable planar bodies, used as the
//! transition function of trajectory-tracking environments.
//!
//! ## Key Components
//!
//! -   **Geometry:** angle normalization and the rigid world <-> body frame
//!     transform in the [`geometry`] module.
//! -   **Dynamics models:** the [`DynamicsModel`] trait captures what every
//!     vehicle type offers (state access, structured serialization, pure
//!     next-state computation, stepping, spaces, observations). The
//!     [`BicycleModel`] implements it with bicycle kinematics and explicit
//!     Euler integration.
//! -   **Registry and manager:** a [`ModelRegistry`] maps type tags to
//!     constructors; the [`DynamicsModelManager`] owns the configured
//!     variants and selects one per episode.
//!
//! ## Usage
//!
//! ```rust
//! use kinematics::{BicycleModel, BicycleModelConfig, DynamicsModel};
//!
//! let mut model = BicycleModel::new(&BicycleModelConfig::default())?;
//! model.set_state(&[0.0, 0.0, 0.0, 5.0])?;
//! model.step(&[0.0, 0.0], 1.0)?;
//! assert_eq!(model.state(), vec![5.0, 0.0, 0.0, 5.0]);
//! # Ok::<(), kinematics::KinematicsError>(())
//! ```

pub mod bicycle;
pub mod dynamics;
pub mod error;
pub mod geometry;
pub mod integrator;
pub mod manager;
pub mod registry;
pub mod space;
pub mod types;

pub use bicycle::{BicycleModel, BicycleModelConfig, BICYCLE_MODEL_TAG};
pub use dynamics::DynamicsModel;
pub use error::KinematicsError;
pub use geometry::{body_to_world, normalize_angle, world_to_body};
pub use manager::DynamicsModelManager;
pub use registry::{ModelFactory, ModelRegistry, ModelSpec};
pub use space::BoxSpace;
pub use types::{
    Action, BicycleAction, BicycleHyperParameter, BicycleState, BodyState, DebugInfo,
    HyperParameter, State,
};
