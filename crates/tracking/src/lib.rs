#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
//! # Trajectory Tracking
//!
//! Episode-level simulation on top of the [`kinematics`] crate: a body driven
//! by a dynamics model is rewarded for following a reference line.
//!
//! ## Key Components
//!
//! -   **Reference lines:** [`ReferenceLineManager`] pads the target path and
//!     cuts ego-frame look-ahead windows from it; [`random_walk`] generates
//!     paths when none is supplied.
//! -   **Environment:** [`TrajectoryTrackingEnv`] runs the reset/step state
//!     machine, computes rewards and records every episode. It implements the
//!     generic [`Env`] trait.
//! -   **Traces:** [`EnvironmentTrace`] serializes the configuration and all
//!     recorded episodes so an identical environment can be rebuilt and any
//!     episode replayed.
//! -   **Rollouts:** [`Policy`], [`roll_out_one_episode`] and the
//!     [`TrajectoryTracker`] facade.
//!
//! ## Usage
//!
//! ```rust
//! use kinematics::{BicycleModelConfig, ModelRegistry, ModelSpec};
//! use tracking::{EnvironmentConfig, ResetOptions, TrackingConfig, TrajectoryTrackingEnv};
//!
//! let config = TrackingConfig {
//!     environment: EnvironmentConfig::default(),
//!     dynamics_models: vec![ModelSpec::bicycle("ShortVehicle", &BicycleModelConfig::default())?],
//! };
//! let registry = ModelRegistry::with_builtin();
//! let mut env = TrajectoryTrackingEnv::new(config, &registry, fastrand::Rng::with_seed(0))?;
//!
//! let observation = env.reset(ResetOptions::default())?;
//! assert_eq!(observation.len(), env.observation_space().len());
//! let transition = env.step(&[0.0, 0.0])?;
//! assert!(!transition.terminated);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod env;
pub mod episode;
pub mod error;
pub mod observation;
pub mod policy;
pub mod random_walk;
pub mod reference_line;
pub mod tracker;
pub mod trajectory_tracking;

pub use config::{EnvironmentConfig, TrackingConfig};
pub use env::Env;
pub use episode::{DynamicsModelRecord, Episode, EnvironmentTrace};
pub use error::TrackingError;
pub use policy::{roll_out_one_episode, Policy, RandomPolicy, Rollout};
pub use random_walk::{random_walk, Trajectory, TrajectoryWaypoint};
pub use reference_line::{PadMode, ReferenceLine, ReferenceLineManager, Waypoint};
pub use tracker::TrajectoryTracker;
pub use trajectory_tracking::{Phase, ResetOptions, RewardTerms, TrajectoryTrackingEnv, Transition};
