//! # Dynamics Model Manager
//!
//! Owns the configured dynamics-model variants and picks the one driving the
//! next episode, either by weighted random draw or by name.
//!
//! All variants must expose spaces of identical shape; shared accessors such
//! as [`DynamicsModelManager::action_space`] report the first variant.

use crate::dynamics::DynamicsModel;
use crate::error::KinematicsError;
use crate::registry::{ModelRegistry, ModelSpec};
use crate::space::BoxSpace;
use crate::types::HyperParameter;
use std::fmt::Write as _;

pub struct DynamicsModelManager {
    names: Vec<String>,
    models: Vec<Box<dyn DynamicsModel>>,
    /// Normalized cumulative selection probabilities.
    cumulative: Vec<f64>,
    sampled: usize,
}

impl DynamicsModelManager {
    /// Build every variant listed in `specs` through `registry`.
    ///
    /// # Errors
    ///
    /// Fails on an empty spec list, duplicate names, invalid weights,
    /// construction errors, or variants whose space shapes disagree.
    pub fn new(registry: &ModelRegistry, specs: &[ModelSpec]) -> Result<Self, KinematicsError> {
        if specs.is_empty() {
            return Err(KinematicsError::NoModels);
        }

        let mut names: Vec<String> = Vec::with_capacity(specs.len());
        let mut models = Vec::with_capacity(specs.len());
        let mut weights = Vec::with_capacity(specs.len());
        for spec in specs {
            let name = spec.display_name().to_string();
            if names.contains(&name) {
                return Err(KinematicsError::Configuration(format!(
                    "dynamics model name `{name}` is used twice"
                )));
            }
            let weight = spec.weight.unwrap_or(1.0);
            if !weight.is_finite() || weight <= 0.0 {
                return Err(KinematicsError::Configuration(format!(
                    "selection weight of `{name}` must be positive, got {weight}"
                )));
            }
            models.push(registry.build(spec)?);
            names.push(name);
            weights.push(weight);
        }

        check_compatible(&names, &models)?;

        let total: f64 = weights.iter().sum();
        let mut acc = 0.0;
        let cumulative = weights
            .iter()
            .map(|w| {
                acc += w / total;
                acc
            })
            .collect();

        tracing::debug!("Configured {} dynamics model(s): {:?}", models.len(), names);
        Ok(Self {
            names,
            models,
            cumulative,
            sampled: 0,
        })
    }

    /// Randomly pick the model for the next episode.
    pub fn sample(&mut self, rng: &mut fastrand::Rng) -> usize {
        let u = rng.f64();
        self.sampled = self
            .cumulative
            .iter()
            .position(|&c| u < c)
            .unwrap_or(self.models.len() - 1);
        tracing::debug!("Sampled dynamics model `{}`", self.names[self.sampled]);
        self.sampled
    }

    /// Deterministically pick a model by name.
    ///
    /// # Errors
    ///
    /// Fails if no variant carries `name`.
    pub fn select_by_name(&mut self, name: &str) -> Result<usize, KinematicsError> {
        let index = self
            .names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| KinematicsError::UnknownModelName(name.to_string()))?;
        self.sampled = index;
        Ok(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn sampled_index(&self) -> usize {
        self.sampled
    }

    #[must_use]
    pub fn sampled_name(&self) -> &str {
        &self.names[self.sampled]
    }

    #[must_use]
    pub fn sampled(&self) -> &dyn DynamicsModel {
        self.models[self.sampled].as_ref()
    }

    pub fn sampled_mut(&mut self) -> &mut dyn DynamicsModel {
        self.models[self.sampled].as_mut()
    }

    #[must_use]
    pub fn representative(&self) -> &dyn DynamicsModel {
        self.models[0].as_ref()
    }

    #[must_use]
    pub fn action_space(&self) -> BoxSpace {
        self.representative().action_space()
    }

    #[must_use]
    pub fn state_space(&self) -> BoxSpace {
        self.representative().state_space()
    }

    #[must_use]
    pub fn state_observation_space(&self) -> BoxSpace {
        self.representative().state_observation_space()
    }

    #[must_use]
    pub fn dynamics_model_observation_space(&self) -> BoxSpace {
        self.representative().dynamics_model_observation_space()
    }

    #[must_use]
    pub fn all_hyper_parameters(&self) -> Vec<HyperParameter> {
        self.models.iter().map(|m| m.hyper_parameter()).collect()
    }

    /// Human-readable listing of every configured variant.
    #[must_use]
    pub fn info(&self) -> String {
        let mut out = String::new();
        for (name, model) in self.names.iter().zip(&self.models) {
            let _ = writeln!(out, "{name} ({})", model.type_tag());
            let _ = writeln!(out, "{:?}", model.hyper_parameter());
        }
        out
    }
}

fn check_compatible(
    names: &[String],
    models: &[Box<dyn DynamicsModel>],
) -> Result<(), KinematicsError> {
    let first = &models[0];
    let reference = (
        first.state().len(),
        first.action_space().len(),
        first.state_observation().len(),
        first.dynamics_model_observation().len(),
    );
    for (name, model) in names.iter().zip(models).skip(1) {
        let shape = (
            model.state().len(),
            model.action_space().len(),
            model.state_observation().len(),
            model.dynamics_model_observation().len(),
        );
        if shape != reference {
            return Err(KinematicsError::Configuration(format!(
                "dynamics model `{name}` has space shape {shape:?}, expected {reference:?} like `{}`",
                names[0]
            )));
        }
    }
    Ok(())
}
