//! # Trajectory-Tracking Environment
//!
//! The episode state machine. [`TrajectoryTrackingEnv::reset`] picks a
//! dynamics model, an initial state and a reference line, then returns the
//! first observation; [`TrajectoryTrackingEnv::step`] applies one action,
//! scores it and records it until the tracking length is reached.
//!
//! Every random draw comes from the generator handed to the constructor, in a
//! fixed order per reset: model, tracking length, initial state, random-walk
//! actions. Two environments built from the same configuration and seed
//! therefore produce identical traces.

use crate::config::TrackingConfig;
use crate::env::Env;
use crate::episode::{DynamicsModelRecord, Episode, EnvironmentTrace};
use crate::error::TrackingError;
use crate::observation;
use crate::random_walk::random_walk;
use crate::reference_line::{PadMode, ReferenceLine, ReferenceLineManager, ESTIMATION_WINDOW};
use kinematics::{BoxSpace, DynamicsModel, DynamicsModelManager, ModelRegistry};
use std::collections::VecDeque;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No episode accepts actions; call reset.
    Idle,
    Active,
}

/// Optional overrides for [`TrajectoryTrackingEnv::reset`].
#[derive(Clone, Debug, Default)]
pub struct ResetOptions {
    /// Initial state; otherwise estimated from the supplied line or sampled.
    pub init_state: Option<Vec<f64>>,
    /// Dynamics model to use; otherwise sampled.
    pub model_name: Option<String>,
    /// Reference line to track; otherwise generated by a random walk.
    pub reference_line: Option<ReferenceLine>,
    /// Number of steps to track. Defaults to the full supplied line, or a
    /// uniform draw from the configured bounds.
    pub tracking_length: Option<usize>,
}

impl ResetOptions {
    #[must_use]
    pub fn with_init_state(mut self, init_state: Vec<f64>) -> Self {
        self.init_state = Some(init_state);
        self
    }

    #[must_use]
    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_reference_line(mut self, line: ReferenceLine) -> Self {
        self.reference_line = Some(line);
        self
    }

    #[must_use]
    pub fn with_tracking_length(mut self, tracking_length: usize) -> Self {
        self.tracking_length = Some(tracking_length);
        self
    }
}

/// Individual reward terms of one step.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RewardTerms {
    /// Negative distance between the body and the current waypoint.
    pub tracking: f64,
    /// Negative squared norm of the action scaled to `[-1, 1]`.
    pub action: f64,
}

impl RewardTerms {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.tracking + self.action
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub observation: Vec<f32>,
    pub reward: f64,
    pub terminated: bool,
    /// Always false; episodes end only by reaching the tracking length.
    pub truncated: bool,
    pub info: RewardTerms,
}

pub struct TrajectoryTrackingEnv {
    config: TrackingConfig,
    models: DynamicsModelManager,
    reference_line: ReferenceLineManager,
    init_state_space: BoxSpace,
    observation_space: BoxSpace,
    rng: fastrand::Rng,
    phase: Phase,
    current: Option<Episode>,
    archived: VecDeque<Episode>,
}

impl TrajectoryTrackingEnv {
    /// Build the environment and every configured dynamics model.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration, including zero model variants and an
    /// initial-state box that does not match the model state.
    pub fn new(
        config: TrackingConfig,
        registry: &ModelRegistry,
        rng: fastrand::Rng,
    ) -> Result<Self, TrackingError> {
        config.environment.validate()?;
        let models = DynamicsModelManager::new(registry, &config.dynamics_models)?;
        let init_state_space = config.environment.init_state_space()?;
        let state_dim = models.state_space().len();
        if init_state_space.len() != state_dim {
            return Err(TrackingError::Configuration(format!(
                "initial state bounds have {} dimensions, the dynamics models have {state_dim}",
                init_state_space.len()
            )));
        }

        let reference_line = ReferenceLineManager::new(
            config.environment.n_observation_steps,
            config.environment.reference_line_pad_mode,
        );
        let observation_space = observation::compose_space(
            &reference_line.observation_space(),
            &models.state_observation_space(),
            &models.dynamics_model_observation_space(),
        );
        tracing::debug!(
            "Built trajectory tracking environment: {} model(s), observation size {}",
            models.len(),
            observation_space.len()
        );

        Ok(Self {
            config,
            models,
            reference_line,
            init_state_space,
            observation_space,
            rng,
            phase: Phase::Idle,
            current: None,
            archived: VecDeque::new(),
        })
    }

    /// Rebuild an environment from a stored trace. Recorded episodes are
    /// restored, the oldest dropped beyond the archive capacity; the
    /// environment starts idle.
    ///
    /// # Errors
    ///
    /// Fails if the stored configuration is invalid.
    pub fn from_trace(
        trace: EnvironmentTrace,
        registry: &ModelRegistry,
        rng: fastrand::Rng,
    ) -> Result<Self, TrackingError> {
        let mut env = Self::new(trace.config, registry, rng)?;
        env.archived = trace.archived.into();
        env.current = trace.current;
        env.evict_archived();
        Ok(env)
    }

    /// Start a new episode and return its first observation.
    ///
    /// The previous episode, if any, is archived first; on failure the
    /// environment is left idle without a current episode.
    ///
    /// # Errors
    ///
    /// Fails on an unknown model name, a mismatched initial state, a
    /// degenerate or empty reference line, or a reference line too short for
    /// the observation window at the final step.
    pub fn reset(&mut self, options: ResetOptions) -> Result<Vec<f32>, TrackingError> {
        self.archive_current();
        self.phase = Phase::Idle;
        let environment = self.config.environment.clone();

        let index = match options.model_name.as_deref() {
            Some(name) => self.models.select_by_name(name)?,
            None => self.models.sample(&mut self.rng),
        };

        let (line, tracking_length) = if let Some(line) = options.reference_line {
            let tracking_length = options.tracking_length.unwrap_or(line.len());
            let init_state = match options.init_state {
                Some(state) => state,
                None => ReferenceLineManager::estimate_initial_state(
                    &line,
                    environment.step_interval,
                    ESTIMATION_WINDOW,
                )?
                .to_array()
                .to_vec(),
            };
            self.models.sampled_mut().set_state(&init_state)?;
            (line, tracking_length)
        } else {
            self.generate_line(options.tracking_length, options.init_state)?
        };

        self.reference_line.set(&line, tracking_length)?;
        let tracking_length = self.reference_line.tracking_length();
        let available = self.reference_line.padded().len();
        if available < tracking_length + environment.n_observation_steps {
            return Err(TrackingError::WindowOutOfBounds {
                index: tracking_length,
                window: environment.n_observation_steps,
                available,
            });
        }

        let dynamics_model = self.sampled_model_record(index);
        let model = self.models.sampled();
        let init_state = model.serialize_state(&model.state())?;
        let observation = observation::observe(&self.reference_line, 0, model)?;

        tracing::debug!(
            "Reset episode: model `{}`, tracking length {}, {} waypoints",
            dynamics_model.name,
            tracking_length,
            line.len()
        );
        self.current = Some(Episode {
            step_index: 0,
            tracking_length,
            environment,
            dynamics_model,
            reference_line: line,
            init_state,
            states: Vec::with_capacity(tracking_length),
            actions: Vec::with_capacity(tracking_length),
            observations: vec![observation.clone()],
            rewards: Vec::with_capacity(tracking_length),
            debug_infos: Vec::with_capacity(tracking_length),
        });
        self.phase = Phase::Active;
        Ok(observation)
    }

    /// Apply one action to the active episode.
    ///
    /// # Errors
    ///
    /// Fails when no episode is active, or the action has the wrong size or
    /// a non-finite component.
    pub fn step(&mut self, action: &[f64]) -> Result<Transition, TrackingError> {
        if self.phase != Phase::Active {
            return Err(TrackingError::EpisodeNotActive);
        }
        if let Some(a) = action.iter().find(|a| !a.is_finite()) {
            return Err(TrackingError::Configuration(format!(
                "action components must be finite, got {a}"
            )));
        }
        let episode = self
            .current
            .as_mut()
            .ok_or(TrackingError::EpisodeNotActive)?;
        let model = self.models.sampled_mut();

        let state = model.state();
        let recorded_state = model.serialize_state(&state)?;
        let recorded_action = model.serialize_action(action)?;
        let waypoint = self.reference_line.waypoint(episode.step_index)?;
        let info = RewardTerms {
            tracking: -(state[0] - waypoint[0]).hypot(state[1] - waypoint[1]),
            action: -model
                .action_space()
                .scale_to_unit(action)?
                .iter()
                .map(|a| a * a)
                .sum::<f64>(),
        };
        let reward = info.total();

        model.step(action, self.config.environment.step_interval)?;
        episode.states.push(recorded_state);
        episode.actions.push(recorded_action);
        episode.rewards.push(reward);
        episode.debug_infos.push(model.debug_info().clone());
        episode.step_index += 1;

        let observation = observation::observe(&self.reference_line, episode.step_index, &*model)?;
        let terminated = episode.is_terminated();
        if terminated {
            self.phase = Phase::Idle;
        } else {
            episode.observations.push(observation.clone());
        }
        tracing::trace!(
            "Step {}/{}: reward {:.4}",
            episode.step_index,
            episode.tracking_length,
            reward
        );

        Ok(Transition {
            observation,
            reward,
            terminated,
            truncated: false,
            info,
        })
    }

    /// Re-run a recorded episode from its initial conditions and actions and
    /// return the regenerated record.
    ///
    /// The environment's own episodes, phase and live model state are left as
    /// they were.
    ///
    /// # Errors
    ///
    /// Fails if the episode was recorded under a different environment
    /// configuration or dynamics model, names an unknown model, or any
    /// reset/step fails.
    pub fn replay(&mut self, episode: &Episode) -> Result<Episode, TrackingError> {
        let phase = self.phase;
        let current = self.current.take();
        let archived = std::mem::take(&mut self.archived);
        let reference_line = self.reference_line.clone();
        let model_name = self.models.sampled_name().to_string();
        let model_state = self.models.sampled().state();

        let replayed = self.rerun(episode);

        self.phase = phase;
        self.current = current;
        self.archived = archived;
        self.reference_line = reference_line;
        self.models.select_by_name(&model_name)?;
        self.models.sampled_mut().set_state(&model_state)?;
        replayed
    }

    fn rerun(&mut self, episode: &Episode) -> Result<Episode, TrackingError> {
        if episode.environment != self.config.environment {
            return Err(TrackingError::Configuration(
                "episode was recorded under a different environment configuration".into(),
            ));
        }
        let index = self.models.select_by_name(&episode.dynamics_model.name)?;
        if self.sampled_model_record(index) != episode.dynamics_model {
            return Err(TrackingError::Configuration(format!(
                "dynamics model `{}` differs from the one the episode was recorded with",
                episode.dynamics_model.name
            )));
        }
        let init_state = self.models.sampled().deserialize_state(&episode.init_state)?;
        let options = ResetOptions::default()
            .with_init_state(init_state)
            .with_model_name(episode.dynamics_model.name.clone())
            .with_reference_line(episode.reference_line.clone())
            .with_tracking_length(episode.tracking_length);
        self.reset(options)?;

        for recorded in &episode.actions {
            let action = self.models.sampled().deserialize_action(recorded)?;
            self.step(&action)?;
        }
        self.current.take().ok_or(TrackingError::EpisodeNotActive)
    }

    /// Set the live model's initial state and random-walk a clone of it to
    /// produce the reference line.
    fn generate_line(
        &mut self,
        tracking_length: Option<usize>,
        init_state: Option<Vec<f64>>,
    ) -> Result<(ReferenceLine, usize), TrackingError> {
        let environment = &self.config.environment;
        let tracking_length = match tracking_length {
            Some(0) => {
                return Err(TrackingError::Configuration(
                    "tracking length must be at least 1".into(),
                ))
            }
            Some(length) => length,
            None => self
                .rng
                .usize(environment.tracking_length_lb..=environment.tracking_length_ub),
        };
        let init_state =
            init_state.unwrap_or_else(|| self.init_state_space.sample(&mut self.rng));
        self.models.sampled_mut().set_state(&init_state)?;

        // Unpadded lines must already cover the final observation window.
        let walk_length = match environment.reference_line_pad_mode {
            PadMode::None => tracking_length + environment.n_observation_steps,
            PadMode::Repeat => tracking_length,
        };
        let mut walker = self.models.sampled().clone_box();
        let (line, _) = random_walk(
            walker.as_mut(),
            environment.step_interval,
            walk_length,
            &mut self.rng,
        )?;
        Ok((line, tracking_length))
    }

    fn sampled_model_record(&self, index: usize) -> DynamicsModelRecord {
        let model = self.models.sampled();
        DynamicsModelRecord {
            type_tag: model.type_tag().to_string(),
            name: self.models.sampled_name().to_string(),
            index,
            hyper_parameter: model.hyper_parameter(),
        }
    }

    fn archive_current(&mut self) {
        if let Some(episode) = self.current.take() {
            self.archived.push_back(episode);
        }
        self.evict_archived();
    }

    fn evict_archived(&mut self) {
        while self.archived.len() > self.config.environment.max_archived_episodes {
            self.archived.pop_front();
            tracing::debug!("Evicted oldest archived episode");
        }
    }

    /// Snapshot of the configuration and every recorded episode.
    #[must_use]
    pub fn export_trace(&self) -> EnvironmentTrace {
        EnvironmentTrace {
            config: self.config.clone(),
            current: self.current.clone(),
            archived: self.archived.iter().cloned().collect(),
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    #[must_use]
    pub fn step_interval(&self) -> f64 {
        self.config.environment.step_interval
    }

    #[must_use]
    pub fn current_episode(&self) -> Option<&Episode> {
        self.current.as_ref()
    }

    /// Archived episodes, oldest first.
    #[must_use]
    pub fn archived_episodes(&self) -> &VecDeque<Episode> {
        &self.archived
    }

    /// The reference line of the current episode, before padding.
    #[must_use]
    pub fn reference_line(&self) -> &ReferenceLine {
        self.reference_line.raw()
    }

    #[must_use]
    pub fn current_model(&self) -> &dyn DynamicsModel {
        self.models.sampled()
    }

    #[must_use]
    pub fn state(&self) -> Vec<f64> {
        self.models.sampled().state()
    }

    #[must_use]
    pub fn dynamics_model_info(&self) -> String {
        self.models.info()
    }

    #[must_use]
    pub fn observation_space(&self) -> &BoxSpace {
        &self.observation_space
    }

    #[must_use]
    pub fn action_space(&self) -> BoxSpace {
        self.models.action_space()
    }

    #[must_use]
    pub fn state_space(&self) -> BoxSpace {
        self.models.state_space()
    }
}

impl Env for TrajectoryTrackingEnv {
    fn step(&mut self, action: &[f32]) -> Result<(Vec<f32>, f32, bool), TrackingError> {
        let action: Vec<f64> = action.iter().map(|&a| f64::from(a)).collect();
        let transition = TrajectoryTrackingEnv::step(self, &action)?;
        Ok((
            transition.observation,
            transition.reward as f32,
            transition.terminated,
        ))
    }

    fn reset(&mut self) -> Result<Vec<f32>, TrackingError> {
        TrajectoryTrackingEnv::reset(self, ResetOptions::default())
    }

    fn obs_size(&self) -> usize {
        self.observation_space.len()
    }

    fn action_size(&self) -> usize {
        self.models.action_space().len()
    }
}
