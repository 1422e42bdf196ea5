use anyhow::Result;
use kinematics::{BicycleModelConfig, ModelRegistry, ModelSpec};
use tracking::{
    roll_out_one_episode, EnvironmentTrace, PadMode, RandomPolicy, ResetOptions, TrackingConfig,
    TrackingError, TrajectoryTrackingEnv,
};

const CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/tracking_config.json");

fn recorded_env(seed: u64, episodes: usize) -> Result<TrajectoryTrackingEnv> {
    let config = TrackingConfig::from_path(CONFIG_PATH)?;
    let mut env = TrajectoryTrackingEnv::new(
        config,
        &ModelRegistry::with_builtin(),
        fastrand::Rng::with_seed(seed),
    )?;
    let mut policy = RandomPolicy::new(env.action_space(), seed)?;
    for _ in 0..episodes {
        roll_out_one_episode(&mut env, &mut policy, ResetOptions::default())?;
    }
    Ok(env)
}

#[test]
fn config_file_loads() -> Result<()> {
    let config = TrackingConfig::from_path(CONFIG_PATH)?;
    assert_eq!(config.environment.reference_line_pad_mode, PadMode::Repeat);
    assert_eq!(config.environment.max_archived_episodes, 100);
    assert_eq!(config.dynamics_models.len(), 2);
    assert_eq!(config.dynamics_models[1].display_name(), "LongVehicle");
    Ok(())
}

#[test]
fn unknown_pad_mode_is_a_configuration_error() -> Result<()> {
    let json = std::fs::read_to_string(CONFIG_PATH)?.replace("\"repeat\"", "\"mirror\"");
    assert!(matches!(
        TrackingConfig::from_json(&json),
        Err(TrackingError::Configuration(_))
    ));
    Ok(())
}

#[test]
fn trace_survives_json() -> Result<()> {
    let trace = recorded_env(5, 3)?.export_trace();
    let restored = EnvironmentTrace::from_json(&trace.to_json()?)?;
    assert_eq!(restored, trace);
    assert_eq!(restored.episodes().count(), 3);
    Ok(())
}

#[test]
fn trace_survives_file() -> Result<()> {
    let trace = recorded_env(6, 2)?.export_trace();
    let path = std::env::temp_dir().join(format!("tracking_trace_{}.json", std::process::id()));
    trace.save(&path)?;
    let loaded = EnvironmentTrace::load(&path);
    std::fs::remove_file(&path)?;
    assert_eq!(loaded?, trace);
    Ok(())
}

#[test]
fn restored_environment_replays_every_episode() -> Result<()> {
    let trace = recorded_env(7, 4)?.export_trace();
    let stored = EnvironmentTrace::from_json(&trace.to_json()?)?;
    let mut env = TrajectoryTrackingEnv::from_trace(
        stored.clone(),
        &ModelRegistry::with_builtin(),
        fastrand::Rng::with_seed(0),
    )?;
    assert_eq!(env.export_trace(), stored);

    for episode in stored.episodes() {
        let replayed = env.replay(episode)?;
        assert_eq!(&replayed, episode);
    }
    Ok(())
}

#[test]
fn partial_episode_replays() -> Result<()> {
    let mut env = recorded_env(8, 1)?;
    env.reset(ResetOptions::default().with_model_name("LongVehicle"))?;
    for _ in 0..5 {
        env.step(&[0.7, -0.2])?;
    }
    let partial = env.current_episode().cloned().expect("episode is active");
    assert_eq!(partial.step_index, 5);
    assert_eq!(env.replay(&partial)?, partial);
    Ok(())
}

#[test]
fn replay_rejects_foreign_configuration() -> Result<()> {
    let mut episode = recorded_env(9, 1)?
        .current_episode()
        .cloned()
        .expect("one episode was run");
    episode.environment.step_interval = 0.2;
    let mut env = recorded_env(9, 0)?;
    assert!(matches!(
        env.replay(&episode),
        Err(TrackingError::Configuration(_))
    ));
    Ok(())
}

#[test]
fn replay_leaves_recorded_history_untouched() -> Result<()> {
    let stored = recorded_env(10, 4)?.export_trace();
    let mut env = TrajectoryTrackingEnv::from_trace(
        stored.clone(),
        &ModelRegistry::with_builtin(),
        fastrand::Rng::with_seed(0),
    )?;
    for episode in stored.episodes() {
        env.replay(episode)?;
        env.replay(episode)?;
    }
    assert_eq!(env.export_trace(), stored);
    Ok(())
}

#[test]
fn replay_keeps_active_episode_running() -> Result<()> {
    let mut env = recorded_env(11, 2)?;
    let earlier = env.archived_episodes()[0].clone();
    env.reset(ResetOptions::default())?;
    env.step(&[0.4, 0.1])?;
    let state = env.state();
    let archived = env.archived_episodes().len();

    env.replay(&earlier)?;
    assert_eq!(env.state(), state);
    assert_eq!(env.archived_episodes().len(), archived);
    env.step(&[0.4, 0.1])?;
    assert_eq!(env.current_episode().map(|e| e.step_index), Some(2));
    Ok(())
}

#[test]
fn replay_rejects_changed_dynamics_model() -> Result<()> {
    let episode = recorded_env(12, 1)?
        .current_episode()
        .cloned()
        .expect("one episode was run");
    let mut config = TrackingConfig::from_path(CONFIG_PATH)?;
    let name = episode.dynamics_model.name.clone();
    let spec = config
        .dynamics_models
        .iter_mut()
        .find(|spec| spec.display_name() == name)
        .expect("recorded model is configured");
    let longer = BicycleModelConfig {
        wheelbase: 4.0,
        ..BicycleModelConfig::default()
    };
    *spec = ModelSpec::bicycle(&name, &longer)?;

    let mut env = TrajectoryTrackingEnv::new(
        config,
        &ModelRegistry::with_builtin(),
        fastrand::Rng::with_seed(0),
    )?;
    assert!(matches!(
        env.replay(&episode),
        Err(TrackingError::Configuration(_))
    ));
    Ok(())
}

#[test]
fn restored_archive_respects_capacity() -> Result<()> {
    let mut trace = recorded_env(13, 6)?.export_trace();
    assert_eq!(trace.archived.len(), 5);
    let newest = trace.archived[3..].to_vec();
    trace.config.environment.max_archived_episodes = 2;

    let env = TrajectoryTrackingEnv::from_trace(
        trace,
        &ModelRegistry::with_builtin(),
        fastrand::Rng::with_seed(0),
    )?;
    assert_eq!(env.archived_episodes().len(), 2);
    assert!(env.archived_episodes().iter().eq(newest.iter()));
    Ok(())
}
