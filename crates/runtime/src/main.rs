#![deny(clippy::all, clippy::pedantic)]
//! # Tracking Runtime
//!
//! Command-line entry point for the trajectory-tracking simulation.
//!
//! `rollout` drives seeded random-policy episodes and writes the resulting
//! episode trace; `replay` rebuilds the environment from a trace and checks
//! that every recorded episode is reproduced bit for bit.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use kinematics::ModelRegistry;
use std::path::{Path, PathBuf};
use tracking::{
    roll_out_one_episode, EnvironmentTrace, RandomPolicy, ResetOptions, TrackingConfig,
    TrajectoryTrackingEnv,
};

const PROGRESS_INTERVAL: usize = 10;

#[derive(Parser)]
#[command(name = "tracking_main", about = "Trajectory tracking simulation runtime")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run random-policy episodes and write the episode trace.
    Rollout {
        /// Environment and dynamics model configuration
        #[arg(long, default_value = "configs/tracking.json")]
        config: PathBuf,
        #[arg(long, default_value_t = 10)]
        episodes: usize,
        /// Seed for every random draw of the run
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Where to write the trace JSON
        #[arg(long)]
        output: PathBuf,
        /// Track with this dynamics model instead of sampling one per episode
        #[arg(long)]
        model: Option<String>,
    },
    /// Rebuild the environment from a trace and verify every episode replays identically.
    Replay {
        #[arg(long)]
        trace: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    match Cli::parse().command {
        Commands::Rollout {
            config,
            episodes,
            seed,
            output,
            model,
        } => run_rollout(&config, episodes, seed, &output, model.as_deref()),
        Commands::Replay { trace } => run_replay(&trace),
    }
}

fn run_rollout(
    config_path: &Path,
    episodes: usize,
    seed: u64,
    output: &Path,
    model: Option<&str>,
) -> Result<()> {
    let config = TrackingConfig::from_path(config_path)
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;
    let registry = ModelRegistry::with_builtin();
    let mut env = TrajectoryTrackingEnv::new(config, &registry, fastrand::Rng::with_seed(seed))?;
    let mut policy = RandomPolicy::new(env.action_space(), seed.wrapping_add(1))?;
    tracing::info!("Configured dynamics models:\n{}", env.dynamics_model_info());

    tracing::info!("Starting {} episode(s) with seed {}...", episodes, seed);
    for i in 0..episodes {
        let mut options = ResetOptions::default();
        if let Some(name) = model {
            options = options.with_model_name(name);
        }
        let rollout = roll_out_one_episode(&mut env, &mut policy, options)
            .with_context(|| format!("episode {i} failed"))?;
        if (i + 1) % PROGRESS_INTERVAL == 0 || i + 1 == episodes {
            let total_reward = env
                .current_episode()
                .map_or(0.0, tracking::Episode::total_reward);
            tracing::info!(
                "Episode {} complete: {} steps, total reward {:.3}",
                i + 1,
                rollout.actions.len(),
                total_reward
            );
        }
    }

    let trace = env.export_trace();
    trace
        .save(output)
        .with_context(|| format!("writing trace to {}", output.display()))?;
    tracing::info!(
        "Wrote {} episode(s) to {}",
        trace.episodes().count(),
        output.display()
    );
    Ok(())
}

fn run_replay(path: &Path) -> Result<()> {
    let trace = EnvironmentTrace::load(path)
        .with_context(|| format!("loading trace from {}", path.display()))?;
    let registry = ModelRegistry::with_builtin();
    let mut env =
        TrajectoryTrackingEnv::from_trace(trace.clone(), &registry, fastrand::Rng::with_seed(0))?;

    let mut mismatches = 0_usize;
    let mut total = 0_usize;
    for (i, episode) in trace.episodes().enumerate() {
        total += 1;
        let replayed = env
            .replay(episode)
            .with_context(|| format!("replaying episode {i}"))?;
        if replayed == *episode {
            tracing::debug!("Episode {} reproduced ({} steps)", i, episode.step_index);
        } else {
            mismatches += 1;
            tracing::error!("Episode {} diverged on replay", i);
        }
    }

    if mismatches > 0 {
        bail!("{mismatches} of {total} episode(s) diverged on replay");
    }
    tracing::info!("All {} episode(s) replayed identically.", total);
    Ok(())
}
