//! Roll out formation episodes with the built-in control law and report
//! per-episode return.
//!
//! ```text
//! RUST_LOG=info formation-rollout --config formation.toml --episodes 5 --seed 7
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use turbulent_formation_env::{ActionMode, FormationConfig, TurbulenceModel};

#[derive(Parser)]
#[command(name = "formation-rollout", about = "Run formation episodes under turbulence")]
struct Cli {
    /// TOML config file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of episodes to run.
    #[arg(short, long, default_value_t = 1)]
    episodes: u32,

    /// Seed for the first episode; episode k uses seed + k.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the wind model (calm, random, precomputed, NS).
    #[arg(long)]
    turbulence: Option<TurbulenceModel>,

    /// Override the simulation folder for precomputed turbulence.
    #[arg(long)]
    turbulence_base_folder: Option<PathBuf>,

    /// Override how the action combines with the control law.
    #[arg(long)]
    action_mode: Option<ActionMode>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => FormationConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => FormationConfig::default(),
    };
    if let Some(model) = cli.turbulence {
        config.turbulence_model = model;
    }
    if let Some(folder) = cli.turbulence_base_folder {
        config.turbulence_base_folder = Some(folder);
    }
    if let Some(mode) = cli.action_mode {
        config.action_mode = mode;
    }

    let mut env = config.build().context("building environment")?;
    let actions = vec![0.0; env.action_space().shape];

    for episode in 0..cli.episodes {
        match cli.seed {
            Some(seed) => env.reset_with_seed(seed.wrapping_add(u64::from(episode)))?,
            None => env.reset()?,
        };

        let mut episode_return = 0.0;
        loop {
            let out = env
                .step(&actions)
                .with_context(|| format!("episode {episode}, step {}", env.state().step_count))?;
            episode_return += out.reward;
            if out.done {
                break;
            }
        }

        let leader = env.state().positions[0];
        let goal = env.state().leader_goal.position;
        info!(
            episode,
            episode_return,
            leader_goal_distance = (leader - goal).norm(),
            "rollout complete"
        );
    }

    Ok(())
}
