//! Turbulent Formation RL Environment
//!
//! A team of point-mass agents flies a rigid formation behind a moving
//! leader goal while a wind field pushes them around. The environment is the
//! simulation core only: reset, step and wind queries.
//!
//! # Features
//!
//! - **Formation Control**: leader PD tracking plus graph consensus for the followers
//! - **Quadratic Drag**: wind acts through the relative airspeed of each agent
//! - **Three Wind Models**: calm air, random point vortices, or stored fluid
//!   simulations sampled with space-time trilinear interpolation
//! - **Composable Rewards**: tuple composition of reward components
//! - **Shared Simulation Cache**: one catalog can serve many environments
//!
//! # Example
//!
//! ```rust,ignore
//! use turbulent_formation_env::{FormationConfig, TurbulenceModel};
//!
//! let mut env = FormationConfig::new()
//!     .with_turbulence(TurbulenceModel::Random)
//!     .with_seed(42)
//!     .build()?;
//!
//! let obs = env.reset()?;            // [x0, y0, x1, y1, x2, y2]
//! let actions = vec![0.0; obs.len()];
//! let out = env.step(&actions)?;
//! println!("reward {} done {}", out.reward, out.done);
//! ```
//!
//! # Precomputed turbulence
//!
//! Reading fluid simulations from `.nc` files requires the `netcdf` feature.
//! Without it, build a [`SimulationCatalog`] with your own [`FrameReader`]
//! and pass it to [`FormationConfig::build_with_catalog`].

// Core modules
pub mod config;
pub mod constants;
pub mod error;
pub mod state;
pub mod types;

// Simulation
pub mod control;
pub mod disturbance;
pub mod formation;
pub mod physics;

// Environment
pub mod env;
pub mod reward;
pub mod termination;

#[cfg(test)]
mod tests;

pub use config::{FormationConfig, TurbulenceModel};
pub use control::{ActionMode, ControlGains, FormationController, LeaderGoal, LeaderSchedule};
pub use disturbance::{
    CalmField, DisturbanceField, FrameReader, PrecomputedField, ReseedPolicy, SharedCatalog,
    SimulationCatalog, SimulationData, Turbulence, VelocityFrame, VortexField,
};
pub use env::{FormationEnv, StepInfo, StepOutcome};
pub use error::{FormationError, Result};
pub use formation::{FormationGraph, FormationLayout};
pub use reward::{FormationShapeError, LeaderGoalError, RewardComponent};
pub use state::{EpisodePhase, FormationState};
pub use termination::TerminationResult;
pub use types::{Bounds, BoxSpace, Vec2};
