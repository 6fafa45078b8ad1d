//! Configuration for the formation environment.
//!
//! Built either in code with the `with_*` builder or from TOML:
//!
//! ```toml
//! turbulence_model = "NS"
//! turbulence_base_folder = "/data/ns_runs"
//! dt = 0.033
//! max_steps = 450
//! action_mode = "additive"
//!
//! [gains]
//! kp = 5.0
//! kd = 2.5
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::control::{ActionMode, ControlGains, LeaderSchedule};
use crate::disturbance::{ReseedPolicy, SharedCatalog};
use crate::env::FormationEnv;
use crate::error::{FormationError, Result};
use crate::formation::{FormationGraph, FormationLayout};
use crate::physics::AeroParams;
use crate::types::Bounds;

// ============================================================================
// Turbulence Model
// ============================================================================

/// Which wind field drives the episode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurbulenceModel {
    /// No wind
    Calm,
    /// Point vortices at random positions
    #[default]
    Random,
    /// Stored fluid simulations from `turbulence_base_folder`
    #[serde(alias = "NS", alias = "ns")]
    Precomputed,
}

impl FromStr for TurbulenceModel {
    type Err = FormationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "calm" => Ok(Self::Calm),
            "random" => Ok(Self::Random),
            "precomputed" | "NS" | "ns" => Ok(Self::Precomputed),
            other => Err(FormationError::invalid_config(
                "turbulence_model",
                format!("unknown model '{other}' (expected calm, random, precomputed or NS)"),
            )),
        }
    }
}

impl fmt::Display for TurbulenceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Calm => "calm",
            Self::Random => "random",
            Self::Precomputed => "precomputed",
        })
    }
}

// ============================================================================
// Environment Configuration
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormationConfig {
    /// Arena `[x_min, x_max, y_min, y_max]` (m)
    pub bounds: Bounds,
    /// Integration timestep (s)
    pub dt: f64,
    /// Steps per episode
    pub max_steps: u32,
    pub gains: ControlGains,
    pub leader: LeaderSchedule,
    pub formation: FormationLayout,
    pub aero: AeroParams,
    pub turbulence_model: TurbulenceModel,
    /// Folder of simulation directories, required by the precomputed model
    pub turbulence_base_folder: Option<PathBuf>,
    /// Vortex count for the random model
    pub num_vortices: usize,
    pub vortex_reseed: ReseedPolicy,
    pub action_mode: ActionMode,
    /// Seed used by `reset()`; entropy when absent
    pub seed: Option<u64>,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            dt: DEFAULT_DT,
            max_steps: DEFAULT_MAX_STEPS,
            gains: ControlGains::default(),
            leader: LeaderSchedule::default(),
            formation: FormationLayout::triangle(),
            aero: AeroParams::default(),
            turbulence_model: TurbulenceModel::default(),
            turbulence_base_folder: None,
            num_vortices: DEFAULT_NUM_VORTICES,
            vortex_reseed: ReseedPolicy::default(),
            action_mode: ActionMode::default(),
            seed: None,
        }
    }
}

impl FormationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML text. Validation happens in [`Self::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| FormationError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    pub fn with_bounds(mut self, bounds: impl Into<Bounds>) -> Self {
        self.bounds = bounds.into();
        self
    }

    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_gains(mut self, kp: f64, kd: f64) -> Self {
        self.gains.kp = kp;
        self.gains.kd = kd;
        self
    }

    pub fn with_leader(mut self, leader: LeaderSchedule) -> Self {
        self.leader = leader;
        self
    }

    pub fn with_formation(mut self, formation: FormationLayout) -> Self {
        self.formation = formation;
        self
    }

    pub fn with_aero(mut self, aero: AeroParams) -> Self {
        self.aero = aero;
        self
    }

    pub fn with_turbulence(mut self, model: TurbulenceModel) -> Self {
        self.turbulence_model = model;
        self
    }

    /// Use the precomputed model with simulations under `folder`.
    pub fn with_precomputed_turbulence(mut self, folder: impl Into<PathBuf>) -> Self {
        self.turbulence_model = TurbulenceModel::Precomputed;
        self.turbulence_base_folder = Some(folder.into());
        self
    }

    pub fn with_vortices(mut self, count: usize, reseed: ReseedPolicy) -> Self {
        self.num_vortices = count;
        self.vortex_reseed = reseed;
        self
    }

    pub fn with_action_mode(mut self, mode: ActionMode) -> Self {
        self.action_mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn num_agents(&self) -> usize {
        self.formation.num_agents()
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        self.validate_simulation()?;

        match self.turbulence_model {
            TurbulenceModel::Random if self.num_vortices == 0 => {
                return Err(FormationError::invalid_config(
                    "num_vortices",
                    "random turbulence needs at least one vortex",
                ));
            }
            TurbulenceModel::Precomputed if self.turbulence_base_folder.is_none() => {
                return Err(FormationError::invalid_config(
                    "turbulence_base_folder",
                    "required by the precomputed turbulence model",
                ));
            }
            _ => {}
        }

        Ok(())
    }

    /// Everything except the wind model: arena, timing, gains, leader, aero
    /// and formation.
    pub(crate) fn validate_simulation(&self) -> Result<()> {
        if !self.bounds.is_valid() {
            return Err(FormationError::invalid_config(
                "bounds",
                format!(
                    "need finite x_min < x_max and y_min < y_max, got {:?}",
                    self.bounds.as_array()
                ),
            ));
        }

        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(FormationError::invalid_config(
                "dt",
                format!("must be positive, got {}", self.dt),
            ));
        }

        if self.max_steps == 0 {
            return Err(FormationError::invalid_config("max_steps", "must be at least 1"));
        }

        let g = &self.gains;
        if ![g.kp, g.kd, g.leader_position_scale].iter().all(|v| v.is_finite()) {
            return Err(FormationError::invalid_config("gains", "gains must be finite"));
        }

        let leader = &self.leader;
        if !(leader.initial_goal.is_finite()
            && leader.final_goal.is_finite()
            && leader.goal_rate.is_finite())
        {
            return Err(FormationError::invalid_config("leader", "goals and rate must be finite"));
        }

        let aero = &self.aero;
        if !(aero.mass.is_finite() && aero.mass > 0.0) {
            return Err(FormationError::invalid_config(
                "aero.mass",
                format!("must be positive, got {}", aero.mass),
            ));
        }
        if ![aero.air_density, aero.drag_coeff, aero.area, aero.static_pressure]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
        {
            return Err(FormationError::invalid_config(
                "aero",
                "density, drag coefficient, area and pressure must be finite and non-negative",
            ));
        }

        // topology checks live with the graph
        FormationGraph::new(&self.formation)?;

        Ok(())
    }

    /// Build the environment, opening the simulation catalog if needed.
    pub fn build(self) -> Result<FormationEnv> {
        FormationEnv::from_config(self)
    }

    /// Build the environment on an existing, possibly shared, catalog.
    pub fn build_with_catalog(self, catalog: SharedCatalog) -> Result<FormationEnv> {
        FormationEnv::from_config_with_catalog(self, catalog)
    }
}
