//! Physical and scenario constants for the formation environment.
//!
//! Agents are modelled as small spheres in still air at sea level.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

// ============================================================================
// Air and Agent Body
// ============================================================================

/// Air density (kg/m^3)
pub const AIR_DENSITY: f64 = 1.184;

/// Static (ambient) pressure (Pa)
pub const STATIC_PRESSURE: f64 = 101_325.0;

/// Mass of one agent (kg)
pub const AGENT_MASS: f64 = 0.2;

/// Radius of the spherical agent body (m)
pub const AGENT_RADIUS: f64 = 0.05;

/// Drag coefficient of a sphere
pub const DRAG_COEFF: f64 = 0.47;

/// Reference area used by the drag law, the full sphere surface 4*pi*r^2 (m^2)
pub const REFERENCE_AREA: f64 = 4.0 * PI * AGENT_RADIUS * AGENT_RADIUS;

// ============================================================================
// Simulation
// ============================================================================

/// Number of agents in the default formation
pub const DEFAULT_NUM_AGENTS: usize = 3;

/// Integration timestep (s)
pub const DEFAULT_DT: f64 = 0.033;

/// Steps per episode before truncation
pub const DEFAULT_MAX_STEPS: u32 = 450;

/// Arena bounds [x_min, x_max, y_min, y_max] (m)
pub const DEFAULT_BOUNDS: [f64; 4] = [-5.0, 5.0, -5.0, 5.0];

/// Per-agent observation size (x, y)
pub const OBS_PER_AGENT: usize = 2;

/// Per-agent action size (ax, ay)
pub const ACTION_PER_AGENT: usize = 2;

// ============================================================================
// Control
// ============================================================================

/// Proportional consensus gain
pub const DEFAULT_KP: f64 = 5.0;

/// Derivative consensus gain
pub const DEFAULT_KD: f64 = 2.5;

/// Fraction of `Kp` applied to the leader's goal tracking term
pub const LEADER_POSITION_GAIN_SCALE: f64 = 0.5;

/// Steps during which the leader goal stays put
pub const LEADER_WARMUP_STEPS: u32 = 100;

/// Leader goal velocity is `LEADER_GOAL_RATE * Kp * (final - goal)`
pub const LEADER_GOAL_RATE: f64 = 0.2;

pub const DEFAULT_LEADER_GOAL: [f64; 2] = [2.0, 2.0];
pub const DEFAULT_FINAL_GOAL: [f64; 2] = [0.0, 0.0];

/// Triangle formation edges
pub const DEFAULT_FORMATION_EDGES: [[usize; 2]; 3] = [[0, 1], [1, 2], [2, 0]];

/// Triangle formation offsets, one per agent
pub const DEFAULT_FORMATION_REFERENCE: [[f64; 2]; DEFAULT_NUM_AGENTS] =
    [[0.0, 0.0], [1.0, 0.0], [FRAC_1_SQRT_2, FRAC_1_SQRT_2]];

// ============================================================================
// Turbulence
// ============================================================================

/// Vortex centers drawn by the random field
pub const DEFAULT_NUM_VORTICES: usize = 5;

/// File name prefix of a precomputed velocity frame
pub const FRAME_FILE_PREFIX: &str = "state_phys_t";

/// File extension of a precomputed velocity frame
pub const FRAME_FILE_EXT: &str = "nc";

/// NetCDF group holding the `ux`/`uy` velocity components
pub const FRAME_GROUP: &str = "state_phys";
