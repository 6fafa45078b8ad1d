//! Formation control law.
//!
//! Agent 0 tracks a moving goal with a PD law. Every other agent runs a
//! consensus law over its graph neighbors that drives pairwise position
//! differences toward the reference offsets and damps relative velocity.
//!
//! The caller's action enters as an external acceleration per agent; how it
//! combines with the control law is set by [`ActionMode`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::FormationError;
use crate::formation::FormationGraph;
use crate::types::Vec2;

// ============================================================================
// Gains
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlGains {
    /// Proportional gain
    pub kp: f64,
    /// Derivative gain
    pub kd: f64,
    /// Scale applied to `kp` in the leader's goal-tracking term
    pub leader_position_scale: f64,
}

impl Default for ControlGains {
    fn default() -> Self {
        Self {
            kp: DEFAULT_KP,
            kd: DEFAULT_KD,
            leader_position_scale: LEADER_POSITION_GAIN_SCALE,
        }
    }
}

// ============================================================================
// Action Mode
// ============================================================================

/// How the step action combines with the formation control law.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionMode {
    /// Action is validated and discarded; the control law flies the agents
    #[default]
    Ignore,
    /// Action is added to the control law output
    Additive,
    /// Action replaces the control law output
    Override,
}

impl ActionMode {
    #[inline]
    pub fn apply(self, control: Vec2, external: Vec2) -> Vec2 {
        match self {
            Self::Ignore => control,
            Self::Additive => control + external,
            Self::Override => external,
        }
    }
}

impl FromStr for ActionMode {
    type Err = FormationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "additive" => Ok(Self::Additive),
            "override" => Ok(Self::Override),
            other => Err(FormationError::invalid_config(
                "action_mode",
                format!("unknown mode '{other}' (expected ignore, additive or override)"),
            )),
        }
    }
}

impl fmt::Display for ActionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ignore => "ignore",
            Self::Additive => "additive",
            Self::Override => "override",
        })
    }
}

// ============================================================================
// Leader Goal
// ============================================================================

/// Where the leader goal starts, where it ends up, and when it starts moving.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LeaderSchedule {
    pub initial_goal: Vec2,
    pub final_goal: Vec2,
    /// The goal holds still while the step counter is at or below this
    pub warmup_steps: u32,
    /// Goal velocity is `goal_rate * kp * (final_goal - goal)`
    pub goal_rate: f64,
    /// Put the goal back at `initial_goal` on every reset. When false the
    /// goal carries over from the previous episode.
    pub rewind_on_reset: bool,
}

impl Default for LeaderSchedule {
    fn default() -> Self {
        Self {
            initial_goal: DEFAULT_LEADER_GOAL.into(),
            final_goal: DEFAULT_FINAL_GOAL.into(),
            warmup_steps: LEADER_WARMUP_STEPS,
            goal_rate: LEADER_GOAL_RATE,
            rewind_on_reset: false,
        }
    }
}

/// Moving goal tracked by the leader.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeaderGoal {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl LeaderGoal {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::zero(),
        }
    }

    /// Move the goal for the step numbered `step_count`.
    ///
    /// During warm-up the goal keeps its previous velocity and stays put.
    pub fn advance(&mut self, schedule: &LeaderSchedule, step_count: u32, kp: f64, dt: f64) {
        if step_count > schedule.warmup_steps {
            self.velocity = (schedule.final_goal - self.position) * (schedule.goal_rate * kp);
            self.position += self.velocity * dt;
        }
    }
}

// ============================================================================
// Controller
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct FormationController {
    gains: ControlGains,
}

impl FormationController {
    pub fn new(gains: ControlGains) -> Self {
        Self { gains }
    }

    pub fn gains(&self) -> &ControlGains {
        &self.gains
    }

    /// PD tracking of the goal: `s*kp*(goal - p) + kd*(goal_vel - v)`.
    #[inline]
    pub fn leader_acceleration(&self, goal: &LeaderGoal, position: Vec2, velocity: Vec2) -> Vec2 {
        let g = &self.gains;
        (goal.position - position) * (g.leader_position_scale * g.kp)
            + (goal.velocity - velocity) * g.kd
    }

    /// Consensus over neighbors `j` of agent `i`:
    /// `sum -kp*((p_i - p_j) + (ref_i - ref_j)) - kd*(v_i - v_j)`.
    pub fn follower_acceleration(
        &self,
        i: usize,
        positions: &[Vec2],
        velocities: &[Vec2],
        graph: &FormationGraph,
    ) -> Vec2 {
        let g = &self.gains;
        let ref_i = graph.reference(i);
        graph.neighbors(i).fold(Vec2::zero(), |acc, j| {
            let dp = positions[i] - positions[j];
            let dref = ref_i - graph.reference(j);
            let dv = velocities[i] - velocities[j];
            acc - (dp + dref) * g.kp - dv * g.kd
        })
    }

    /// Commanded acceleration for every agent, with the external action
    /// merged per `mode`.
    pub fn accelerations(
        &self,
        goal: &LeaderGoal,
        positions: &[Vec2],
        velocities: &[Vec2],
        graph: &FormationGraph,
        external: &[Vec2],
        mode: ActionMode,
    ) -> Vec<Vec2> {
        (0..positions.len())
            .map(|i| {
                let control = if i == 0 {
                    self.leader_acceleration(goal, positions[0], velocities[0])
                } else {
                    self.follower_acceleration(i, positions, velocities, graph)
                };
                let ext = external.get(i).copied().unwrap_or_default();
                mode.apply(control, ext)
            })
            .collect()
    }
}
