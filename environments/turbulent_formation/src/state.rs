//! Mutable per-episode state of the formation.

use crate::constants::OBS_PER_AGENT;
use crate::control::{LeaderGoal, LeaderSchedule};
use crate::types::{Bounds, SimRng, Vec2};

/// Lifecycle of one environment instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EpisodePhase {
    /// Constructed, never reset
    #[default]
    Uninitialized,
    /// Reset, no step taken yet
    Ready,
    Running,
    /// Step limit reached; only `reset` is accepted
    Done,
}

#[derive(Clone, Debug)]
pub struct FormationState {
    /// World positions (m), agent 0 is the leader
    pub positions: Vec<Vec2>,
    /// World velocities (m/s)
    pub velocities: Vec<Vec2>,
    pub leader_goal: LeaderGoal,
    /// Steps taken this episode
    pub step_count: u32,
    /// Sum of rewards this episode
    pub episode_return: f64,
    pub phase: EpisodePhase,
}

impl FormationState {
    pub fn new(num_agents: usize, schedule: &LeaderSchedule) -> Self {
        Self {
            positions: vec![Vec2::zero(); num_agents],
            velocities: vec![Vec2::zero(); num_agents],
            leader_goal: LeaderGoal::at(schedule.initial_goal),
            step_count: 0,
            episode_return: 0.0,
            phase: EpisodePhase::Uninitialized,
        }
    }

    #[inline]
    pub fn num_agents(&self) -> usize {
        self.positions.len()
    }

    /// Scatter agents uniformly in `bounds` at rest. The leader goal is
    /// rewound only when the schedule asks for it.
    pub fn reset(&mut self, bounds: &Bounds, schedule: &LeaderSchedule, rng: &mut SimRng) {
        for p in &mut self.positions {
            *p = bounds.sample(rng);
        }
        self.velocities.fill(Vec2::zero());
        if schedule.rewind_on_reset {
            self.leader_goal = LeaderGoal::at(schedule.initial_goal);
        }
        self.step_count = 0;
        self.episode_return = 0.0;
        self.phase = EpisodePhase::Ready;
    }

    /// Elapsed simulation time at the current step.
    #[inline]
    pub fn sim_time(&self, dt: f64) -> f64 {
        self.step_count as f64 * dt
    }

    /// Flattened positions `[x0, y0, x1, y1, ...]`.
    pub fn observation(&self) -> Vec<f64> {
        let mut obs = vec![0.0; self.num_agents() * OBS_PER_AGENT];
        self.write_observation(&mut obs);
        obs
    }

    /// Write flattened positions into `buffer`.
    pub fn write_observation(&self, buffer: &mut [f64]) {
        for (chunk, p) in buffer.chunks_exact_mut(OBS_PER_AGENT).zip(&self.positions) {
            chunk[0] = p.x;
            chunk[1] = p.y;
        }
    }
}
