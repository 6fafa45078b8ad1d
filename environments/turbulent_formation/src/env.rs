//! Formation environment: reset/step state machine over the controller,
//! the wind field and the integrator.
//!
//! One step:
//! 1. wind is sampled at the current positions for `t = step_count * dt`
//! 2. the leader goal advances (after warm-up)
//! 3. the control law produces accelerations, merged with the action
//! 4. drag from the relative wind is added and the agents are integrated
//! 5. the reward is evaluated on the new positions and the counter advances

use rand::SeedableRng;
use tracing::{debug, info, trace};

use crate::config::FormationConfig;
use crate::constants::{ACTION_PER_AGENT, OBS_PER_AGENT};
use crate::control::FormationController;
use crate::disturbance::{DisturbanceField, SharedCatalog, Turbulence};
use crate::error::{FormationError, Result};
use crate::formation::FormationGraph;
use crate::physics::{integrate_agents, relative_wind, AeroParams};
use crate::reward::{FormationShapeError, RewardComponent};
use crate::state::{EpisodePhase, FormationState};
use crate::termination::{check_termination, TerminationResult};
use crate::types::{BoxSpace, SimRng, Vec2};

// ============================================================================
// Step Output
// ============================================================================

/// Diagnostics for one step, one entry per agent where applicable.
#[derive(Clone, Debug, PartialEq)]
pub struct StepInfo {
    /// Simulation time at which the wind was sampled (s)
    pub sim_time: f64,
    /// Steps taken including this one
    pub step: u32,
    /// Wind at each agent before the update
    pub wind: Vec<Vec2>,
    /// Wind minus agent velocity before the update
    pub relative_wind: Vec<Vec2>,
    /// Dynamic pressure (Pa)
    pub dynamic_pressure: Vec<f64>,
    /// Static plus dynamic pressure (Pa)
    pub total_pressure: Vec<f64>,
    /// Leader goal after this step's advance
    pub leader_goal: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    /// Flattened positions `[x0, y0, x1, y1, ...]`
    pub observation: Vec<f64>,
    pub reward: f64,
    pub done: bool,
    pub termination: TerminationResult,
    pub info: StepInfo,
}

// ============================================================================
// Environment
// ============================================================================

/// Multi-agent formation flight in a wind field.
///
/// Generic over the wind field `D` and the reward `R`. The defaults are the
/// configured [`Turbulence`] and the signed formation shape error.
pub struct FormationEnv<
    D: DisturbanceField = Turbulence,
    R: RewardComponent = FormationShapeError,
> {
    config: FormationConfig,
    graph: FormationGraph,
    controller: FormationController,
    aero: AeroParams,
    disturbance: D,
    reward_fn: R,
    state: FormationState,
    rng: SimRng,
}

impl FormationEnv {
    /// Create the environment described by `config`.
    pub fn from_config(config: FormationConfig) -> Result<Self> {
        config.validate()?;
        let disturbance = Turbulence::from_config(&config, None)?;
        Self::with_components(config, disturbance, FormationShapeError::default())
    }

    /// Create the environment on a shared simulation catalog.
    ///
    /// The catalog's folder stands in for `turbulence_base_folder` when the
    /// config leaves it unset.
    pub fn from_config_with_catalog(
        mut config: FormationConfig,
        catalog: SharedCatalog,
    ) -> Result<Self> {
        if config.turbulence_base_folder.is_none() {
            config.turbulence_base_folder = Some(catalog.base_folder().to_path_buf());
        }
        config.validate()?;
        let disturbance = Turbulence::from_config(&config, Some(catalog))?;
        Self::with_components(config, disturbance, FormationShapeError::default())
    }
}

impl<D: DisturbanceField, R: RewardComponent> FormationEnv<D, R> {
    /// Assemble the environment from an explicit wind field and reward.
    ///
    /// `turbulence_model` is ignored; `disturbance` is used as given. The
    /// rest of the config is validated as in [`FormationEnv::from_config`].
    pub fn with_components(config: FormationConfig, disturbance: D, reward_fn: R) -> Result<Self> {
        config.validate_simulation()?;
        let graph = FormationGraph::new(&config.formation)?;
        let rng = match config.seed {
            Some(seed) => SimRng::seed_from_u64(seed),
            None => SimRng::from_entropy(),
        };

        Ok(Self {
            controller: FormationController::new(config.gains),
            aero: config.aero,
            state: FormationState::new(graph.num_agents(), &config.leader),
            graph,
            disturbance,
            reward_fn,
            rng,
            config,
        })
    }

    /// Swap the reward, keeping everything else.
    pub fn with_reward_fn<R2: RewardComponent>(self, reward_fn: R2) -> FormationEnv<D, R2> {
        FormationEnv {
            config: self.config,
            graph: self.graph,
            controller: self.controller,
            aero: self.aero,
            disturbance: self.disturbance,
            reward_fn,
            state: self.state,
            rng: self.rng,
        }
    }

    pub fn config(&self) -> &FormationConfig {
        &self.config
    }

    pub fn state(&self) -> &FormationState {
        &self.state
    }

    /// Mutable state, for placing agents in tests and scripted scenarios.
    pub fn state_mut(&mut self) -> &mut FormationState {
        &mut self.state
    }

    pub fn graph(&self) -> &FormationGraph {
        &self.graph
    }

    pub fn disturbance(&self) -> &D {
        &self.disturbance
    }

    pub fn phase(&self) -> EpisodePhase {
        self.state.phase
    }

    pub fn num_agents(&self) -> usize {
        self.graph.num_agents()
    }

    /// Elapsed simulation time of the next step.
    pub fn sim_time(&self) -> f64 {
        self.state.sim_time(self.config.dt)
    }

    /// Flattened agent positions, bounded by the arena's x extent.
    pub fn observation_space(&self) -> BoxSpace {
        let b = &self.config.bounds;
        BoxSpace::new(b.x_min, b.x_max, self.num_agents() * OBS_PER_AGENT)
    }

    /// One external acceleration per agent.
    pub fn action_space(&self) -> BoxSpace {
        let b = &self.config.bounds;
        BoxSpace::new(b.x_min, b.x_max, self.num_agents() * ACTION_PER_AGENT)
    }

    /// Start a new episode and return the initial observation.
    pub fn reset(&mut self) -> Result<Vec<f64>> {
        self.disturbance.reset(&mut self.rng)?;
        self.state.reset(&self.config.bounds, &self.config.leader, &mut self.rng);
        debug!(
            turbulence = self.disturbance.name(),
            agents = self.num_agents(),
            "environment reset"
        );
        Ok(self.state.observation())
    }

    /// Reseed the generator, then [`Self::reset`].
    pub fn reset_with_seed(&mut self, seed: u64) -> Result<Vec<f64>> {
        self.rng = SimRng::seed_from_u64(seed);
        self.reset()
    }

    /// Wind at arbitrary points and time from the active field.
    pub fn query_disturbance(&mut self, points: &[Vec2], time: f64) -> Result<Vec<Vec2>> {
        self.disturbance.sample(points, time, &mut self.rng)
    }

    /// Advance one timestep.
    ///
    /// `action` holds `2 * num_agents` external accelerations, combined with
    /// the control law per the configured action mode. Fails before the
    /// first reset, after the episode is done, and when the wind field
    /// cannot be sampled; in every failure case the state is left unchanged.
    pub fn step(&mut self, action: &[f64]) -> Result<StepOutcome> {
        match self.state.phase {
            EpisodePhase::Uninitialized => return Err(FormationError::NotReset),
            EpisodePhase::Done => {
                return Err(FormationError::EpisodeFinished {
                    steps: self.state.step_count,
                })
            }
            EpisodePhase::Ready | EpisodePhase::Running => {}
        }

        let expected = self.num_agents() * ACTION_PER_AGENT;
        if action.len() != expected {
            return Err(FormationError::ActionDimensionMismatch {
                expected,
                actual: action.len(),
            });
        }

        let dt = self.config.dt;
        let sim_time = self.state.sim_time(dt);
        let wind = self
            .disturbance
            .sample(&self.state.positions, sim_time, &mut self.rng)?;

        self.state.leader_goal.advance(
            &self.config.leader,
            self.state.step_count,
            self.controller.gains().kp,
            dt,
        );

        let external: Vec<Vec2> = action
            .chunks_exact(ACTION_PER_AGENT)
            .map(|a| Vec2::new(a[0], a[1]))
            .collect();
        let commanded = self.controller.accelerations(
            &self.state.leader_goal,
            &self.state.positions,
            &self.state.velocities,
            &self.graph,
            &external,
            self.config.action_mode,
        );

        let rel: Vec<Vec2> = wind
            .iter()
            .zip(&self.state.velocities)
            .map(|(w, v)| relative_wind(*w, *v))
            .collect();
        let drag: Vec<Vec2> = rel.iter().map(|r| self.aero.drag_acceleration(*r)).collect();

        integrate_agents(
            &mut self.state.positions,
            &mut self.state.velocities,
            &commanded,
            &drag,
            dt,
        );

        let reward = self.reward_fn.compute(&self.state, &self.graph);
        self.state.step_count += 1;
        self.state.episode_return += reward;

        let termination = check_termination(&self.state, self.config.max_steps);
        self.state.phase = if termination.done() {
            EpisodePhase::Done
        } else {
            EpisodePhase::Running
        };

        trace!(step = self.state.step_count, sim_time, reward, "step");
        if termination.done() {
            info!(
                steps = self.state.step_count,
                episode_return = self.state.episode_return,
                turbulence = self.disturbance.name(),
                "episode finished"
            );
        }

        let info = StepInfo {
            sim_time,
            step: self.state.step_count,
            dynamic_pressure: rel.iter().map(|r| self.aero.dynamic_pressure(*r)).collect(),
            total_pressure: rel.iter().map(|r| self.aero.total_pressure(*r)).collect(),
            relative_wind: rel,
            wind,
            leader_goal: self.state.leader_goal.position,
        };

        Ok(StepOutcome {
            observation: self.state.observation(),
            reward,
            done: termination.done(),
            termination,
            info,
        })
    }
}
