//! Formation reward with compile-time composition.
//!
//! Components implement [`RewardComponent`] and compose through tuples:
//!
//! ```ignore
//! use turbulent_formation_env::reward::*;
//!
//! let reward = (
//!     FormationShapeError { weight: 1.0 },
//!     LeaderGoalError { weight: 0.1 },
//! );
//! ```
//!
//! # Built-in Components
//!
//! - [`FormationShapeError`] - edge length deviation from the reference shape
//! - [`LeaderGoalError`] - leader distance from its moving goal

pub mod components;

pub use components::*;

use crate::formation::FormationGraph;
use crate::state::FormationState;

/// Trait for reward components that can be composed at compile-time.
pub trait RewardComponent: Clone + Send + Sync {
    /// Human-readable name for logging/debugging.
    const NAME: &'static str;

    /// Reward contribution for the current state.
    fn compute(&self, state: &FormationState, graph: &FormationGraph) -> f64;
}

// ============================================================================
// Tuple Implementations
// ============================================================================

/// Empty tuple - base case for composition.
impl RewardComponent for () {
    const NAME: &'static str = "Empty";

    #[inline(always)]
    fn compute(&self, _state: &FormationState, _graph: &FormationGraph) -> f64 {
        0.0
    }
}

impl<A: RewardComponent, B: RewardComponent> RewardComponent for (A, B) {
    const NAME: &'static str = "Composed2";

    #[inline(always)]
    fn compute(&self, state: &FormationState, graph: &FormationGraph) -> f64 {
        self.0.compute(state, graph) + self.1.compute(state, graph)
    }
}

impl<A: RewardComponent, B: RewardComponent, C: RewardComponent> RewardComponent for (A, B, C) {
    const NAME: &'static str = "Composed3";

    #[inline(always)]
    fn compute(&self, state: &FormationState, graph: &FormationGraph) -> f64 {
        self.0.compute(state, graph) + self.1.compute(state, graph) + self.2.compute(state, graph)
    }
}
