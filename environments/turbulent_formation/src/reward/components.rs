//! Built-in reward components for formation keeping.

use super::RewardComponent;
use crate::formation::FormationGraph;
use crate::state::FormationState;
use crate::types::Vec2;

// ============================================================================
// Formation Shape Error
// ============================================================================

/// Sum over agents `i` and neighbors `j` of
/// `||p_i - p_j|| - ||ref_i - ref_j||`.
///
/// Each undirected edge is visited from both ends and so counts twice.
/// The value is signed: stretched edges add, compressed edges subtract.
pub fn formation_error(positions: &[Vec2], graph: &FormationGraph) -> f64 {
    (0..positions.len())
        .flat_map(|i| graph.neighbors(i).map(move |j| (i, j)))
        .map(|(i, j)| {
            (positions[i] - positions[j]).norm() - (graph.reference(i) - graph.reference(j)).norm()
        })
        .sum()
}

/// `reward += weight * formation_error`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormationShapeError {
    pub weight: f64,
}

impl Default for FormationShapeError {
    fn default() -> Self {
        Self { weight: 1.0 }
    }
}

impl RewardComponent for FormationShapeError {
    const NAME: &'static str = "FormationShapeError";

    #[inline]
    fn compute(&self, state: &FormationState, graph: &FormationGraph) -> f64 {
        if self.weight == 0.0 {
            return 0.0;
        }
        self.weight * formation_error(&state.positions, graph)
    }
}

// ============================================================================
// Leader Goal Error
// ============================================================================

/// Penalizes leader distance from its goal.
///
/// `reward -= weight * ||p_0 - goal||`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeaderGoalError {
    pub weight: f64,
}

impl RewardComponent for LeaderGoalError {
    const NAME: &'static str = "LeaderGoalError";

    #[inline]
    fn compute(&self, state: &FormationState, _graph: &FormationGraph) -> f64 {
        match state.positions.first() {
            Some(leader) if self.weight != 0.0 => {
                -self.weight * (*leader - state.leader_goal.position).norm()
            }
            _ => 0.0,
        }
    }
}
