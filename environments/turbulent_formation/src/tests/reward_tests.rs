//! Reward tests: formation shape error and component composition.

use proptest::prelude::*;

use crate::control::LeaderSchedule;
use crate::formation::{FormationGraph, FormationLayout};
use crate::reward::*;
use crate::state::FormationState;
use crate::types::Vec2;

// ============================================================================
// Helper Functions
// ============================================================================

fn state_at(positions: &[Vec2]) -> FormationState {
    let mut state = FormationState::new(positions.len(), &LeaderSchedule::default());
    state.positions.copy_from_slice(positions);
    state
}

fn reference_positions(graph: &FormationGraph, offset: Vec2) -> Vec<Vec2> {
    (0..graph.num_agents()).map(|i| graph.reference(i) + offset).collect()
}

// ============================================================================
// Formation Shape Error
// ============================================================================

#[test]
fn should_be_zero_in_reference_shape() {
    let graph = FormationGraph::triangle();
    let state = state_at(&reference_positions(&graph, Vec2::zero()));
    assert!(FormationShapeError::default().compute(&state, &graph).abs() < 1e-12);
}

proptest! {
    #[test]
    fn should_be_zero_for_any_translation_of_reference_shape(
        dx in -100.0f64..100.0,
        dy in -100.0f64..100.0,
    ) {
        let graph = FormationGraph::triangle();
        let state = state_at(&reference_positions(&graph, Vec2::new(dx, dy)));
        prop_assert!(FormationShapeError::default().compute(&state, &graph).abs() < 1e-9);
    }

    #[test]
    fn should_be_zero_for_any_translation_of_longer_chain(
        dx in -10.0f64..10.0,
        dy in -10.0f64..10.0,
    ) {
        let layout = FormationLayout {
            reference: vec![
                Vec2::zero(),
                Vec2::new(1.0, 0.0),
                Vec2::new(2.0, 1.0),
                Vec2::new(0.0, 3.0),
            ],
            edges: vec![[0, 1], [1, 2], [2, 3]],
        };
        let graph = FormationGraph::new(&layout).unwrap();
        let state = state_at(&reference_positions(&graph, Vec2::new(dx, dy)));
        prop_assert!(formation_error(&state.positions, &graph).abs() < 1e-9);
    }
}

#[test]
fn should_count_every_edge_from_both_ends() {
    let graph = FormationGraph::triangle();
    // doubling the shape stretches every edge by its reference length
    let positions: Vec<Vec2> = (0..3).map(|i| graph.reference(i) * 2.0).collect();
    let reference_perimeter: f64 = graph
        .edges()
        .map(|(a, b)| (graph.reference(a) - graph.reference(b)).norm())
        .sum();

    let reward = formation_error(&positions, &graph);
    assert!((reward - 2.0 * reference_perimeter).abs() < 1e-12);
}

#[test]
fn should_be_negative_when_compressed() {
    let graph = FormationGraph::triangle();
    let state = state_at(&[Vec2::zero(); 3]);
    let reward = FormationShapeError::default().compute(&state, &graph);
    assert!(reward < 0.0, "collapsed formation should score below zero, got {reward}");
}

#[test]
fn should_scale_with_weight() {
    let graph = FormationGraph::triangle();
    let state = state_at(&[Vec2::zero(), Vec2::new(3.0, 0.0), Vec2::new(0.0, 2.0)]);
    let unit = FormationShapeError { weight: 1.0 }.compute(&state, &graph);
    let half = FormationShapeError { weight: 0.5 }.compute(&state, &graph);
    assert!((half - 0.5 * unit).abs() < 1e-12);
    assert_eq!(FormationShapeError { weight: 0.0 }.compute(&state, &graph), 0.0);
}

// ============================================================================
// Leader Goal Error
// ============================================================================

#[test]
fn should_penalize_leader_distance_from_goal() {
    let graph = FormationGraph::triangle();
    let mut state = state_at(&[Vec2::new(5.0, 6.0), Vec2::zero(), Vec2::zero()]);
    state.leader_goal.position = Vec2::new(2.0, 2.0);

    let reward = LeaderGoalError { weight: 2.0 }.compute(&state, &graph);
    assert!((reward + 10.0).abs() < 1e-12);
}

// ============================================================================
// Composition
// ============================================================================

#[test]
fn should_sum_tuple_components() {
    let graph = FormationGraph::triangle();
    let mut state = state_at(&[Vec2::new(1.0, 1.0), Vec2::new(4.0, 0.0), Vec2::new(-1.0, 2.0)]);
    state.leader_goal.position = Vec2::zero();

    let shape = FormationShapeError::default();
    let leader = LeaderGoalError { weight: 0.3 };
    let composed = (shape, leader);

    let expected = shape.compute(&state, &graph) + leader.compute(&state, &graph);
    assert!((composed.compute(&state, &graph) - expected).abs() < 1e-12);
    assert_eq!(().compute(&state, &graph), 0.0);
    assert_eq!(<(FormationShapeError, LeaderGoalError)>::NAME, "Composed2");
}
