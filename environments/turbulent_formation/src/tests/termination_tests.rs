//! Termination tests: episodes end only at the step limit.

use crate::control::LeaderSchedule;
use crate::state::FormationState;
use crate::termination::{check_termination, check_truncated, TerminationResult};
use crate::types::Vec2;

#[test]
fn should_not_truncate_before_limit() {
    assert!(!check_truncated(0, 450));
    assert!(!check_truncated(449, 450));
}

#[test]
fn should_truncate_at_limit() {
    assert!(check_truncated(450, 450));
    assert!(check_truncated(451, 450));
}

#[test]
fn should_never_report_terminal_failure() {
    let mut state = FormationState::new(3, &LeaderSchedule::default());
    // far outside any arena
    state.positions[0] = Vec2::new(1e6, -1e6);
    state.step_count = 450;

    let result = check_termination(&state, 450);
    assert!(!result.terminal);
    assert!(result.truncated);
    assert!(result.done());
}

#[test]
fn should_combine_flags_in_done() {
    let none = TerminationResult::default();
    assert!(!none.done());
    let terminal = TerminationResult { terminal: true, truncated: false };
    assert!(terminal.done());
}
