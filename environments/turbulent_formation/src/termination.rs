//! Episode termination and truncation checking.
//!
//! Formation episodes have no failure condition; they end only when the
//! step limit is reached.

use crate::state::FormationState;

// ============================================================================
// Termination Result
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TerminationResult {
    /// True if episode ended due to failure
    pub terminal: bool,
    /// True if episode ended due to time limit
    pub truncated: bool,
}

impl TerminationResult {
    /// Episode is done (either terminal or truncated).
    #[inline]
    pub fn done(&self) -> bool {
        self.terminal || self.truncated
    }
}

/// Step limit reached.
#[inline]
pub fn check_truncated(step_count: u32, max_steps: u32) -> bool {
    step_count >= max_steps
}

/// Combined check after a step has been counted.
#[inline]
pub fn check_termination(state: &FormationState, max_steps: u32) -> TerminationResult {
    TerminationResult {
        terminal: false,
        truncated: check_truncated(state.step_count, max_steps),
    }
}
