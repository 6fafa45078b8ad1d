//! Agent state integration.
//!
//! Semi-implicit Euler, agents in index order: position advances with the
//! velocity from before the step, then velocity takes the summed
//! acceleration.

use crate::types::Vec2;

/// Advance one agent by `dt`.
#[inline(always)]
pub fn integrate_agent(position: &mut Vec2, velocity: &mut Vec2, acceleration: Vec2, dt: f64) {
    *position += *velocity * dt;
    *velocity += acceleration * dt;
}

/// Advance every agent by `dt` under commanded plus wind accelerations.
///
/// All slices must have the same length.
pub fn integrate_agents(
    positions: &mut [Vec2],
    velocities: &mut [Vec2],
    commanded: &[Vec2],
    wind: &[Vec2],
    dt: f64,
) {
    debug_assert_eq!(positions.len(), velocities.len());
    debug_assert_eq!(positions.len(), commanded.len());
    debug_assert_eq!(positions.len(), wind.len());

    for (((p, v), a), w) in positions
        .iter_mut()
        .zip(velocities.iter_mut())
        .zip(commanded)
        .zip(wind)
    {
        integrate_agent(p, v, *a + *w, dt);
    }
}
