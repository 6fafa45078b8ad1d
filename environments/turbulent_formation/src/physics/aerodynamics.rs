//! Aerodynamic effects on a spherical agent.
//!
//! Implements:
//! - Quadratic drag from the wind seen by the agent
//! - Dynamic and total (stagnation) pressure

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::types::Vec2;

/// Body and air properties entering the drag law.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AeroParams {
    /// Air density (kg/m^3)
    pub air_density: f64,
    pub drag_coeff: f64,
    /// Reference area (m^2)
    pub area: f64,
    /// Agent mass (kg)
    pub mass: f64,
    /// Ambient pressure (Pa)
    pub static_pressure: f64,
}

impl Default for AeroParams {
    fn default() -> Self {
        Self {
            air_density: AIR_DENSITY,
            drag_coeff: DRAG_COEFF,
            area: REFERENCE_AREA,
            mass: AGENT_MASS,
            static_pressure: STATIC_PRESSURE,
        }
    }
}

impl AeroParams {
    /// `0.5 * rho * c_d * A / m`; multiply by `|v_rel| * v_rel` for acceleration.
    #[inline]
    pub fn drag_factor(&self) -> f64 {
        0.5 * self.air_density * self.drag_coeff * self.area / self.mass
    }

    /// Acceleration imparted by the relative wind.
    ///
    /// Points along `v_rel` and scales with its squared magnitude.
    #[inline(always)]
    pub fn drag_acceleration(&self, v_rel: Vec2) -> Vec2 {
        v_rel * (self.drag_factor() * v_rel.norm())
    }

    /// `0.5 * rho * |v_rel|^2` (Pa)
    #[inline(always)]
    pub fn dynamic_pressure(&self, v_rel: Vec2) -> f64 {
        0.5 * self.air_density * v_rel.norm_squared()
    }

    /// Static plus dynamic pressure (Pa)
    #[inline(always)]
    pub fn total_pressure(&self, v_rel: Vec2) -> f64 {
        self.static_pressure + self.dynamic_pressure(v_rel)
    }
}

/// Wind as seen from an agent moving with `velocity`.
#[inline(always)]
pub fn relative_wind(wind: Vec2, velocity: Vec2) -> Vec2 {
    wind - velocity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn still_air_and_still_agent_feel_nothing() {
        let aero = AeroParams::default();
        assert_eq!(aero.drag_acceleration(Vec2::zero()), Vec2::zero());
        assert_eq!(aero.total_pressure(Vec2::zero()), STATIC_PRESSURE);
    }

    #[test]
    fn moving_agent_sees_headwind() {
        let v_rel = relative_wind(Vec2::zero(), Vec2::new(2.0, 0.0));
        assert_eq!(v_rel, Vec2::new(-2.0, 0.0));
        assert!(AeroParams::default().drag_acceleration(v_rel).x < 0.0);
    }
}
