//! Physics for point-mass agents in moving air.
//!
//! Contains:
//! - Aerodynamic drag and pressure from the relative wind
//! - Semi-implicit Euler integration of the agent states

pub mod aerodynamics;
pub mod dynamics;

pub use aerodynamics::*;
pub use dynamics::*;
