//! Wind disturbance fields.
//!
//! A field maps query points and a simulation time to one wind vector per
//! point. Three models are provided:
//!
//! - [`CalmField`] - still air
//! - [`VortexField`] - superposition of randomly placed point vortices
//! - [`PrecomputedField`] - trilinear sampling of stored fluid simulations
//!
//! [`Turbulence`] selects one of them from configuration. Custom fields plug
//! into the environment through the [`DisturbanceField`] trait.

pub mod catalog;
pub mod precomputed;
pub mod vortex;

pub use catalog::*;
pub use precomputed::*;
pub use vortex::*;

use std::sync::Arc;

use crate::config::{FormationConfig, TurbulenceModel};
use crate::error::{FormationError, Result};
use crate::types::{SimRng, Vec2};

/// A wind field the environment can query.
pub trait DisturbanceField {
    /// Short identifier for logging.
    fn name(&self) -> &'static str;

    /// Prepare for a new episode (redraw vortices, pick a simulation, ...).
    fn reset(&mut self, rng: &mut SimRng) -> Result<()>;

    /// Wind at each point at simulation time `time`.
    fn sample(&mut self, points: &[Vec2], time: f64, rng: &mut SimRng) -> Result<Vec<Vec2>>;
}

// ============================================================================
// Calm
// ============================================================================

/// Zero wind everywhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct CalmField;

impl DisturbanceField for CalmField {
    fn name(&self) -> &'static str {
        "calm"
    }

    fn reset(&mut self, _rng: &mut SimRng) -> Result<()> {
        Ok(())
    }

    fn sample(&mut self, points: &[Vec2], _time: f64, _rng: &mut SimRng) -> Result<Vec<Vec2>> {
        Ok(vec![Vec2::zero(); points.len()])
    }
}

impl DisturbanceField for VortexField {
    fn name(&self) -> &'static str {
        "random"
    }

    fn reset(&mut self, rng: &mut SimRng) -> Result<()> {
        self.reseed(rng);
        Ok(())
    }

    fn sample(&mut self, points: &[Vec2], _time: f64, rng: &mut SimRng) -> Result<Vec<Vec2>> {
        self.prepare_query(rng);
        Ok(points.iter().map(|p| self.velocity_at(*p)).collect())
    }
}

impl DisturbanceField for PrecomputedField {
    fn name(&self) -> &'static str {
        "precomputed"
    }

    fn reset(&mut self, rng: &mut SimRng) -> Result<()> {
        self.select(rng)
    }

    fn sample(&mut self, points: &[Vec2], time: f64, _rng: &mut SimRng) -> Result<Vec<Vec2>> {
        PrecomputedField::sample(self, points, time)
    }
}

// ============================================================================
// Configured Turbulence
// ============================================================================

/// The field chosen by `turbulence_model`.
#[derive(Debug, Clone)]
pub enum Turbulence {
    Calm(CalmField),
    Random(VortexField),
    Precomputed(PrecomputedField),
}

impl Turbulence {
    /// Build the configured field.
    ///
    /// For the precomputed model, `catalog` is used when given; otherwise
    /// the catalog is opened from `turbulence_base_folder`.
    pub fn from_config(config: &FormationConfig, catalog: Option<SharedCatalog>) -> Result<Self> {
        match config.turbulence_model {
            TurbulenceModel::Calm => Ok(Self::Calm(CalmField)),
            TurbulenceModel::Random => Ok(Self::Random(VortexField::new(
                config.bounds,
                config.num_vortices,
                config.vortex_reseed,
            ))),
            TurbulenceModel::Precomputed => {
                let catalog = match catalog {
                    Some(catalog) => catalog,
                    None => {
                        let folder = config.turbulence_base_folder.as_ref().ok_or_else(|| {
                            FormationError::invalid_config(
                                "turbulence_base_folder",
                                "required by the precomputed turbulence model",
                            )
                        })?;
                        Arc::new(SimulationCatalog::open(folder)?)
                    }
                };
                Ok(Self::Precomputed(PrecomputedField::new(catalog, config.bounds)))
            }
        }
    }
}

impl DisturbanceField for Turbulence {
    fn name(&self) -> &'static str {
        match self {
            Self::Calm(f) => f.name(),
            Self::Random(f) => f.name(),
            Self::Precomputed(f) => f.name(),
        }
    }

    fn reset(&mut self, rng: &mut SimRng) -> Result<()> {
        match self {
            Self::Calm(f) => f.reset(rng),
            Self::Random(f) => f.reset(rng),
            Self::Precomputed(f) => f.reset(rng),
        }
    }

    fn sample(&mut self, points: &[Vec2], time: f64, rng: &mut SimRng) -> Result<Vec<Vec2>> {
        match self {
            Self::Calm(f) => f.sample(points, time, rng),
            Self::Random(f) => DisturbanceField::sample(f, points, time, rng),
            Self::Precomputed(f) => DisturbanceField::sample(f, points, time, rng),
        }
    }
}
