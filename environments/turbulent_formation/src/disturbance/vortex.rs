//! Analytic wind from a superposition of point vortices.
//!
//! Each center `s_k` with spin `d_k = ±1` contributes
//! `d_k * W * perp(s_k - q) / |s_k - q|^2` at query `q`, where `W` is the
//! arena width. A query on top of a center divides by zero and yields a
//! non-finite velocity; that is passed through unchanged.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{Bounds, SimRng, Vec2};

/// When vortex centers are redrawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReseedPolicy {
    /// Once per episode, on reset
    #[default]
    PerEpisode,
    /// Before every query, so the field is spatially random each step
    PerQuery,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vortex {
    pub center: Vec2,
    /// +1 counter-clockwise, -1 clockwise
    pub spin: f64,
}

#[derive(Clone, Debug)]
pub struct VortexField {
    bounds: Bounds,
    num_vortices: usize,
    policy: ReseedPolicy,
    vortices: Vec<Vortex>,
}

impl VortexField {
    /// Empty field; centers are drawn on the first reset or query.
    pub fn new(bounds: Bounds, num_vortices: usize, policy: ReseedPolicy) -> Self {
        Self {
            bounds,
            num_vortices,
            policy,
            vortices: Vec::with_capacity(num_vortices),
        }
    }

    /// Field with fixed vortices. Under `PerEpisode` they persist until the
    /// next reset.
    pub fn with_vortices(bounds: Bounds, vortices: Vec<Vortex>, policy: ReseedPolicy) -> Self {
        Self {
            bounds,
            num_vortices: vortices.len(),
            policy,
            vortices,
        }
    }

    pub fn vortices(&self) -> &[Vortex] {
        &self.vortices
    }

    /// Draw fresh centers uniformly in bounds with random spins.
    pub fn reseed(&mut self, rng: &mut SimRng) {
        let bounds = self.bounds;
        self.vortices.clear();
        self.vortices.extend((0..self.num_vortices).map(|_| Vortex {
            center: bounds.sample(rng),
            spin: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
        }));
    }

    /// Wind at one point from the current vortices.
    pub fn velocity_at(&self, query: Vec2) -> Vec2 {
        let strength = self.bounds.width();
        self.vortices.iter().fold(Vec2::zero(), |acc, v| {
            let d = v.center - query;
            acc + d.perp() * (v.spin * strength / d.norm_squared())
        })
    }

    pub(crate) fn prepare_query(&mut self, rng: &mut SimRng) {
        if self.policy == ReseedPolicy::PerQuery || self.vortices.is_empty() {
            self.reseed(rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn reseed_draws_configured_count_inside_bounds() {
        let bounds = Bounds::default();
        let mut field = VortexField::new(bounds, 5, ReseedPolicy::PerEpisode);
        let mut rng = SimRng::seed_from_u64(11);
        field.reseed(&mut rng);
        assert_eq!(field.vortices().len(), 5);
        for v in field.vortices() {
            assert!(bounds.contains(v.center));
            assert!(v.spin == 1.0 || v.spin == -1.0);
        }
    }

    #[test]
    fn single_vortex_matches_closed_form() {
        let bounds = Bounds::default();
        let field = VortexField::with_vortices(
            bounds,
            vec![Vortex {
                center: Vec2::new(1.0, 0.0),
                spin: 1.0,
            }],
            ReseedPolicy::PerEpisode,
        );
        // d = (1,0), perp(d) = (0,1), |d|^2 = 1, W = 10
        assert_eq!(field.velocity_at(Vec2::zero()), Vec2::new(0.0, 10.0));
    }
}
