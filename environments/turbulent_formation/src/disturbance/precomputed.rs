//! Wind sampled from stored fluid-simulation frames.
//!
//! A simulation is a sequence of velocity frames on a regular grid spanning
//! the arena. Queries interpolate trilinearly: bilinear inside the two frames
//! that bracket the query time, then linear between them. Grid corners sit
//! exactly on the arena edges and points outside the arena take the nearest
//! edge value.
//!
//! Frame layout is `[row][col]` with `rows` the first resolution field of the
//! simulation name. Rows are addressed by the query's y coordinate and
//! columns by its x coordinate, the layout the fluid solver writes.

use std::sync::Arc;

use tracing::debug;

use crate::disturbance::catalog::SharedCatalog;
use crate::error::{FormationError, Result};
use crate::types::{Bounds, SimRng, Vec2};

// ============================================================================
// Simulation Data
// ============================================================================

/// One loaded simulation: timestamps plus SoA velocity frames.
#[derive(Clone, Debug)]
pub struct SimulationData {
    name: String,
    rows: usize,
    cols: usize,
    times: Vec<f64>,
    /// `[frame][row][col]`
    ux: Vec<f64>,
    /// `[frame][row][col]`
    uy: Vec<f64>,
}

/// Frames bracketing a query time and the blend weight toward `right`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeBracket {
    pub left: usize,
    pub right: usize,
    pub weight: f64,
}

impl SimulationData {
    /// Validate shapes and timestamp order.
    ///
    /// `ux` and `uy` hold `times.len()` frames of `rows * cols` values each.
    /// Timestamps must be strictly increasing.
    pub fn new(
        name: impl Into<String>,
        rows: usize,
        cols: usize,
        times: Vec<f64>,
        ux: Vec<f64>,
        uy: Vec<f64>,
    ) -> Result<Self> {
        let name = name.into();
        if times.is_empty() {
            return Err(FormationError::EmptySimulation { name });
        }
        if rows == 0 || cols == 0 {
            return Err(FormationError::MalformedSimulationName { name });
        }
        let expected = times.len() * rows * cols;
        for (component, values) in [("ux", &ux), ("uy", &uy)] {
            if values.len() != expected {
                return Err(FormationError::ShapeMismatch {
                    file: format!("{name}/{component}"),
                    expected,
                    actual: values.len(),
                });
            }
        }
        if let Some(bad) = times.iter().position(|t| !t.is_finite()) {
            return Err(FormationError::NonMonotonicTimestamps { name, index: bad });
        }
        if let Some(bad) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(FormationError::NonMonotonicTimestamps { name, index: bad + 1 });
        }

        Ok(Self { name, rows, cols, times, ux, uy })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `(rows, cols)` of every frame.
    pub fn resolution(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn num_frames(&self) -> usize {
        self.times.len()
    }

    /// Timestamp of the last frame.
    pub fn max_time(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    #[inline(always)]
    fn node(&self, frame: usize, row: usize, col: usize) -> Vec2 {
        let idx = (frame * self.rows + row) * self.cols + col;
        Vec2::new(self.ux[idx], self.uy[idx])
    }

    /// Locate the frames around `time`.
    ///
    /// With `k` the first frame where `t_k >= time`, `left = max(k-1, 0)` and
    /// `right = left + 1` (or `left` for a single-frame simulation). Times
    /// before the first frame clamp to weight 0.
    pub fn bracket(&self, time: f64) -> Result<TimeBracket> {
        let max_time = self.max_time();
        // NaN fails this comparison too
        if !(time <= max_time) {
            return Err(FormationError::TimeOutOfRange { time, max_time });
        }

        let first_after = self.times.partition_point(|t| *t < time);
        let left = first_after.saturating_sub(1);
        let right = (left + 1).min(self.times.len() - 1);

        let weight = if right == left {
            0.0
        } else {
            let (t_l, t_r) = (self.times[left], self.times[right]);
            ((time - t_l) / (t_r - t_l)).clamp(0.0, 1.0)
        };

        Ok(TimeBracket { left, right, weight })
    }

    /// Bilinear sample of one frame at continuous grid coordinates,
    /// clamped to the grid.
    fn sample_frame(&self, frame: usize, row: f64, col: f64) -> Vec2 {
        let row = row.clamp(0.0, (self.rows - 1) as f64);
        let col = col.clamp(0.0, (self.cols - 1) as f64);

        let r0 = row.floor() as usize;
        let c0 = col.floor() as usize;
        let r1 = (r0 + 1).min(self.rows - 1);
        let c1 = (c0 + 1).min(self.cols - 1);
        let fr = row - r0 as f64;
        let fc = col - c0 as f64;

        let top = self.node(frame, r0, c0) * (1.0 - fc) + self.node(frame, r0, c1) * fc;
        let bottom = self.node(frame, r1, c0) * (1.0 - fc) + self.node(frame, r1, c1) * fc;
        top * (1.0 - fr) + bottom * fr
    }

    /// Wind at `point` for a bracket computed by [`Self::bracket`].
    pub fn sample_bracketed(&self, bounds: &Bounds, point: Vec2, bracket: TimeBracket) -> Vec2 {
        let unit = bounds.normalize(point);
        // align-corners: -1 maps to index 0, +1 to the last index
        let col = (unit.x + 1.0) * 0.5 * (self.cols - 1) as f64;
        let row = (unit.y + 1.0) * 0.5 * (self.rows - 1) as f64;

        let left = self.sample_frame(bracket.left, row, col);
        if bracket.weight == 0.0 {
            return left;
        }
        let right = self.sample_frame(bracket.right, row, col);
        left * (1.0 - bracket.weight) + right * bracket.weight
    }

    /// Wind at every point for one time.
    pub fn sample(&self, bounds: &Bounds, points: &[Vec2], time: f64) -> Result<Vec<Vec2>> {
        let bracket = self.bracket(time)?;
        Ok(points
            .iter()
            .map(|p| self.sample_bracketed(bounds, *p, bracket))
            .collect())
    }
}

// ============================================================================
// Field
// ============================================================================

/// Disturbance backed by a shared simulation catalog.
///
/// One simulation is drawn uniformly per reset.
#[derive(Clone)]
pub struct PrecomputedField {
    catalog: SharedCatalog,
    bounds: Bounds,
    selected: Option<Arc<SimulationData>>,
}

impl PrecomputedField {
    pub fn new(catalog: SharedCatalog, bounds: Bounds) -> Self {
        Self {
            catalog,
            bounds,
            selected: None,
        }
    }

    pub fn catalog(&self) -> &SharedCatalog {
        &self.catalog
    }

    pub fn selected(&self) -> Option<&Arc<SimulationData>> {
        self.selected.as_ref()
    }

    /// Pick and load a simulation.
    pub fn select(&mut self, rng: &mut SimRng) -> Result<()> {
        let name = self.catalog.choose(rng).to_owned();
        let data = self.catalog.load(&name)?;
        debug!(
            simulation = %name,
            frames = data.num_frames(),
            t_max = data.max_time(),
            "selected precomputed turbulence"
        );
        self.selected = Some(data);
        Ok(())
    }

    pub fn sample(&self, points: &[Vec2], time: f64) -> Result<Vec<Vec2>> {
        let sim = self
            .selected
            .as_ref()
            .ok_or(FormationError::NoSimulationSelected)?;
        sim.sample(&self.bounds, points, time)
    }
}

impl std::fmt::Debug for PrecomputedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrecomputedField")
            .field("bounds", &self.bounds)
            .field("selected", &self.selected.as_ref().map(|s| s.name()))
            .finish()
    }
}
