//! Small value types shared across the simulation.
//!
//! - `Vec2`: planar vector used for positions, velocities and wind
//! - `Bounds`: axis-aligned arena rectangle
//! - `BoxSpace`: observation/action space descriptor
//!
//! Internal loops read components directly; `as_array()` is for API
//! boundaries and serialization.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use rand::Rng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

/// Random number generator owned by each environment instance.
pub type SimRng = Xoshiro256PlusPlus;

// ============================================================================
// Vec2
// ============================================================================

/// A 2D vector in the world frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    #[inline(always)]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline(always)]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    #[inline(always)]
    pub fn norm_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    #[inline(always)]
    pub fn norm(self) -> f64 {
        self.norm_squared().sqrt()
    }

    #[inline(always)]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Counter-clockwise perpendicular: (x, y) -> (-y, x).
    #[inline(always)]
    pub fn perp(self) -> Self {
        Self::new(-self.y, self.x)
    }

    #[inline(always)]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline(always)]
    pub fn as_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<[f64; 2]> for Vec2 {
    #[inline]
    fn from(arr: [f64; 2]) -> Self {
        Self::new(arr[0], arr[1])
    }
}

impl From<Vec2> for [f64; 2] {
    #[inline]
    fn from(v: Vec2) -> Self {
        v.as_array()
    }
}

impl Add for Vec2 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

// ============================================================================
// Bounds
// ============================================================================

/// Axis-aligned arena rectangle, serialized as `[x_min, x_max, y_min, y_max]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    pub const fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self { x_min, x_max, y_min, y_max }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// True when both extents are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite()) && self.width() > 0.0 && self.height() > 0.0
    }

    /// Closed-interval containment on both axes.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
    }

    /// Uniform sample inside the rectangle.
    pub fn sample(&self, rng: &mut SimRng) -> Vec2 {
        Vec2::new(
            self.x_min + rng.gen::<f64>() * self.width(),
            self.y_min + rng.gen::<f64>() * self.height(),
        )
    }

    /// Map a world point to `[-1, 1]` on each axis (edges map to -1 and 1).
    #[inline]
    pub fn normalize(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            2.0 * (p.x - self.x_min) / self.width() - 1.0,
            2.0 * (p.y - self.y_min) / self.height() - 1.0,
        )
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.x_min, self.x_max, self.y_min, self.y_max]
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::from(crate::constants::DEFAULT_BOUNDS)
    }
}

impl From<[f64; 4]> for Bounds {
    fn from(arr: [f64; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }
}

impl From<Bounds> for [f64; 4] {
    fn from(b: Bounds) -> Self {
        b.as_array()
    }
}

// ============================================================================
// Spaces
// ============================================================================

/// A box-shaped space: every one of `shape` elements lies in `[low, high]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxSpace {
    pub low: f64,
    pub high: f64,
    pub shape: usize,
}

impl BoxSpace {
    pub fn new(low: f64, high: f64, shape: usize) -> Self {
        Self { low, high, shape }
    }

    /// Check length and element range.
    pub fn contains(&self, values: &[f64]) -> bool {
        values.len() == self.shape && values.iter().all(|v| *v >= self.low && *v <= self.high)
    }
}
