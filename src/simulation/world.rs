//! Toroidal arena geometry.
//!
//! The arena is a square of side `size` centred on the origin. Coordinates live in
//! `[-size/2, size/2)` and leaving one edge re-enters from the opposite one.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, MulAssign, Sub};

/// A 2D vector used for positions and velocities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl Vector2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a vector from its components.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians).
    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    /// Euclidean length.
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Returns the vector scaled down to `max` if it is longer.
    #[must_use]
    pub fn clamp_length(self, max: f32) -> Self {
        let len = self.length();
        if len > max && len > 0.0 {
            self * (max / len)
        } else {
            self
        }
    }

    /// Whether both components are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl MulAssign<f32> for Vector2 {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

/// Wrap-aware offset between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShortestDelta {
    /// Horizontal offset from the origin point to the target.
    pub dx: f32,
    /// Vertical offset from the origin point to the target.
    pub dy: f32,
    /// Length of `(dx, dy)`.
    pub distance: f32,
}

/// Square toroidal arena.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct World {
    size: f32,
}

impl World {
    /// Creates an arena with side length `size`.
    pub fn new(size: f32) -> Self {
        Self { size }
    }

    /// Side length of the arena.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Half the side length; coordinates lie in `[-half_size, half_size)`.
    pub fn half_size(&self) -> f32 {
        self.size / 2.0
    }

    /// Wraps a point back into the arena.
    pub fn wrap_position(&self, p: Vector2) -> Vector2 {
        Vector2::new(self.wrap_axis(p.x), self.wrap_axis(p.y))
    }

    fn wrap_axis(&self, v: f32) -> f32 {
        if !v.is_finite() {
            return 0.0;
        }
        let half = self.half_size();
        if (-half..half).contains(&v) {
            return v;
        }
        let mut wrapped = (v + half).rem_euclid(self.size) - half;
        // rem_euclid can round up to exactly `size` for tiny negative inputs
        if wrapped >= half {
            wrapped -= self.size;
        }
        if wrapped < -half {
            wrapped = -half;
        }
        wrapped
    }

    /// Shortest offset from `a` to `b`, crossing the wrap boundary when that is shorter.
    pub fn shortest_delta(&self, a: Vector2, b: Vector2) -> ShortestDelta {
        let dx = self.shortest_axis(b.x - a.x);
        let dy = self.shortest_axis(b.y - a.y);
        ShortestDelta {
            dx,
            dy,
            distance: dx.hypot(dy),
        }
    }

    fn shortest_axis(&self, delta: f32) -> f32 {
        if delta.abs() > self.half_size() {
            delta - delta.signum() * self.size
        } else {
            delta
        }
    }

    /// Distance from `p` to the closest arena edge.
    pub fn distance_to_wall(&self, p: Vector2) -> f32 {
        let half = self.half_size();
        (half - p.x.abs()).min(half - p.y.abs()).max(0.0)
    }

    /// Uniformly random point inside the arena, or the origin for a degenerate arena.
    pub fn random_position(&self) -> Vector2 {
        use rand::Rng;

        let half = self.half_size();
        if !(half > 0.0 && half.is_finite()) {
            return Vector2::ZERO;
        }
        let mut rng = rand::rng();
        Vector2::new(rng.random_range(-half..half), rng.random_range(-half..half))
    }
}
