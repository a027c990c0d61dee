//! Fundamental geometric types for beam meshes and their solved fields.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Position in three dimensional space measured in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Distance along the global X axis (beam length).
    pub x: f64,
    /// Distance along the global Y axis (beam width).
    pub y: f64,
    /// Distance along the global Z axis (beam height).
    pub z: f64,
}

impl Point {
    /// Create a [`Point`] with explicit coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Convert the point into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Move the point along `displacement` scaled by `scale`.
    ///
    /// # Examples
    /// ```
    /// use beamx::{displacement, point};
    ///
    /// let moved = point(1.0, 0.0, 0.0).translated(displacement(0.0, 0.0, -0.5), 4.0);
    /// assert_eq!(moved, point(1.0, 0.0, -2.0));
    /// ```
    #[must_use]
    pub fn translated(self, displacement: Displacement, scale: f64) -> Self {
        Self::from(self.to_vector() + displacement.to_vector() * scale)
    }
}

impl From<Vector3<f64>> for Point {
    fn from(value: Vector3<f64>) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<Point> for Vector3<f64> {
    fn from(value: Point) -> Self {
        value.to_vector()
    }
}

/// Translation vector describing nodal displacement in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Displacement {
    /// Displacement component along the global X axis.
    pub x: f64,
    /// Displacement component along the global Y axis.
    pub y: f64,
    /// Displacement component along the global Z axis (vertical).
    pub z: f64,
}

impl Displacement {
    /// Create a [`Displacement`] with explicit components.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Convert the displacement into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Euclidean length of the displacement.
    #[must_use]
    pub fn norm(self) -> f64 {
        self.to_vector().norm()
    }
}

impl Default for Displacement {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl From<Vector3<f64>> for Displacement {
    fn from(value: Vector3<f64>) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<Displacement> for Vector3<f64> {
    fn from(value: Displacement) -> Self {
        value.to_vector()
    }
}

impl From<[f64; 3]> for Displacement {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Displacement> for [f64; 3] {
    fn from(value: Displacement) -> Self {
        [value.x, value.y, value.z]
    }
}

/// Convenience helper for creating [`Point`] instances.
///
/// # Examples
/// ```
/// use beamx::{displacement, point};
///
/// let tip = point(2000.0, 50.0, 100.0);
/// let sagged = tip.translated(displacement(0.0, 0.0, 0.9), 300.0);
/// assert_eq!(sagged.z, 370.0);
/// ```
#[must_use]
pub const fn point(x: f64, y: f64, z: f64) -> Point {
    Point::new(x, y, z)
}

/// Convenience helper for creating [`Displacement`] instances.
///
/// # Examples
/// ```
/// use beamx::displacement;
///
/// let delta = displacement(0.0, 0.0, -0.9);
/// assert_eq!(delta.z, -0.9);
/// ```
#[must_use]
pub const fn displacement(x: f64, y: f64, z: f64) -> Displacement {
    Displacement::new(x, y, z)
}
