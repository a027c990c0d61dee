//! The cantilever beam problem handed to the solver collaborator.

use crate::config::ModelConfig;
use crate::geometry::{point, Point};
use crate::solver::{FixedBoundary, SolveRequest};

/// Geometry, loading and supports of the cantilever demonstration.
///
/// The beam spans 2000 mm along X with a 100 mm x 100 mm cross-section, is clamped
/// at x = 0 and carries its own weight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CantileverProblem {
    /// Corner of the beam at the clamped end.
    pub lower: Point,
    /// Opposite corner at the free end.
    pub upper: Point,
    /// Gravitational acceleration in mm/s², multiplied by the density to form the
    /// body force.
    pub gravity: [f64; 3],
}

impl Default for CantileverProblem {
    fn default() -> Self {
        Self {
            lower: point(0.0, 0.0, 0.0),
            upper: point(2000.0, 100.0, 100.0),
            gravity: [0.0, 0.0, 9810.0],
        }
    }
}

impl CantileverProblem {
    /// Build the solver input for the selected mesh and material.
    #[must_use]
    pub fn request(&self, model: &ModelConfig) -> SolveRequest {
        let properties = model.material.properties();
        SolveRequest {
            lower: self.lower,
            upper: self.upper,
            points_per_axis: model.resolution.points_per_axis(),
            elastic_modulus: properties.elastic_modulus,
            poisson_ratio: properties.poisson_ratio,
            density: properties.density_t_per_mm3(),
            gravity: self.gravity,
            // Every displacement component vanishes on the x = 0 face.
            fixed: FixedBoundary {
                axis: 0,
                value: self.lower.x,
            },
        }
    }
}
