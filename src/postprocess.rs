//! Post-processing of a solved displacement field into drawable geometry and statistics.
//!
//! Everything here is a pure function of the mesh, the field and the scale factor.
//! The field is assumed to hold exactly one displacement per mesh node; the solver
//! collaborator is responsible for that alignment.

use serde::{Deserialize, Serialize};

use crate::geometry::{Displacement, Point};
use crate::mesh::Mesh;

/// Solved nodal displacements in mesh node order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplacementField {
    /// One displacement vector per node.
    values: Vec<Displacement>,
}

impl DisplacementField {
    /// Wrap solved nodal displacements.
    #[must_use]
    pub fn new(values: Vec<Displacement>) -> Self {
        Self { values }
    }

    /// Number of nodal vectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the field holds no vectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Nodal vectors in mesh order.
    #[must_use]
    pub fn values(&self) -> &[Displacement] {
        &self.values
    }
}

impl From<Vec<Displacement>> for DisplacementField {
    fn from(values: Vec<Displacement>) -> Self {
        Self::new(values)
    }
}

/// Move every node along its displacement scaled by `scale`.
///
/// The scale factor is not clamped. Large values may fold the mesh onto itself,
/// which is accepted.
///
/// # Examples
/// ```
/// use beamx::{deform, displacement, point, DisplacementField};
///
/// let points = [point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0)];
/// let field = DisplacementField::new(vec![
///     displacement(0.0, 0.0, 0.0),
///     displacement(0.0, 0.0, 0.01),
/// ]);
/// let deformed = deform(&points, &field, 100.0);
/// assert_eq!(deformed[1], point(1.0, 0.0, 1.0));
/// ```
#[must_use]
pub fn deform(points: &[Point], field: &DisplacementField, scale: f64) -> Vec<Point> {
    points
        .iter()
        .zip(field.values())
        .map(|(point, displacement)| point.translated(*displacement, scale))
        .collect()
}

/// Euclidean norm of every nodal displacement.
#[must_use]
pub fn magnitude(field: &DisplacementField) -> Vec<f64> {
    field.values().iter().map(|d| d.norm()).collect()
}

/// Key response values and model size of a solved beam.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Summary {
    /// Largest displacement magnitude over all nodes in millimetres.
    pub max_displacement: f64,
    /// Largest signed vertical (Z) displacement in millimetres.
    pub max_vertical: f64,
    /// Smallest signed vertical (Z) displacement in millimetres.
    pub min_vertical: f64,
    /// Number of mesh nodes.
    pub node_count: usize,
    /// Number of hexahedral elements.
    pub element_count: usize,
    /// Number of scalar unknowns, three per node.
    pub degrees_of_freedom: usize,
}

/// Compute the result summary for a solved field.
///
/// The vertical extremes are signed Z components, not magnitudes. An empty field
/// yields zero statistics.
#[must_use]
pub fn summarize(mesh: &Mesh, field: &DisplacementField) -> Summary {
    let max_displacement = magnitude(field).into_iter().fold(0.0, f64::max);
    let (min_vertical, max_vertical) = field
        .values()
        .iter()
        .map(|d| d.z)
        .fold(None, |bounds, z| match bounds {
            None => Some((z, z)),
            Some((low, high)) => Some((f64::min(low, z), f64::max(high, z))),
        })
        .unwrap_or((0.0, 0.0));
    let node_count = mesh.node_count();
    Summary {
        max_displacement,
        max_vertical,
        min_vertical,
        node_count,
        element_count: mesh.element_count(),
        degrees_of_freedom: node_count * 3,
    }
}

/// Deformed node positions and the scalar field used for coloring.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderGeometry {
    /// Node positions after applying the scaled displacements.
    pub points: Vec<Point>,
    /// Displacement magnitude per node.
    pub magnitude: Vec<f64>,
    /// Scale factor the points were computed with.
    pub scale_factor: f64,
}

impl RenderGeometry {
    /// Derive drawable geometry for `mesh` under `field` at `scale_factor`.
    #[must_use]
    pub fn new(mesh: &Mesh, field: &DisplacementField, scale_factor: f64) -> Self {
        Self {
            points: deform(mesh.points(), field, scale_factor),
            magnitude: magnitude(field),
            scale_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::{displacement, point};

    fn two_node_mesh() -> Mesh {
        Mesh::new(vec![point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0)], Vec::new())
            .expect("mesh without cells is valid")
    }

    fn sample_field() -> DisplacementField {
        DisplacementField::new(vec![
            displacement(0.3, -0.4, 1.2),
            displacement(-2.0, 0.5, 0.25),
            displacement(0.0, 0.0, -0.75),
        ])
    }

    fn sample_points() -> Vec<Point> {
        vec![
            point(0.0, 0.0, 0.0),
            point(10.0, 5.0, 0.0),
            point(20.0, 5.0, 100.0),
        ]
    }

    #[test]
    fn magnitude_is_euclidean_norm() {
        let field = sample_field();
        let values = magnitude(&field);
        assert_eq!(values.len(), field.len());
        for (value, d) in values.iter().zip(field.values()) {
            assert_relative_eq!(*value, (d.x * d.x + d.y * d.y + d.z * d.z).sqrt());
            assert!(*value >= 0.0);
        }
    }

    #[test]
    fn zero_scale_leaves_points_unchanged() {
        let points = sample_points();
        assert_eq!(deform(&points, &sample_field(), 0.0), points);
    }

    #[test]
    fn deformation_is_linear_in_scale() {
        let points = sample_points();
        let field = sample_field();
        let single = deform(&points, &field, 37.5);
        let double = deform(&points, &field, 75.0);
        assert_eq!(single.len(), points.len());
        for ((p, s), d) in points.iter().zip(&single).zip(&double) {
            let once = s.to_vector() - p.to_vector();
            let twice = d.to_vector() - p.to_vector();
            assert_relative_eq!(twice, once * 2.0, epsilon = 1.0e-12);
        }
    }

    #[test]
    fn huge_scale_is_accepted() {
        let points = sample_points();
        let deformed = deform(&points, &sample_field(), 1.0e9);
        assert_eq!(deformed.len(), points.len());
        assert!(deformed.iter().all(|p| p.x.is_finite() && p.z.is_finite()));
    }

    #[test]
    fn two_node_scenario() {
        let mesh = two_node_mesh();
        let field = DisplacementField::new(vec![
            displacement(0.0, 0.0, 1.0),
            displacement(0.0, 0.0, -2.0),
        ]);

        assert_eq!(magnitude(&field), vec![1.0, 2.0]);
        let summary = summarize(&mesh, &field);
        assert_relative_eq!(summary.max_displacement, 2.0);
        assert_relative_eq!(summary.max_vertical, 1.0);
        assert_relative_eq!(summary.min_vertical, -2.0);
        assert_eq!(summary.node_count, 2);
        assert_eq!(summary.element_count, 0);
        assert_eq!(summary.degrees_of_freedom, 6);

        let geometry = RenderGeometry::new(&mesh, &field, 1.0);
        assert_eq!(geometry.points, vec![point(0.0, 0.0, 1.0), point(1.0, 0.0, -2.0)]);
    }

    #[test]
    fn summary_bounds_are_self_consistent() {
        let mesh = Mesh::new(sample_points(), Vec::new()).expect("valid mesh");
        let field = sample_field();
        let summary = summarize(&mesh, &field);
        assert!(summary.max_displacement >= 0.0);
        assert!(summary.min_vertical <= summary.max_vertical);
        let largest = magnitude(&field).into_iter().fold(0.0, f64::max);
        assert_relative_eq!(summary.max_displacement, largest);
        assert_relative_eq!(summary.max_vertical, 1.2);
        assert_relative_eq!(summary.min_vertical, -0.75);
    }

    #[test]
    fn magnitude_does_not_bound_signed_vertical_from_below() {
        // All vertical components are negative, so the signed maximum is below every
        // magnitude while the magnitude maximum comes from the horizontal component.
        let mesh = two_node_mesh();
        let field = DisplacementField::new(vec![
            displacement(5.0, 0.0, -1.0),
            displacement(0.0, 0.0, -3.0),
        ]);
        let summary = summarize(&mesh, &field);
        assert_relative_eq!(summary.max_vertical, -1.0);
        assert_relative_eq!(summary.min_vertical, -3.0);
        assert_relative_eq!(summary.max_displacement, 26.0_f64.sqrt());
    }

    #[test]
    fn empty_field_gives_zero_statistics() {
        let mesh = Mesh::new(Vec::new(), Vec::new()).expect("empty mesh");
        let summary = summarize(&mesh, &DisplacementField::default());
        assert_relative_eq!(summary.max_displacement, 0.0);
        assert_relative_eq!(summary.max_vertical, 0.0);
        assert_relative_eq!(summary.min_vertical, 0.0);
        assert_eq!(summary.degrees_of_freedom, 0);
    }

    #[test]
    fn field_serializes_as_nested_triplets() {
        let field: DisplacementField =
            serde_json::from_str("[[0, 0, 1], [0.5, 0, -2]]").expect("deserializes");
        assert_eq!(field.len(), 2);
        assert_eq!(field.values()[1], displacement(0.5, 0.0, -2.0));
    }
}
