//! Hexahedral meshes for the beam volume.

use petgraph::graphmap::UnGraphMap;

use crate::errors::MeshError;
use crate::geometry::Point;

/// Local node pairs forming the twelve edges of a VTK hexahedron.
const HEXAHEDRON_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Eight node indices of a hexahedron in VTK ordering.
///
/// Nodes 0-3 form the bottom face counter-clockwise, nodes 4-7 the top face
/// directly above them.
pub type Hexahedron = [usize; 8];

/// Immutable mesh of 8-node hexahedral elements.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    /// Node coordinates in millimetres.
    points: Vec<Point>,
    /// Element connectivity.
    cells: Vec<Hexahedron>,
}

impl Mesh {
    /// Create a mesh from explicit points and cells.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::CellIndexOutOfRange`] when a cell references a node that is
    /// not part of `points`.
    pub fn new(points: Vec<Point>, cells: Vec<Hexahedron>) -> Result<Self, MeshError> {
        let node_count = points.len();
        for (cell, nodes) in cells.iter().enumerate() {
            if let Some(&node) = nodes.iter().find(|&&node| node >= node_count) {
                return Err(MeshError::CellIndexOutOfRange {
                    cell,
                    node,
                    node_count,
                });
            }
        }
        Ok(Self { points, cells })
    }

    /// Generate a structured box of hexahedra between corners `a` and `b`.
    ///
    /// `n` holds the number of points along X, Y and Z. Points are numbered with X
    /// varying fastest, then Y, then Z.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::TooFewPoints`] when an axis has fewer than two points and
    /// [`MeshError::NonPositiveExtent`] when `b` does not lie beyond `a` on every axis.
    ///
    /// # Examples
    /// ```
    /// use beamx::{point, Mesh};
    ///
    /// let mesh = Mesh::cube(point(0.0, 0.0, 0.0), point(2.0, 1.0, 1.0), [3, 2, 2])?;
    /// assert_eq!(mesh.node_count(), 12);
    /// assert_eq!(mesh.element_count(), 2);
    /// # Ok::<(), beamx::MeshError>(())
    /// ```
    pub fn cube(a: Point, b: Point, n: [usize; 3]) -> Result<Self, MeshError> {
        let lower = [a.x, a.y, a.z];
        let upper = [b.x, b.y, b.z];
        for axis in 0..3 {
            if n[axis] < 2 {
                return Err(MeshError::TooFewPoints {
                    axis,
                    points: n[axis],
                });
            }
            let extent = upper[axis] - lower[axis];
            if extent <= 0.0 {
                return Err(MeshError::NonPositiveExtent { axis, extent });
            }
        }

        let coordinate = |axis: usize, index: usize| {
            let fraction = index as f64 / (n[axis] - 1) as f64;
            lower[axis] + fraction * (upper[axis] - lower[axis])
        };

        let [nx, ny, nz] = n;
        let mut points = Vec::with_capacity(nx * ny * nz);
        for iz in 0..nz {
            for iy in 0..ny {
                for ix in 0..nx {
                    points.push(Point::new(
                        coordinate(0, ix),
                        coordinate(1, iy),
                        coordinate(2, iz),
                    ));
                }
            }
        }

        let layer = nx * ny;
        let mut cells = Vec::with_capacity((nx - 1) * (ny - 1) * (nz - 1));
        for iz in 0..nz - 1 {
            for iy in 0..ny - 1 {
                for ix in 0..nx - 1 {
                    let base = ix + nx * iy + layer * iz;
                    let bottom = [base, base + 1, base + 1 + nx, base + nx];
                    cells.push([
                        bottom[0],
                        bottom[1],
                        bottom[2],
                        bottom[3],
                        bottom[0] + layer,
                        bottom[1] + layer,
                        bottom[2] + layer,
                        bottom[3] + layer,
                    ]);
                }
            }
        }

        Ok(Self { points, cells })
    }

    /// Return the number of nodes in the mesh.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.points.len()
    }

    /// Return the number of hexahedral elements in the mesh.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.cells.len()
    }

    /// Node coordinates in mesh order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Element connectivity in mesh order.
    #[must_use]
    pub fn cells(&self) -> &[Hexahedron] {
        &self.cells
    }

    /// Indices of the nodes whose position satisfies `predicate`.
    pub fn nodes_where<F>(&self, predicate: F) -> Vec<usize>
    where
        F: Fn(&Point) -> bool,
    {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, point)| predicate(point))
            .map(|(index, _)| index)
            .collect()
    }

    /// Unique undirected element edges, each reported once with the smaller node first.
    ///
    /// Edges shared by neighbouring elements appear a single time, which is what a
    /// wireframe overlay needs.
    #[must_use]
    pub fn edges(&self) -> Vec<[usize; 2]> {
        let mut graph = UnGraphMap::<usize, ()>::with_capacity(self.points.len(), 0);
        for cell in &self.cells {
            for &(start, end) in &HEXAHEDRON_EDGES {
                graph.add_edge(cell[start], cell[end], ());
            }
        }
        graph
            .all_edges()
            .map(|(a, b, _)| [a.min(b), a.max(b)])
            .collect()
    }
}
