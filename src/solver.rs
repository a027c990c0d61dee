//! Solver collaborators that turn a beam problem into a displacement field.
//!
//! The finite-element solve itself happens outside this crate. [`CommandSolver`]
//! talks to an external program over a small JSON protocol, while
//! [`BeamTheorySolver`] evaluates closed-form beam theory and serves as a
//! dependency-free reference for demonstrations and tests.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::SolveError;
use crate::geometry::{Displacement, Point};
use crate::mesh::Mesh;
use crate::postprocess::DisplacementField;

/// Plane on which every displacement component is held at zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FixedBoundary {
    /// Axis normal to the plane, 0 = X, 1 = Y, 2 = Z.
    pub axis: usize,
    /// Coordinate of the plane along `axis` in millimetres.
    pub value: f64,
}

/// Everything a solver needs to produce the displacement field.
///
/// This is also the JSON document written to the stdin of an external solver.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolveRequest {
    /// Lower corner of the box-shaped domain.
    pub lower: Point,
    /// Upper corner of the box-shaped domain.
    pub upper: Point,
    /// Number of mesh points along X, Y and Z.
    pub points_per_axis: [usize; 3],
    /// Young's modulus in MPa.
    pub elastic_modulus: f64,
    /// Poisson's ratio.
    pub poisson_ratio: f64,
    /// Density in t/mm³.
    pub density: f64,
    /// Gravitational acceleration in mm/s².
    pub gravity: [f64; 3],
    /// Clamped boundary.
    pub fixed: FixedBoundary,
}

impl SolveRequest {
    /// Generate the hexahedral mesh the request describes.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::Mesh`] when the box or point counts are invalid.
    pub fn mesh(&self) -> Result<Mesh, SolveError> {
        Ok(Mesh::cube(self.lower, self.upper, self.points_per_axis)?)
    }

    /// Body force per unit volume in N/mm³.
    #[must_use]
    pub fn body_force(&self) -> [f64; 3] {
        self.gravity.map(|g| g * self.density)
    }
}

/// Mesh and solved displacements returned by a [`Solver`].
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// Mesh the displacements belong to.
    pub mesh: Mesh,
    /// One displacement per mesh node.
    pub displacement: DisplacementField,
}

impl Solution {
    /// Pair a mesh with its field, rejecting fields of the wrong length.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::FieldSizeMismatch`] when the field does not have one
    /// vector per node.
    pub fn new(mesh: Mesh, displacement: DisplacementField) -> Result<Self, SolveError> {
        if displacement.len() != mesh.node_count() {
            return Err(SolveError::FieldSizeMismatch {
                expected: mesh.node_count(),
                received: displacement.len(),
            });
        }
        Ok(Self { mesh, displacement })
    }
}

/// External collaborator that solves the beam problem.
pub trait Solver {
    /// Solve once for the given request. Failures are returned, never retried.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError`] when the problem cannot be solved.
    fn solve(&self, request: &SolveRequest) -> Result<Solution, SolveError>;
}

impl<S: Solver + ?Sized> Solver for Box<S> {
    fn solve(&self, request: &SolveRequest) -> Result<Solution, SolveError> {
        (**self).solve(request)
    }
}

/// JSON document an external solver writes to stdout.
#[derive(Debug, Deserialize)]
struct SolverResponse {
    /// Nodal displacements in the mesh ordering of [`Mesh::cube`].
    displacement: DisplacementField,
}

/// Runs an external solver program.
///
/// The program receives the [`SolveRequest`] as JSON on stdin and must print
/// `{"displacement": [[ux, uy, uz], ...]}` on stdout, one triplet per node in the
/// ordering of [`Mesh::cube`].
#[derive(Clone, Debug)]
pub struct CommandSolver {
    /// Program to execute.
    program: PathBuf,
    /// Extra arguments passed before the request is written.
    args: Vec<String>,
}

impl CommandSolver {
    /// Create a solver that runs `program` without arguments.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append command line arguments.
    #[must_use]
    pub fn with_args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Wrap an I/O failure talking to the program.
    fn spawn_error(&self, source: io::Error) -> SolveError {
        SolveError::Spawn {
            program: self.program.clone(),
            source,
        }
    }
}

impl Solver for CommandSolver {
    fn solve(&self, request: &SolveRequest) -> Result<Solution, SolveError> {
        let mesh = request.mesh()?;
        let payload = serde_json::to_vec(request)?;
        info!(
            "running solver {:?} for {} nodes",
            self.program,
            mesh.node_count()
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| self.spawn_error(source))?;
        // A program that rejects its input may exit before reading it.
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(&payload) {
                Ok(()) => {}
                Err(error) if error.kind() == io::ErrorKind::BrokenPipe => {
                    debug!(
                        "solver {:?} closed stdin before reading the request",
                        self.program
                    );
                }
                Err(source) => return Err(self.spawn_error(source)),
            }
        }
        let output = child
            .wait_with_output()
            .map_err(|source| self.spawn_error(source))?;

        if !output.status.success() {
            return Err(SolveError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        debug!("solver wrote {} bytes", output.stdout.len());

        let response: SolverResponse = serde_json::from_slice(&output.stdout)?;
        Solution::new(mesh, response.displacement)
    }
}

/// Closed-form cantilever response from Euler-Bernoulli beam theory.
///
/// The beam is clamped on its lower X face. A uniform line load
/// `q = rho g A` gives the deflection
///
/// ```text
/// w(s)  = q s² (6L² - 4Ls + s²) / (24 E I)
/// w'(s) = q s (3L² - 3Ls + s²) / (6 E I)
/// ```
///
/// at distance `s` from the clamp, applied about both cross-section axes. Plane
/// sections rotate with the slope, adding `-(z - z_c) w_z'(s) - (y - y_c) w_y'(s)`
/// to the axial displacement, and the axial body force stretches the bar by
/// `rho g_x (L s - s²/2) / E`. Shear deformation and Poisson effects are ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct BeamTheorySolver;

impl BeamTheorySolver {
    /// Create the reference solver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Relative distance, in beam lengths, within which a node counts as clamped.
const CLAMP_TOLERANCE: f64 = 1.0e-9;

/// Deflection and slope of a uniformly loaded cantilever at distance `s`.
fn cantilever_deflection(q: f64, length: f64, flexural_rigidity: f64, s: f64) -> (f64, f64) {
    let l = length;
    let deflection = q * s * s * (6.0 * l * l - 4.0 * l * s + s * s) / (24.0 * flexural_rigidity);
    let slope = q * s * (3.0 * l * l - 3.0 * l * s + s * s) / (6.0 * flexural_rigidity);
    (deflection, slope)
}

impl Solver for BeamTheorySolver {
    fn solve(&self, request: &SolveRequest) -> Result<Solution, SolveError> {
        let mesh = request.mesh()?;
        let FixedBoundary { axis, value } = request.fixed;
        let (lower, upper) = (request.lower, request.upper);
        let length = upper.x - lower.x;
        if axis != 0 {
            return Err(SolveError::Unsupported(format!(
                "beam theory needs the clamp on an X face (got axis {axis})"
            )));
        }
        let tolerance = CLAMP_TOLERANCE * length;
        let clamped = mesh.nodes_where(|p| (p.x - value).abs() <= tolerance);
        if clamped.is_empty() {
            return Err(SolveError::Unsupported(format!(
                "no mesh nodes lie on the clamp plane x = {value}"
            )));
        }
        if (value - lower.x).abs() > tolerance {
            return Err(SolveError::Unsupported(format!(
                "beam theory needs the clamp on the lower X face (got x = {value})"
            )));
        }
        debug!("{} nodes clamped at x = {value}", clamped.len());

        let width = upper.y - lower.y;
        let height = upper.z - lower.z;
        let area = width * height;
        let inertia_y = width * height.powi(3) / 12.0;
        let inertia_z = height * width.powi(3) / 12.0;
        let center_y = 0.5 * (lower.y + upper.y);
        let center_z = 0.5 * (lower.z + upper.z);
        let e = request.elastic_modulus;
        let [fx, fy, fz] = request.body_force();

        let values = mesh
            .points()
            .iter()
            .map(|p| {
                let s = p.x - value;
                let axial = fx * (length * s - 0.5 * s * s) / e;
                let (w_z, slope_z) = cantilever_deflection(fz * area, length, e * inertia_y, s);
                let (w_y, slope_y) = cantilever_deflection(fy * area, length, e * inertia_z, s);
                let rotation = -(p.z - center_z) * slope_z - (p.y - center_y) * slope_y;
                Displacement::new(axial + rotation, w_y, w_z)
            })
            .collect::<Vec<_>>();

        info!(
            "beam theory solution for {} nodes, {} elements",
            mesh.node_count(),
            mesh.element_count()
        );
        Solution::new(mesh, DisplacementField::new(values))
    }
}
