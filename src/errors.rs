//! Error types produced while configuring, solving and rendering the beam model.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error returned when a hexahedral mesh cannot be constructed.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MeshError {
    /// Returned when a structured box is requested with fewer than two points on an axis.
    #[error("axis {axis} needs at least 2 points (received {points})")]
    TooFewPoints {
        /// Axis index, 0 = X, 1 = Y, 2 = Z.
        axis: usize,
        /// Rejected number of points along the axis.
        points: usize,
    },
    /// Returned when a box corner does not lie strictly beyond the origin corner.
    #[error("box extent along axis {axis} must be positive (received {extent})")]
    NonPositiveExtent {
        /// Axis index, 0 = X, 1 = Y, 2 = Z.
        axis: usize,
        /// Rejected extent in millimetres.
        extent: f64,
    },
    /// Returned when a cell references a node that does not exist.
    #[error("cell {cell} references node {node} but the mesh has {node_count} nodes")]
    CellIndexOutOfRange {
        /// Offending cell.
        cell: usize,
        /// Node index that is out of range.
        node: usize,
        /// Number of nodes in the mesh.
        node_count: usize,
    },
}

/// Error returned when user supplied configuration is not physically meaningful.
///
/// The variants mirror the numeric bounds of the configuration surface so callers can
/// present actionable feedback to users.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Returned when the elastic modulus is below 1 MPa.
    #[error("Young's modulus must be at least 1 MPa (received {0})")]
    ElasticModulus(f64),
    /// Returned when Poisson's ratio leaves the [0, 0.49] interval.
    #[error("Poisson's ratio must lie in [0, 0.49] (received {0})")]
    PoissonRatio(f64),
    /// Returned when the density is below 1 kg/m³.
    #[error("density must be at least 1 kg/m³ (received {0})")]
    Density(f64),
    /// Returned when the scale factor is outside the slider range.
    #[error("scale factor must lie in [{min}, {max}] (received {value})")]
    ScaleFactor {
        /// Rejected scale factor.
        value: f64,
        /// Smallest accepted value.
        min: f64,
        /// Largest accepted value.
        max: f64,
    },
    /// Returned when the configuration file cannot be read.
    #[error("cannot read configuration file {path:?}: {source}")]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Returned when the configuration file is not valid JSON.
    #[error("cannot parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Error returned by a [`Solver`](crate::Solver) collaborator.
#[derive(Debug, Error)]
pub enum SolveError {
    /// Returned when the mesh for the request cannot be generated.
    #[error("cannot build mesh: {0}")]
    Mesh(#[from] MeshError),
    /// Returned when the external solver program cannot be started or talked to.
    #[error("cannot run solver {program:?}: {source}")]
    Spawn {
        /// Program that was launched.
        program: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Returned when the external solver exits unsuccessfully.
    #[error("solver {program:?} failed with {status}: {stderr}")]
    Failed {
        /// Program that was launched.
        program: PathBuf,
        /// Exit status description.
        status: String,
        /// Captured standard error output.
        stderr: String,
    },
    /// Returned when the request or the response cannot be encoded or decoded.
    #[error("malformed solver exchange: {0}")]
    Protocol(#[from] serde_json::Error),
    /// Returned when the solver cannot handle the requested problem.
    #[error("unsupported problem: {0}")]
    Unsupported(String),
    /// Returned when the solved field does not line up with the mesh nodes.
    #[error("solver returned {received} displacements for a mesh of {expected} nodes")]
    FieldSizeMismatch {
        /// Number of mesh nodes.
        expected: usize,
        /// Number of displacement vectors returned.
        received: usize,
    },
}

/// Error returned by a [`Renderer`](crate::Renderer) collaborator.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Returned when the scene holds no cells.
    #[error("there are no cells to render")]
    EmptyScene,
    /// Returned when an output file cannot be written.
    #[error("cannot write {path:?}: {source}")]
    Io {
        /// Path of the output file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Error returned when an interactive command line cannot be understood.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CommandError {
    /// Returned for an unknown command word.
    #[error("unknown command `{0}` (type `help` for a list)")]
    Unknown(String),
    /// Returned when a command is missing an argument.
    #[error("`{command}` expects {expected}")]
    MissingArgument {
        /// Command word.
        command: &'static str,
        /// Description of the expected argument.
        expected: &'static str,
    },
    /// Returned when an argument has the wrong form.
    #[error("`{command}` cannot use `{value}`: expected {expected}")]
    InvalidArgument {
        /// Command word.
        command: &'static str,
        /// Rejected argument.
        value: String,
        /// Description of the expected argument.
        expected: &'static str,
    },
    /// Returned when well-formed arguments describe an invalid setting.
    #[error("`{command}` rejected: {reason}")]
    Rejected {
        /// Command word.
        command: &'static str,
        /// Why the setting was refused.
        reason: String,
    },
}

/// Error returned while handling a [`Session`](crate::Session) event.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Returned when the requested configuration change is rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Returned when the solver collaborator fails.
    #[error("solve failed: {0}")]
    Solve(#[from] SolveError),
    /// Returned when the rendering collaborator fails.
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
}
