#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_doc_code_examples)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

mod command;
mod config;
mod errors;
mod geometry;
mod material;
mod mesh;
mod postprocess;
mod problem;
mod render;
mod report;
mod session;
mod solver;

pub use command::{parse_command, run_commands, Command, HELP};
pub use config::{
    AppConfig, ModelConfig, Resolution, ViewOptions, DEFAULT_SCALE_FACTOR, MAX_SCALE_FACTOR,
    MIN_SCALE_FACTOR,
};
pub use errors::{CommandError, ConfigError, MeshError, RenderError, SessionError, SolveError};
pub use geometry::{displacement, point, Displacement, Point};
pub use material::{
    Material, MaterialProperties, MAX_POISSON_RATIO, MIN_DENSITY, MIN_ELASTIC_MODULUS,
};
pub use mesh::{Hexahedron, Mesh};
pub use postprocess::{deform, magnitude, summarize, DisplacementField, RenderGeometry, Summary};
pub use problem::CantileverProblem;
pub use render::{Renderer, Scene, VtuRenderer, MAGNITUDE_FIELD};
pub use report::{render_introduction, render_pending_notice, render_summary, scale_label};
pub use session::{Event, Outcome, Session, SessionState, SolvedResult};
pub use solver::{BeamTheorySolver, CommandSolver, FixedBoundary, SolveRequest, Solution, Solver};
