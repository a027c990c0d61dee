//! Interactive session: configuration, the most recent solved result, and redraws.

use log::{debug, info, warn};

use crate::config::{AppConfig, ModelConfig, Resolution, ViewOptions};
use crate::errors::SessionError;
use crate::material::Material;
use crate::postprocess::{summarize, RenderGeometry, Summary};
use crate::problem::CantileverProblem;
use crate::render::{Renderer, Scene};
use crate::report::{render_introduction, render_pending_notice, render_summary, scale_label};
use crate::solver::{Solution, Solver};

/// User action delivered to a [`Session`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Pick a mesh resolution. Takes effect on the next solve.
    SetResolution(Resolution),
    /// Pick a material. Takes effect on the next solve.
    SetMaterial(Material),
    /// Change the displacement scale factor.
    SetScale(f64),
    /// Toggle the element edge overlay.
    ShowEdges(bool),
    /// Toggle the undeformed shape overlay.
    ShowUndeformed(bool),
    /// Run the solver with the current configuration.
    Solve,
    /// Ask for the current report.
    Summary,
}

/// What handling an [`Event`] produced.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The configuration changed and nothing was drawn.
    Configured,
    /// A frame was drawn; carries the report for the drawn result.
    Rendered(String),
    /// Text answering a [`Event::Summary`] request.
    Report(String),
}

/// Result held between redraws.
#[derive(Clone, Debug, PartialEq)]
pub struct SolvedResult {
    /// Mesh and displacement field returned by the solver.
    pub solution: Solution,
    /// Configuration the solution was computed with.
    pub model: ModelConfig,
    /// Statistics of the solution.
    pub summary: Summary,
    /// Unique element edges, kept for the wireframe overlay.
    edges: Vec<[usize; 2]>,
}

impl SolvedResult {
    /// Post-process a fresh solution.
    #[must_use]
    pub fn new(solution: Solution, model: ModelConfig) -> Self {
        let summary = summarize(&solution.mesh, &solution.displacement);
        let edges = solution.mesh.edges();
        Self {
            solution,
            model,
            summary,
            edges,
        }
    }
}

/// Whether a result is available.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionState {
    /// Nothing has been solved yet; only configuration is possible.
    #[default]
    Unsolved,
    /// A result is available and is redrawn on visualization changes.
    Solved(SolvedResult),
}

/// Explicit application context for one interactive user.
///
/// Visualization changes redraw the held result without calling the solver; mesh and
/// material changes wait for the next [`Event::Solve`]. Once solved, the session
/// never returns to [`SessionState::Unsolved`].
#[derive(Debug)]
pub struct Session<S, R> {
    /// Live configuration.
    config: AppConfig,
    /// Fixed geometry, loads and supports.
    problem: CantileverProblem,
    /// Most recent solved result, if any.
    state: SessionState,
    /// Solver collaborator.
    solver: S,
    /// Rendering collaborator.
    renderer: R,
}

impl<S: Solver, R: Renderer> Session<S, R> {
    /// Start an unsolved session.
    pub fn new(config: AppConfig, solver: S, renderer: R) -> Self {
        Self {
            config,
            problem: CantileverProblem::default(),
            state: SessionState::Unsolved,
            solver,
            renderer,
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Solved result, when available.
    #[must_use]
    pub fn result(&self) -> Option<&SolvedResult> {
        match &self.state {
            SessionState::Unsolved => None,
            SessionState::Solved(result) => Some(result),
        }
    }

    /// Rendering collaborator.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Solver collaborator.
    #[must_use]
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Apply one user action.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] for out-of-range settings (the configuration is
    /// left unchanged), [`SessionError::Solve`] when the solver fails (the state is left
    /// unchanged), and [`SessionError::Render`] when drawing fails (a fresh result is
    /// still held).
    pub fn handle(&mut self, event: Event) -> Result<Outcome, SessionError> {
        match event {
            Event::SetResolution(resolution) => {
                self.config.model.resolution = resolution;
                Ok(self.model_changed())
            }
            Event::SetMaterial(material) => {
                material.properties().validate()?;
                self.config.model.material = material;
                Ok(self.model_changed())
            }
            Event::SetScale(scale_factor) => {
                let view = ViewOptions {
                    scale_factor,
                    ..self.config.view
                };
                view.validate()?;
                self.view_changed(view)
            }
            Event::ShowEdges(show_edges) => self.view_changed(ViewOptions {
                show_edges,
                ..self.config.view
            }),
            Event::ShowUndeformed(show_undeformed) => self.view_changed(ViewOptions {
                show_undeformed,
                ..self.config.view
            }),
            Event::Solve => self.solve(),
            Event::Summary => Ok(Outcome::Report(self.report())),
        }
    }

    /// Report for the held result, or the introduction before the first solve.
    #[must_use]
    pub fn report(&self) -> String {
        match &self.state {
            SessionState::Unsolved => render_introduction(),
            SessionState::Solved(result) => {
                let mut report =
                    render_summary(&result.summary, &result.model.material, &self.config.view);
                if result.model != self.config.model {
                    report.push('\n');
                    report.push_str(&render_pending_notice(
                        &self.config.model.material,
                        &self.config.model.resolution.to_string(),
                    ));
                }
                report
            }
        }
    }

    /// Log a mesh or material change and flag a stale result.
    fn model_changed(&self) -> Outcome {
        debug!(
            "model set to {} mesh, {}",
            self.config.model.resolution, self.config.model.material
        );
        if let SessionState::Solved(result) = &self.state {
            if result.model != self.config.model {
                warn!("displayed result is stale until the next solve");
            }
        }
        Outcome::Configured
    }

    /// Store new view options and redraw the held result, if any.
    fn view_changed(&mut self, view: ViewOptions) -> Result<Outcome, SessionError> {
        debug!("view set to {view:?}");
        self.config.view = view;
        match self.state {
            SessionState::Unsolved => Ok(Outcome::Configured),
            SessionState::Solved(_) => self.redraw(),
        }
    }

    /// Solve the current model, replace the held result and draw it.
    fn solve(&mut self) -> Result<Outcome, SessionError> {
        let model = self.config.model;
        let request = self.problem.request(&model);
        info!(
            "solving {} mesh ({:?} points) with {}",
            model.resolution, request.points_per_axis, model.material
        );
        let solution = self.solver.solve(&request)?;
        let result = SolvedResult::new(solution, model);
        info!(
            "solved {} nodes, {} elements, max displacement {:.3} mm",
            result.summary.node_count,
            result.summary.element_count,
            result.summary.max_displacement
        );
        self.state = SessionState::Solved(result);
        self.redraw()
    }

    /// Send the held result to the renderer with the current view options.
    fn redraw(&mut self) -> Result<Outcome, SessionError> {
        let Self {
            config,
            state,
            renderer,
            ..
        } = self;
        let SessionState::Solved(result) = state else {
            return Ok(Outcome::Configured);
        };
        let mesh = &result.solution.mesh;
        let view = config.view;
        let geometry = RenderGeometry::new(mesh, &result.solution.displacement, view.scale_factor);
        let scene = Scene {
            cells: mesh.cells(),
            points: &geometry.points,
            magnitude: &geometry.magnitude,
            edges: view.show_edges.then_some(result.edges.as_slice()),
            undeformed: view.show_undeformed.then_some(mesh.points()),
            label: scale_label(view.scale_factor),
        };
        renderer.render(&scene)?;
        Ok(Outcome::Rendered(self.report()))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use approx::assert_relative_eq;

    use super::*;
    use crate::errors::{RenderError, SolveError};
    use crate::geometry::{Displacement, Point};
    use crate::postprocess::DisplacementField;
    use crate::solver::{BeamTheorySolver, SolveRequest};

    /// Solver that counts calls and optionally fails.
    #[derive(Debug, Default)]
    struct CountingSolver {
        calls: Cell<usize>,
        fail: Cell<bool>,
    }

    impl Solver for CountingSolver {
        fn solve(&self, request: &SolveRequest) -> Result<Solution, SolveError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                return Err(SolveError::Unsupported("scripted failure".to_owned()));
            }
            BeamTheorySolver::new().solve(request)
        }
    }

    /// Renderer that remembers the last frame.
    #[derive(Debug, Default)]
    struct RecordingRenderer {
        frames: usize,
        points: Vec<Point>,
        edges: bool,
        undeformed: bool,
        label: String,
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, scene: &Scene<'_>) -> Result<(), RenderError> {
            self.frames += 1;
            self.points = scene.points.to_vec();
            self.edges = scene.edges.is_some();
            self.undeformed = scene.undeformed.is_some();
            self.label = scene.label.clone();
            Ok(())
        }
    }

    /// Renderer whose output directory cannot be written.
    #[derive(Debug, Default)]
    struct ReadOnlyRenderer {
        attempts: usize,
    }

    impl Renderer for ReadOnlyRenderer {
        fn render(&mut self, _scene: &Scene<'_>) -> Result<(), RenderError> {
            self.attempts += 1;
            Err(RenderError::Io {
                path: "/read-only/beam.vtu".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    fn coarse_session() -> Session<CountingSolver, RecordingRenderer> {
        let mut config = AppConfig::default();
        config.model.resolution = Resolution::Coarse;
        Session::new(config, CountingSolver::default(), RecordingRenderer::default())
    }

    #[test]
    fn starts_unsolved_and_only_configures() {
        let mut session = coarse_session();
        assert_eq!(session.state(), &SessionState::Unsolved);
        let outcome = session.handle(Event::SetScale(500.0)).expect("valid scale");
        assert_eq!(outcome, Outcome::Configured);
        let outcome = session.handle(Event::ShowUndeformed(true)).expect("toggle");
        assert_eq!(outcome, Outcome::Configured);
        assert_eq!(session.renderer().frames, 0);
        assert_eq!(session.solver().calls.get(), 0);
        match session.handle(Event::Summary).expect("summary") {
            Outcome::Report(text) => assert!(text.contains("About this example")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn solve_transitions_and_renders() {
        let mut session = coarse_session();
        let outcome = session.handle(Event::Solve).expect("solves");
        assert!(matches!(
            outcome,
            Outcome::Rendered(ref report) if report.contains("Number of Nodes:    816")
        ));
        let result = session.result().expect("solved");
        assert_eq!(result.summary.node_count, 816);
        assert_eq!(result.summary.degrees_of_freedom, 2448);
        assert_eq!(session.renderer().frames, 1);
        assert!(session.renderer().edges);
        assert!(!session.renderer().undeformed);
        assert_eq!(session.renderer().label, "Scale Factor: 300x");
    }

    #[test]
    fn visualization_change_redraws_without_solving() {
        let mut session = coarse_session();
        session.handle(Event::Solve).expect("solves");
        let first = session.renderer().points.clone();

        let outcome = session.handle(Event::SetScale(600.0)).expect("valid scale");
        assert!(matches!(outcome, Outcome::Rendered(_)));
        assert_eq!(session.solver().calls.get(), 1);
        assert_eq!(session.renderer().frames, 2);

        // Doubling the scale doubles every offset from the undeformed mesh.
        let mesh = &session.result().expect("solved").solution.mesh;
        for ((p, a), b) in mesh.points().iter().zip(&first).zip(&session.renderer().points) {
            let once = a.to_vector() - p.to_vector();
            let twice = b.to_vector() - p.to_vector();
            assert_relative_eq!(twice, once * 2.0, epsilon = 1.0e-9);
        }

        session.handle(Event::ShowEdges(false)).expect("toggle");
        session.handle(Event::ShowUndeformed(true)).expect("toggle");
        assert_eq!(session.renderer().frames, 4);
        assert!(!session.renderer().edges);
        assert!(session.renderer().undeformed);
        assert_eq!(session.solver().calls.get(), 1);
    }

    #[test]
    fn model_change_waits_for_next_solve() {
        let mut session = coarse_session();
        session.handle(Event::Solve).expect("solves");
        let before = session.result().expect("solved").summary;

        let outcome = session
            .handle(Event::SetMaterial(Material::Aluminum))
            .expect("valid material");
        assert_eq!(outcome, Outcome::Configured);
        assert_eq!(session.renderer().frames, 1);
        assert_eq!(session.result().expect("still solved").summary, before);
        assert!(session.report().contains("run `solve` to update"));

        session.handle(Event::Solve).expect("solves again");
        let after = session.result().expect("solved").summary;
        assert_eq!(session.solver().calls.get(), 2);
        // Aluminum has a higher density-to-stiffness ratio than steel.
        assert!(after.max_displacement > before.max_displacement);
        assert!(!session.report().contains("run `solve` to update"));
    }

    #[test]
    fn failed_solve_keeps_previous_state() {
        let mut session = coarse_session();
        session.solver().fail.set(true);
        let error = session.handle(Event::Solve).expect_err("scripted failure");
        assert!(matches!(error, SessionError::Solve(_)));
        assert_eq!(session.state(), &SessionState::Unsolved);

        session.solver().fail.set(false);
        session.handle(Event::Solve).expect("solves");
        let solved = session.result().expect("solved").clone();

        session.solver().fail.set(true);
        session.handle(Event::SetResolution(Resolution::Fine)).expect("configures");
        session.handle(Event::Solve).expect_err("scripted failure");
        assert_eq!(session.result(), Some(&solved));
        assert_eq!(session.solver().calls.get(), 3);
    }

    #[test]
    fn render_failure_is_reported_without_resolving() {
        let mut config = AppConfig::default();
        config.model.resolution = Resolution::Coarse;
        let mut session = Session::new(
            config,
            CountingSolver::default(),
            ReadOnlyRenderer::default(),
        );

        let error = session.handle(Event::Solve).expect_err("renderer fails");
        assert!(matches!(error, SessionError::Render(RenderError::Io { .. })));
        assert_eq!(session.solver().calls.get(), 1);
        assert!(session.result().is_some());

        let error = session
            .handle(Event::SetScale(450.0))
            .expect_err("redraw fails too");
        assert!(matches!(error, SessionError::Render(_)));
        assert_eq!(session.solver().calls.get(), 1);
        assert_eq!(session.renderer().attempts, 2);
        assert_relative_eq!(session.config().view.scale_factor, 450.0);
    }

    #[test]
    fn invalid_settings_are_rejected_without_change() {
        let mut session = coarse_session();
        let error = session.handle(Event::SetScale(0.0)).expect_err("below slider");
        assert!(matches!(error, SessionError::Config(_)));
        assert_relative_eq!(session.config().view.scale_factor, 300.0);

        let bad = Material::Custom(crate::material::MaterialProperties {
            elastic_modulus: 206_000.0,
            poisson_ratio: 0.6,
            density: 7850.0,
        });
        session.handle(Event::SetMaterial(bad)).expect_err("ratio above bound");
        assert_eq!(session.config().model.material, Material::Steel);
    }

    #[test]
    fn result_holds_one_vector_per_node() {
        let mesh = crate::mesh::Mesh::cube(
            crate::geometry::point(0.0, 0.0, 0.0),
            crate::geometry::point(1.0, 1.0, 1.0),
            [2, 2, 2],
        )
        .expect("valid box");
        let field = DisplacementField::new(vec![Displacement::new(0.0, 0.0, 1.0); 8]);
        let solution = Solution::new(mesh, field).expect("aligned");
        let result = SolvedResult::new(solution, ModelConfig::default());
        assert_eq!(result.edges.len(), 12);
        assert_relative_eq!(result.summary.max_displacement, 1.0);
    }
}
