#![warn(clippy::pedantic)]

use std::cell::Cell;
use std::fs;
use std::path::PathBuf;

use approx::assert_relative_eq;
use beamx::{
    run_commands, AppConfig, BeamTheorySolver, Event, Material, Outcome, Resolution, Session,
    SessionState, SolveError, SolveRequest, Solution, Solver, VtuRenderer, MAGNITUDE_FIELD,
};

/// Beam theory solver that counts how often it is asked to solve.
#[derive(Default)]
struct CountingSolver {
    calls: Cell<usize>,
}

impl Solver for CountingSolver {
    fn solve(&self, request: &SolveRequest) -> Result<Solution, SolveError> {
        self.calls.set(self.calls.get() + 1);
        BeamTheorySolver::new().solve(request)
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("beamx-it-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn coarse_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.model.resolution = Resolution::Coarse;
    config
}

#[test]
fn tip_deflection_matches_closed_form() {
    let dir = scratch_dir("tip");
    let mut session = Session::new(
        coarse_config(),
        BeamTheorySolver::new(),
        VtuRenderer::new(&dir, "beam"),
    );
    session.handle(Event::Solve).expect("solve succeeds");

    let result = session.result().expect("solved");
    let properties = Material::Steel.properties();
    let area = 100.0 * 100.0;
    let second_moment = 100.0_f64.powi(4) / 12.0;
    let q = properties.density_t_per_mm3() * 9810.0 * area;
    let expected = q * 2000.0_f64.powi(4) / (8.0 * properties.elastic_modulus * second_moment);

    assert_relative_eq!(result.summary.max_vertical, expected, max_relative = 1e-9);
    assert_relative_eq!(result.summary.min_vertical, 0.0, epsilon = 1e-12);
    assert!(result.summary.max_displacement >= result.summary.max_vertical);
    assert_eq!(result.summary.node_count, 51 * 4 * 4);
    assert_eq!(result.summary.element_count, 50 * 3 * 3);
    assert_eq!(result.summary.degrees_of_freedom, 3 * 51 * 4 * 4);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn solved_frame_is_written_for_paraview() {
    let dir = scratch_dir("frame");
    let mut session = Session::new(
        coarse_config(),
        BeamTheorySolver::new(),
        VtuRenderer::new(&dir, "beam"),
    );
    session.handle(Event::Solve).expect("solve succeeds");

    // Edges are shown by default.
    assert_eq!(session.renderer().written().len(), 3);
    let grid = fs::read_to_string(dir.join("beam.vtu")).expect("grid written");
    assert!(grid.contains(&format!("Name=\"{MAGNITUDE_FIELD}\"")));
    assert!(grid.contains("NumberOfPoints=\"816\" NumberOfCells=\"450\""));

    session
        .handle(Event::ShowUndeformed(true))
        .expect("redraw succeeds");
    let collection = fs::read_to_string(session.renderer().collection_path()).expect("pvd");
    assert!(collection.contains("beam_undeformed.vtu"));
    assert!(collection.contains("Scale Factor: 300x"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn scripted_session_solves_once_and_reports() {
    let dir = scratch_dir("script");
    let mut session = Session::new(
        coarse_config(),
        CountingSolver::default(),
        VtuRenderer::new(&dir, "beam"),
    );
    let script = "\
# configure and solve
material aluminum
solve
scale 1000
bogus
edges off
summary
quit
solve
";
    let mut output = Vec::new();
    run_commands(&mut session, script.as_bytes(), &mut output).expect("in-memory io");
    let output = String::from_utf8(output).expect("utf-8 output");

    assert!(output.starts_with("Configure the parameters"));
    assert!(output.contains("ok"));
    assert!(output.contains("Material: Aluminum"));
    assert!(output.contains("Scale: 1000x magnification"));
    assert!(output.contains("error: unknown command `bogus`"));
    assert_eq!(session.solver().calls.get(), 1);
    assert!(matches!(session.state(), SessionState::Solved(_)));
    assert_eq!(session.renderer().written().len(), 2);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn rejected_settings_keep_session_running() {
    let dir = scratch_dir("rejected");
    let mut session = Session::new(
        coarse_config(),
        CountingSolver::default(),
        VtuRenderer::new(&dir, "beam"),
    );
    let script = "scale 5000\nmaterial custom 0.5 0.3 7850\nsolve\n";
    let mut output = Vec::new();
    run_commands(&mut session, script.as_bytes(), &mut output).expect("in-memory io");
    let output = String::from_utf8(output).expect("utf-8 output");

    assert!(output.contains("error: scale factor must lie in [1, 1000]"));
    assert!(output
        .contains("error: `material` rejected: Young's modulus must be at least 1 MPa"));
    assert!(output.contains("Material: Steel"));
    assert_relative_eq!(session.config().view.scale_factor, 300.0);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn configuration_file_drives_the_session() {
    let dir = scratch_dir("config");
    fs::create_dir_all(&dir).expect("scratch dir");
    let path = dir.join("beam.json");
    fs::write(
        &path,
        r#"{"model": {"resolution": "coarse", "material": {"kind": "concrete"}},
            "view": {"scale_factor": 50, "show_edges": false}}"#,
    )
    .expect("config written");

    let config = AppConfig::from_file(&path).expect("valid configuration");
    let mut session = Session::new(
        config,
        BeamTheorySolver::new(),
        VtuRenderer::new(&dir, "concrete"),
    );
    let Outcome::Rendered(report) = session.handle(Event::Solve).expect("solve succeeds") else {
        panic!("solving renders a frame");
    };
    assert!(report.contains("Material: Concrete"));
    assert!(report.contains("Scale: 50x magnification"));
    assert_eq!(session.renderer().written().len(), 2);
    assert!(dir.join("concrete.pvd").exists());

    let _ = fs::remove_dir_all(&dir);
}
