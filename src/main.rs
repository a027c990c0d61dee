use std::error::Error;
use std::io;
use std::path::PathBuf;

use beamx::{
    run_commands, AppConfig, BeamTheorySolver, CommandSolver, Event, Outcome, Session, Solver,
    VtuRenderer,
};
use log::info;
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "beamx",
    about = "Cantilever beam under gravity: solve, post-process and write VTU files for ParaView"
)]
struct Options {
    /// JSON configuration file
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// External solver program exchanging JSON over stdin/stdout (default: beam theory)
    #[structopt(long, parse(from_os_str))]
    solver: Option<PathBuf>,

    /// Argument passed to the external solver, may be repeated
    #[structopt(long = "solver-arg", number_of_values = 1)]
    solver_args: Vec<String>,

    /// Directory receiving the VTU and PVD files
    #[structopt(long, default_value = ".", parse(from_os_str))]
    out_dir: PathBuf,

    /// File name stem of the output files
    #[structopt(long, default_value = "beam")]
    stem: String,

    /// Solve once, print the report and exit
    #[structopt(long)]
    batch: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let options = Options::from_args();

    let config = match &options.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };

    let solver: Box<dyn Solver> = match &options.solver {
        Some(program) => {
            info!("using external solver {}", program.display());
            Box::new(CommandSolver::new(program).with_args(&options.solver_args))
        }
        None => Box::new(BeamTheorySolver::new()),
    };
    let renderer = VtuRenderer::new(&options.out_dir, options.stem.as_str());
    let mut session = Session::new(config, solver, renderer);

    if options.batch {
        if let Outcome::Rendered(report) = session.handle(Event::Solve)? {
            println!("{report}");
        }
        println!(
            "Open {} in ParaView to view the result.",
            session.renderer().collection_path().display()
        );
        return Ok(());
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_commands(&mut session, stdin.lock(), &mut stdout)?;
    Ok(())
}
