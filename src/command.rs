//! Line-oriented commands for the interactive front-end.

use std::io::{self, BufRead, Write};

use log::debug;

use crate::config::Resolution;
use crate::errors::CommandError;
use crate::material::Material;
use crate::render::Renderer;
use crate::session::{Event, Outcome, Session};
use crate::solver::Solver;

/// Help text listing every command.
pub const HELP: &str = "\
Commands:
  resolution <coarse|medium|fine>       pick the mesh resolution
  material <steel|aluminum|concrete>    pick a material preset
  material custom <E> <nu> <density>    E in MPa, density in kg/m³
  scale <factor>                        displacement scale factor (1-1000)
  edges <on|off>                        show mesh edges
  undeformed <on|off>                   overlay the undeformed shape
  solve                                 create the mesh and solve
  summary                               print the results summary
  help                                  show this list
  quit                                  leave the session";

/// A parsed command line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Forward an event to the session.
    Event(Event),
    /// Print [`HELP`].
    Help,
    /// End the session.
    Quit,
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
///
/// # Errors
///
/// Returns [`CommandError`] when the command word or its arguments are not understood.
///
/// # Examples
/// ```
/// use beamx::{parse_command, Command, Event};
///
/// let command = parse_command("scale 450")?;
/// assert_eq!(command, Some(Command::Event(Event::SetScale(450.0))));
/// # Ok::<(), beamx::CommandError>(())
/// ```
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.split('#').next().unwrap_or_default();
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match word.to_ascii_lowercase().as_str() {
        "resolution" => {
            let value = single(&args, "resolution", "coarse, medium or fine")?;
            let resolution = value
                .parse::<Resolution>()
                .map_err(|_| invalid("resolution", value, "coarse, medium or fine"))?;
            Command::Event(Event::SetResolution(resolution))
        }
        "material" => Command::Event(Event::SetMaterial(parse_material(&args)?)),
        "scale" => {
            let value = single(&args, "scale", "a number")?;
            Command::Event(Event::SetScale(number("scale", value, "a number")?))
        }
        "edges" => Command::Event(Event::ShowEdges(switch(&args, "edges")?)),
        "undeformed" => Command::Event(Event::ShowUndeformed(switch(&args, "undeformed")?)),
        "solve" => Command::Event(Event::Solve),
        "summary" => Command::Event(Event::Summary),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(CommandError::Unknown(word.to_owned())),
    };
    Ok(Some(command))
}

/// Drive `session` with commands read line by line from `input`.
///
/// Reports and error messages go to `output`. Bad commands and failed solves are
/// reported and the loop continues; it stops at end of input or on `quit`.
///
/// # Errors
///
/// Returns an [`io::Error`] when reading `input` or writing `output` fails.
pub fn run_commands<S, R, I, O>(
    session: &mut Session<S, R>,
    input: I,
    output: &mut O,
) -> io::Result<()>
where
    S: Solver,
    R: Renderer,
    I: BufRead,
    O: Write,
{
    writeln!(output, "{}", session.report())?;
    for line in input.lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(error) => {
                writeln!(output, "error: {error}")?;
                continue;
            }
        };
        debug!("command {command:?}");
        match command {
            Command::Help => writeln!(output, "{HELP}")?,
            Command::Quit => break,
            Command::Event(event) => match session.handle(event) {
                Ok(Outcome::Configured) => writeln!(output, "ok")?,
                Ok(Outcome::Rendered(report) | Outcome::Report(report)) => {
                    writeln!(output, "{report}")?;
                }
                Err(error) => writeln!(output, "error: {error}")?,
            },
        }
    }
    Ok(())
}

/// Parse the arguments of `material`: a preset name or `custom <E> <nu> <density>`.
fn parse_material(args: &[&str]) -> Result<Material, CommandError> {
    /// Accepted argument forms.
    const EXPECTED: &str = "steel, aluminum, concrete or `custom <E> <nu> <density>`";
    match args {
        [] => Err(CommandError::MissingArgument {
            command: "material",
            expected: EXPECTED,
        }),
        [name] => Material::preset(name).ok_or_else(|| invalid("material", name, EXPECTED)),
        [kind, e, nu, density] if kind.eq_ignore_ascii_case("custom") => {
            let e = number("material", e, "a Young's modulus in MPa")?;
            let nu = number("material", nu, "a Poisson's ratio")?;
            let density = number("material", density, "a density in kg/m³")?;
            Material::custom(e, nu, density).map_err(|error| CommandError::Rejected {
                command: "material",
                reason: error.to_string(),
            })
        }
        _ => Err(invalid("material", &args.join(" "), EXPECTED)),
    }
}

/// The only argument of `command`.
fn single<'a>(
    args: &[&'a str],
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, CommandError> {
    match args {
        [value] => Ok(*value),
        [] => Err(CommandError::MissingArgument { command, expected }),
        _ => Err(invalid(command, &args.join(" "), expected)),
    }
}

/// An `on`/`off` argument.
fn switch(args: &[&str], command: &'static str) -> Result<bool, CommandError> {
    let value = single(args, command, "on or off")?;
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => Err(invalid(command, value, "on or off")),
    }
}

/// A finite number argument.
fn number(command: &'static str, value: &str, expected: &'static str) -> Result<f64, CommandError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| invalid(command, value, expected))
}

/// Build a [`CommandError::InvalidArgument`].
fn invalid(command: &'static str, value: &str, expected: &'static str) -> CommandError {
    CommandError::InvalidArgument {
        command,
        value: value.to_owned(),
        expected,
    }
}
