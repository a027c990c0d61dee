//! Plain-text reports shown next to the rendered beam.

use std::fmt::Write;

use crate::config::ViewOptions;
use crate::material::Material;
use crate::postprocess::Summary;

/// Render the textual results panel for a solved beam.
///
/// The report has three blocks: the response values, the model size, and a legend
/// for the color map of the rendered view.
#[must_use]
pub fn render_summary(summary: &Summary, material: &Material, view: &ViewOptions) -> String {
    let mut output = String::new();

    output.push_str("Results Summary\n");
    writeln!(
        &mut output,
        "  Maximum Displacement:      {:.3} mm",
        summary.max_displacement
    )
    .expect("writing to string cannot fail");
    writeln!(
        &mut output,
        "  Max Vertical Displacement: {:.3} mm",
        summary.max_vertical
    )
    .expect("writing to string cannot fail");
    writeln!(
        &mut output,
        "  Min Vertical Displacement: {:.3} mm",
        summary.min_vertical
    )
    .expect("writing to string cannot fail");

    output.push_str("\nModel Information\n");
    writeln!(&mut output, "  Number of Nodes:    {}", summary.node_count)
        .expect("writing to string cannot fail");
    writeln!(&mut output, "  Number of Elements: {}", summary.element_count)
        .expect("writing to string cannot fail");
    writeln!(
        &mut output,
        "  Degrees of Freedom: {}",
        summary.degrees_of_freedom
    )
    .expect("writing to string cannot fail");

    output.push_str("\nVisualization Info\n");
    output.push_str("  - Red: Maximum displacement\n");
    output.push_str("  - Blue: Minimum displacement\n");
    writeln!(
        &mut output,
        "  - Scale: {}x magnification",
        view.scale_factor
    )
    .expect("writing to string cannot fail");
    writeln!(&mut output, "  - Material: {}", material.name())
        .expect("writing to string cannot fail");

    output
}

/// Caption drawn in the corner of the rendered view.
#[must_use]
pub fn scale_label(scale_factor: f64) -> String {
    format!("Scale Factor: {scale_factor}x")
}

/// Note appended to a report when the displayed result predates the configuration.
#[must_use]
pub fn render_pending_notice(material: &Material, resolution: &str) -> String {
    format!(
        "Note: configuration changed to {resolution} mesh, {}; run `solve` to update the result.\n",
        material.name()
    )
}

/// Text shown before the first solve.
#[must_use]
pub fn render_introduction() -> String {
    let mut output = String::new();
    output.push_str("Configure the parameters and run `solve` to start the simulation.\n\n");
    output.push_str("About this example\n");
    output.push_str("This simulation models a cantilever beam:\n");
    output.push_str("  - Dimensions: 2000mm x 100mm x 100mm\n");
    output.push_str("  - Boundary Condition: Fixed at x=0 (left end)\n");
    output.push_str("  - Loading: Gravity acting on the beam's own weight\n");
    output.push_str("  - Analysis Type: Linear elastic\n\n");
    output.push_str(
        "The beam will deflect under its own weight, with maximum displacement at the free end.\n",
    );
    output
}
