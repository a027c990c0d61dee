//! Rendering collaborators for post-processed beam results.
//!
//! The crate does not draw anything itself. A [`Scene`] describes what should be
//! shown and a [`Renderer`] hands it to a viewer; [`VtuRenderer`] writes ParaView
//! files.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use log::info;

use crate::errors::RenderError;
use crate::geometry::Point;
use crate::mesh::Hexahedron;

/// Name of the color-mapped point data array.
pub const MAGNITUDE_FIELD: &str = "Displacement Magnitude";

/// VTK cell type identifier of a two-node line.
const VTK_LINE: u8 = 3;
/// VTK cell type identifier of an eight-node hexahedron.
const VTK_HEXAHEDRON: u8 = 12;

/// Everything a viewer needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene<'a> {
    /// Hexahedral connectivity shared by every layer.
    pub cells: &'a [Hexahedron],
    /// Deformed node positions.
    pub points: &'a [Point],
    /// Scalar used for coloring, one value per node.
    pub magnitude: &'a [f64],
    /// Element edges to draw on top of the deformed shape.
    pub edges: Option<&'a [[usize; 2]]>,
    /// Undeformed node positions for a semi-transparent overlay.
    pub undeformed: Option<&'a [Point]>,
    /// Caption shown in the upper left corner.
    pub label: String,
}

/// External collaborator that displays a [`Scene`].
pub trait Renderer {
    /// Draw the scene, replacing whatever was drawn before.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the scene cannot be drawn.
    fn render(&mut self, scene: &Scene<'_>) -> Result<(), RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, scene: &Scene<'_>) -> Result<(), RenderError> {
        (**self).render(scene)
    }
}

/// Cells of one unstructured grid piece.
#[derive(Clone, Copy, Debug)]
enum Cells<'a> {
    /// Solid elements.
    Hexahedra(&'a [Hexahedron]),
    /// Wireframe segments.
    Lines(&'a [[usize; 2]]),
}

impl Cells<'_> {
    /// Number of cells.
    fn len(&self) -> usize {
        match self {
            Cells::Hexahedra(cells) => cells.len(),
            Cells::Lines(lines) => lines.len(),
        }
    }

    /// Node indices of every cell in order.
    fn connectivity(&self) -> Box<dyn Iterator<Item = &[usize]> + '_> {
        match self {
            Cells::Hexahedra(cells) => Box::new(cells.iter().map(|c| c.as_slice())),
            Cells::Lines(lines) => Box::new(lines.iter().map(|l| l.as_slice())),
        }
    }

    /// VTK cell type code shared by all cells.
    fn vtk_type(&self) -> u8 {
        match self {
            Cells::Hexahedra(_) => VTK_HEXAHEDRON,
            Cells::Lines(_) => VTK_LINE,
        }
    }
}

/// Write one ASCII VTU unstructured grid.
fn write_grid<W: Write>(
    out: &mut W,
    points: &[Point],
    cells: Cells<'_>,
    scalars: Option<(&str, &[f64])>,
) -> io::Result<()> {
    writeln!(out, "<?xml version=\"1.0\"?>")?;
    writeln!(
        out,
        "<VTKFile type=\"UnstructuredGrid\" version=\"0.1\" byte_order=\"LittleEndian\">"
    )?;
    writeln!(out, "<UnstructuredGrid>")?;
    writeln!(
        out,
        "<Piece NumberOfPoints=\"{}\" NumberOfCells=\"{}\">",
        points.len(),
        cells.len()
    )?;

    // nodes: coordinates
    writeln!(out, "<Points>")?;
    writeln!(
        out,
        "<DataArray type=\"Float64\" NumberOfComponents=\"3\" format=\"ascii\">"
    )?;
    for p in points {
        write!(out, "{:?} {:?} {:?} ", p.x, p.y, p.z)?;
    }
    writeln!(out, "\n</DataArray>")?;
    writeln!(out, "</Points>")?;

    // elements: connectivity, offsets and types
    writeln!(out, "<Cells>")?;
    writeln!(
        out,
        "<DataArray type=\"Int32\" Name=\"connectivity\" format=\"ascii\">"
    )?;
    for nodes in cells.connectivity() {
        for node in nodes {
            write!(out, "{node} ")?;
        }
    }
    writeln!(out, "\n</DataArray>")?;
    writeln!(
        out,
        "<DataArray type=\"Int32\" Name=\"offsets\" format=\"ascii\">"
    )?;
    let mut offset = 0;
    for nodes in cells.connectivity() {
        offset += nodes.len();
        write!(out, "{offset} ")?;
    }
    writeln!(out, "\n</DataArray>")?;
    writeln!(
        out,
        "<DataArray type=\"UInt8\" Name=\"types\" format=\"ascii\">"
    )?;
    let vtk_type = cells.vtk_type();
    for _ in 0..cells.len() {
        write!(out, "{vtk_type} ")?;
    }
    writeln!(out, "\n</DataArray>")?;
    writeln!(out, "</Cells>")?;

    // data: points
    if let Some((name, values)) = scalars {
        writeln!(out, "<PointData Scalars=\"{name}\">")?;
        writeln!(
            out,
            "<DataArray type=\"Float64\" Name=\"{name}\" NumberOfComponents=\"1\" format=\"ascii\">"
        )?;
        for value in values {
            write!(out, "{value:?} ")?;
        }
        writeln!(out, "\n</DataArray>")?;
        writeln!(out, "</PointData>")?;
    }

    writeln!(out, "</Piece>")?;
    writeln!(out, "</UnstructuredGrid>")?;
    writeln!(out, "</VTKFile>")?;
    Ok(())
}

/// Write a PVD collection referencing the given pieces.
fn write_collection<W: Write>(out: &mut W, label: &str, files: &[String]) -> io::Result<()> {
    writeln!(out, "<?xml version=\"1.0\"?>")?;
    writeln!(out, "<!-- {label} -->")?;
    writeln!(
        out,
        "<VTKFile type=\"Collection\" version=\"0.1\" byte_order=\"LittleEndian\">"
    )?;
    writeln!(out, "<Collection>")?;
    for (part, file) in files.iter().enumerate() {
        let file = escape_attribute(file);
        writeln!(out, "<DataSet timestep=\"0\" part=\"{part}\" file=\"{file}\" />")?;
    }
    writeln!(out, "</Collection>")?;
    writeln!(out, "</VTKFile>")?;
    Ok(())
}

/// Escape the characters that cannot appear verbatim in an XML attribute value.
fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renderer that writes ParaView VTU pieces and a PVD collection.
///
/// Every frame overwrites `<stem>.vtu` (deformed, colored by
/// [`MAGNITUDE_FIELD`]), `<stem>_edges.vtu` when edges are shown,
/// `<stem>_undeformed.vtu` when the overlay is shown, and `<stem>.pvd` which lists
/// the pieces of the current frame.
#[derive(Clone, Debug)]
pub struct VtuRenderer {
    /// Directory receiving the files.
    out_dir: PathBuf,
    /// Common file name stem.
    stem: String,
    /// Files produced by the most recent frame, collection last.
    written: Vec<PathBuf>,
}

impl VtuRenderer {
    /// Create a renderer writing `<out_dir>/<stem>*.vtu`.
    #[must_use]
    pub fn new(out_dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            out_dir: out_dir.into(),
            stem: stem.into(),
            written: Vec::new(),
        }
    }

    /// Files written by the most recent frame.
    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Path of the PVD collection to open in ParaView.
    #[must_use]
    pub fn collection_path(&self) -> PathBuf {
        self.out_dir.join(format!("{}.pvd", self.stem))
    }

    /// Create `<out_dir>/<name>` and fill it with `write`.
    fn write_file<F>(&self, name: &str, write: F) -> Result<PathBuf, RenderError>
    where
        F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
    {
        let path = self.out_dir.join(name);
        let io_error = |source| RenderError::Io {
            path: path.clone(),
            source,
        };
        let file = File::create(&path).map_err(io_error)?;
        let mut out = BufWriter::new(file);
        write(&mut out).map_err(io_error)?;
        out.flush().map_err(io_error)?;
        Ok(path)
    }
}

impl Renderer for VtuRenderer {
    fn render(&mut self, scene: &Scene<'_>) -> Result<(), RenderError> {
        if scene.cells.is_empty() {
            return Err(RenderError::EmptyScene);
        }
        fs::create_dir_all(&self.out_dir).map_err(|source| RenderError::Io {
            path: self.out_dir.clone(),
            source,
        })?;

        let mut pieces = vec![format!("{}.vtu", self.stem)];
        let mut written = vec![self.write_file(&pieces[0], |out| {
            write_grid(
                out,
                scene.points,
                Cells::Hexahedra(scene.cells),
                Some((MAGNITUDE_FIELD, scene.magnitude)),
            )
        })?];

        if let Some(edges) = scene.edges {
            let name = format!("{}_edges.vtu", self.stem);
            written.push(self.write_file(&name, |out| {
                write_grid(out, scene.points, Cells::Lines(edges), None)
            })?);
            pieces.push(name);
        }

        if let Some(undeformed) = scene.undeformed {
            let name = format!("{}_undeformed.vtu", self.stem);
            written.push(self.write_file(&name, |out| {
                write_grid(out, undeformed, Cells::Hexahedra(scene.cells), None)
            })?);
            pieces.push(name);
        }

        let collection = format!("{}.pvd", self.stem);
        written.push(self.write_file(&collection, |out| {
            write_collection(out, &scene.label, &pieces)
        })?);

        info!(
            "rendered {} ({} pieces) to {}",
            scene.label,
            pieces.len(),
            self.collection_path().display()
        );
        self.written = written;
        Ok(())
    }
}
