//! Triangle meshes and their PLY I/O.

use crate::error::{GeometryError, Result};
use crate::point_cloud::vertex_rows;
use crate::ply::{self, FACE, NORMAL, POSITION, PlyBuilder, PlyEncoding, VERTEX};
use camino::Utf8Path;
use log::debug;
use ply_rs::ply::{DefaultElement, Property};
use std::fmt;

/// Property name used for the face index list on output.
const FACE_INDEX_PROPERTY: &str = "vertex_indices";

/// A mesh of indexed triangles with optional per-vertex normals and colours.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<[f64; 3]>,
    /// Per-vertex normals; empty or as long as `vertices`.
    pub vertex_normals: Vec<[f64; 3]>,
    /// Per-vertex RGB colours; empty or as long as `vertices`.
    pub vertex_colors: Vec<[u8; 3]>,
    /// Triangles as indices into `vertices`.
    pub triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Returns true when every vertex has a normal.
    #[must_use]
    pub fn has_vertex_normals(&self) -> bool {
        !self.vertices.is_empty() && self.vertex_normals.len() == self.vertices.len()
    }

    /// Returns true when every vertex has a colour.
    #[must_use]
    pub fn has_vertex_colors(&self) -> bool {
        !self.vertices.is_empty() && self.vertex_colors.len() == self.vertices.len()
    }
}

impl fmt::Display for TriangleMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TriangleMesh with {} points and {} triangles.",
            self.vertices.len(),
            self.triangles.len()
        )
    }
}

/// Reads a triangle mesh from a PLY file.
///
/// Polygons with more than three corners are split into a triangle fan. A
/// file without a face element yields a mesh with no triangles.
///
/// # Errors
///
/// Returns [`GeometryError::UnsupportedFormat`] for non-PLY paths,
/// [`GeometryError::MalformedElement`] for faces with fewer than three
/// corners or out-of-range indices, or an I/O, missing element, or missing
/// property error.
pub fn read_triangle_mesh(path: &Utf8Path) -> Result<TriangleMesh> {
    read_triangle_mesh_with_encoding(path).map(|(mesh, _)| mesh)
}

/// Reads a triangle mesh and reports the file's encoding.
///
/// # Errors
///
/// As for [`read_triangle_mesh`].
pub fn read_triangle_mesh_with_encoding(
    path: &Utf8Path,
) -> Result<(TriangleMesh, PlyEncoding)> {
    let ply = ply::read(path)?;
    let vertex_rows = ply::elements(&ply, path, VERTEX)?;

    let vertices = vertex_rows
        .iter()
        .enumerate()
        .map(|(index, vertex)| ply::required_triple(vertex, POSITION, path, index))
        .collect::<Result<Vec<_>>>()?;
    let vertex_normals = vertex_rows
        .iter()
        .map(|vertex| ply::triple(vertex, NORMAL))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default();
    let vertex_colors = vertex_rows
        .iter()
        .map(ply::color)
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default();

    let mut triangles = Vec::new();
    for (index, face) in ply::optional_elements(&ply, FACE).iter().enumerate() {
        let malformed = |reason: String| GeometryError::MalformedElement {
            path: path.to_owned(),
            element: FACE,
            index,
            reason,
        };
        let corners = ply::face_indices(face)
            .map_err(malformed)?
            .ok_or_else(|| malformed("no vertex index list".to_owned()))?;
        if let Some(&out_of_range) = corners.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(malformed(format!(
                "vertex index {out_of_range} exceeds {} vertices",
                vertices.len()
            )));
        }
        triangulate(&corners, &mut triangles).map_err(malformed)?;
    }

    let mesh = TriangleMesh {
        vertices,
        vertex_normals,
        vertex_colors,
        triangles,
    };
    debug!("{path}: {mesh}");
    Ok((mesh, ply.header.encoding.into()))
}

/// Splits a polygon into a fan of triangles around its first corner.
fn triangulate(
    corners: &[u32],
    triangles: &mut Vec<[u32; 3]>,
) -> std::result::Result<(), String> {
    let [first, rest @ ..] = corners else {
        return Err("face has no corners".to_owned());
    };
    if rest.len() < 2 {
        return Err(format!("face has {} corners", corners.len()));
    }
    triangles.extend(rest.windows(2).map(|pair| [*first, pair[0], pair[1]]));
    Ok(())
}

/// Writes `mesh` to a PLY file with the given encoding.
///
/// # Errors
///
/// Returns [`GeometryError::UnsupportedFormat`] for non-PLY paths or
/// [`GeometryError::Io`] when writing fails.
pub fn write_triangle_mesh(
    path: &Utf8Path,
    mesh: &TriangleMesh,
    encoding: PlyEncoding,
) -> Result<()> {
    let mut builder = PlyBuilder::new(encoding);
    let (properties, rows) = vertex_rows(
        &mesh.vertices,
        mesh.has_vertex_normals()
            .then_some(mesh.vertex_normals.as_slice()),
        mesh.has_vertex_colors().then_some(mesh.vertex_colors.as_slice()),
    );
    builder.element(VERTEX, &properties, rows);

    let faces = mesh
        .triangles
        .iter()
        .map(|triangle| {
            let mut row = DefaultElement::new();
            row.insert(
                FACE_INDEX_PROPERTY.to_owned(),
                Property::ListUInt(triangle.to_vec()),
            );
            row
        })
        .collect();
    builder.element(FACE, &[(FACE_INDEX_PROPERTY, ply::index_list())], faces);
    builder.write(path)
}
