//! Point clouds and their PLY and PCD I/O.

use crate::error::{GeometryError, Result};
use crate::pcd::{self, PcdEncoding};
use crate::ply::{self, NORMAL, POSITION, PlyBuilder, PlyEncoding, VERTEX};
use camino::Utf8Path;
use log::debug;
use ply_rs::ply::{DefaultElement, PropertyType};
use std::fmt;

/// A set of points with optional per-point normals and colours.
///
/// `normals` and `colors` are either empty or as long as `points`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    /// Point positions.
    pub points: Vec<[f64; 3]>,
    /// Per-point normals.
    pub normals: Vec<[f64; 3]>,
    /// Per-point RGB colours.
    pub colors: Vec<[u8; 3]>,
}

impl PointCloud {
    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true when the cloud has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns true when every point has a normal.
    #[must_use]
    pub fn has_normals(&self) -> bool {
        !self.points.is_empty() && self.normals.len() == self.points.len()
    }

    /// Returns true when every point has a colour.
    #[must_use]
    pub fn has_colors(&self) -> bool {
        !self.points.is_empty() && self.colors.len() == self.points.len()
    }
}

impl fmt::Display for PointCloud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PointCloud with {} points.", self.len())
    }
}

/// On-disk format and encoding of a point cloud file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudEncoding {
    /// A PLY file.
    Ply(PlyEncoding),
    /// A PCD file.
    Pcd(PcdEncoding),
}

impl CloudEncoding {
    /// The PLY encoding closest to this one.
    #[must_use]
    pub fn as_ply(self) -> PlyEncoding {
        match self {
            Self::Ply(encoding) => encoding,
            Self::Pcd(PcdEncoding::Ascii) => PlyEncoding::Ascii,
            Self::Pcd(PcdEncoding::Binary) => PlyEncoding::BinaryLittleEndian,
        }
    }

    /// The PCD encoding closest to this one.
    #[must_use]
    pub fn as_pcd(self) -> PcdEncoding {
        match self {
            Self::Pcd(encoding) => encoding,
            Self::Ply(PlyEncoding::Ascii) => PcdEncoding::Ascii,
            Self::Ply(_) => PcdEncoding::Binary,
        }
    }
}

impl From<PlyEncoding> for CloudEncoding {
    fn from(encoding: PlyEncoding) -> Self {
        Self::Ply(encoding)
    }
}

impl From<PcdEncoding> for CloudEncoding {
    fn from(encoding: PcdEncoding) -> Self {
        Self::Pcd(encoding)
    }
}

enum CloudFormat {
    Ply,
    Pcd,
}

fn format_of(path: &Utf8Path) -> Result<CloudFormat> {
    match path.extension().map(str::to_ascii_lowercase).as_deref() {
        Some("ply") => Ok(CloudFormat::Ply),
        Some("pcd") => Ok(CloudFormat::Pcd),
        _ => Err(GeometryError::UnsupportedFormat {
            path: path.to_owned(),
            expected: ".ply or .pcd",
        }),
    }
}

/// Reads a point cloud from a PLY or PCD file, chosen by extension.
///
/// # Errors
///
/// Returns [`GeometryError::UnsupportedFormat`] for other extensions, or
/// an I/O, parse, missing element, or missing property error.
pub fn read_point_cloud(path: &Utf8Path) -> Result<PointCloud> {
    read_point_cloud_with_encoding(path).map(|(cloud, _)| cloud)
}

/// Reads a point cloud and reports the file's encoding.
///
/// # Errors
///
/// As for [`read_point_cloud`].
pub fn read_point_cloud_with_encoding(path: &Utf8Path) -> Result<(PointCloud, CloudEncoding)> {
    match format_of(path)? {
        CloudFormat::Ply => {
            let (cloud, encoding) = read_ply(path)?;
            Ok((cloud, encoding.into()))
        }
        CloudFormat::Pcd => {
            let (cloud, encoding) = pcd::read(path)?;
            Ok((cloud, encoding.into()))
        }
    }
}

fn read_ply(path: &Utf8Path) -> Result<(PointCloud, PlyEncoding)> {
    let ply = ply::read(path)?;
    let vertices = ply::elements(&ply, path, VERTEX)?;

    let points = vertices
        .iter()
        .enumerate()
        .map(|(index, vertex)| ply::required_triple(vertex, POSITION, path, index))
        .collect::<Result<Vec<_>>>()?;
    // Attributes only count when every vertex carries them.
    let normals = vertices
        .iter()
        .map(|vertex| ply::triple(vertex, NORMAL))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default();
    let colors = vertices
        .iter()
        .map(ply::color)
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default();

    let cloud = PointCloud {
        points,
        normals,
        colors,
    };
    debug!(
        "{path}: {} points, normals: {}, colours: {}",
        cloud.len(),
        cloud.has_normals(),
        cloud.has_colors()
    );
    Ok((cloud, ply.header.encoding.into()))
}

/// Writes `cloud` as PLY or PCD, chosen by extension.
///
/// The encoding is mapped onto the target format when it names the other
/// one, so a binary PLY encoding writes a binary PCD file.
///
/// # Errors
///
/// Returns [`GeometryError::UnsupportedFormat`] for other extensions, or
/// an I/O or encoder error when writing fails.
pub fn write_point_cloud(
    path: &Utf8Path,
    cloud: &PointCloud,
    encoding: impl Into<CloudEncoding>,
) -> Result<()> {
    let encoding = encoding.into();
    match format_of(path)? {
        CloudFormat::Ply => write_ply(path, cloud, encoding.as_ply()),
        CloudFormat::Pcd => pcd::write(path, cloud, encoding.as_pcd()),
    }
}

fn write_ply(path: &Utf8Path, cloud: &PointCloud, encoding: PlyEncoding) -> Result<()> {
    let mut builder = PlyBuilder::new(encoding);
    let (properties, rows) = vertex_rows(
        &cloud.points,
        cloud.has_normals().then_some(cloud.normals.as_slice()),
        cloud.has_colors().then_some(cloud.colors.as_slice()),
    );
    builder.element(VERTEX, &properties, rows);
    builder.write(path)
}

/// Vertex property layout and rows for positions with optional attributes.
pub(crate) fn vertex_rows(
    points: &[[f64; 3]],
    normals: Option<&[[f64; 3]]>,
    colors: Option<&[[u8; 3]]>,
) -> (Vec<(&'static str, PropertyType)>, Vec<DefaultElement>) {
    let mut properties: Vec<_> = POSITION.iter().map(|name| (*name, ply::double())).collect();
    if normals.is_some() {
        properties.extend(NORMAL.iter().map(|name| (*name, ply::double())));
    }
    if colors.is_some() {
        properties.extend(ply::COLOR.iter().map(|name| (*name, ply::uchar())));
    }

    let rows = points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let mut row = DefaultElement::new();
            ply::push_doubles(&mut row, POSITION, *point);
            if let Some(normal) = normals.and_then(|normals| normals.get(index)) {
                ply::push_doubles(&mut row, NORMAL, *normal);
            }
            if let Some(rgb) = colors.and_then(|colors| colors.get(index)) {
                ply::push_color(&mut row, *rgb);
            }
            row
        })
        .collect();

    (properties, rows)
}
