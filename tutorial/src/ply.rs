//! PLY reading and writing shared by point clouds and meshes.
//!
//! Parsing and encoding are delegated to `ply-rs`. This module adds the
//! format check, typed property lookups and the element layout written
//! back out.

use crate::error::{GeometryError, Result};
use camino::Utf8Path;
use log::debug;
use ply_rs::parser::Parser;
use ply_rs::ply::{
    Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType,
    ScalarType,
};
use ply_rs::writer::Writer;
use std::fs;
use std::io::{BufWriter, Write};

pub(crate) const VERTEX: &str = "vertex";
pub(crate) const FACE: &str = "face";

/// Names of the position, normal and colour properties of a vertex.
pub(crate) const POSITION: [&str; 3] = ["x", "y", "z"];
pub(crate) const NORMAL: [&str; 3] = ["nx", "ny", "nz"];
pub(crate) const COLOR: [&str; 3] = ["red", "green", "blue"];

/// Face index list property names, in lookup order.
const FACE_INDICES: [&str; 2] = ["vertex_indices", "vertex_index"];

/// On-disk encoding of a PLY file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlyEncoding {
    /// Human-readable text.
    #[default]
    Ascii,
    /// Little-endian binary.
    BinaryLittleEndian,
    /// Big-endian binary.
    BinaryBigEndian,
}

impl From<Encoding> for PlyEncoding {
    fn from(encoding: Encoding) -> Self {
        match encoding {
            Encoding::Ascii => Self::Ascii,
            Encoding::BinaryLittleEndian => Self::BinaryLittleEndian,
            Encoding::BinaryBigEndian => Self::BinaryBigEndian,
        }
    }
}

impl From<PlyEncoding> for Encoding {
    fn from(encoding: PlyEncoding) -> Self {
        match encoding {
            PlyEncoding::Ascii => Self::Ascii,
            PlyEncoding::BinaryLittleEndian => Self::BinaryLittleEndian,
            PlyEncoding::BinaryBigEndian => Self::BinaryBigEndian,
        }
    }
}

/// Rejects paths without a `.ply` extension.
pub(crate) fn ensure_ply(path: &Utf8Path) -> Result<()> {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("ply") => Ok(()),
        _ => Err(GeometryError::UnsupportedFormat {
            path: path.to_owned(),
            expected: ".ply",
        }),
    }
}

pub(crate) fn io_error(path: &Utf8Path) -> impl FnOnce(std::io::Error) -> GeometryError + '_ {
    move |source| GeometryError::Io {
        path: path.to_owned(),
        source,
    }
}

/// Parses the PLY file at `path`.
pub(crate) fn read(path: &Utf8Path) -> Result<Ply<DefaultElement>> {
    ensure_ply(path)?;
    let mut file = fs::File::open(path).map_err(io_error(path))?;
    let ply = Parser::<DefaultElement>::new()
        .read_ply(&mut file)
        .map_err(io_error(path))?;
    debug!(
        "read {path}: {} element type(s), {:?}",
        ply.header.elements.len(),
        ply.header.encoding
    );
    Ok(ply)
}

/// Returns the rows of element `name`, or an error when it is absent.
pub(crate) fn elements<'a>(
    ply: &'a Ply<DefaultElement>,
    path: &Utf8Path,
    name: &'static str,
) -> Result<&'a [DefaultElement]> {
    ply.payload
        .get(name)
        .map(Vec::as_slice)
        .ok_or_else(|| GeometryError::MissingElement {
            path: path.to_owned(),
            element: name,
        })
}

/// Returns the rows of element `name`, or none when it is absent.
pub(crate) fn optional_elements<'a>(
    ply: &'a Ply<DefaultElement>,
    name: &str,
) -> &'a [DefaultElement] {
    ply.payload.get(name).map_or(&[], Vec::as_slice)
}

fn scalar(property: &Property) -> Option<f64> {
    match *property {
        Property::Char(v) => Some(f64::from(v)),
        Property::UChar(v) => Some(f64::from(v)),
        Property::Short(v) => Some(f64::from(v)),
        Property::UShort(v) => Some(f64::from(v)),
        Property::Int(v) => Some(f64::from(v)),
        Property::UInt(v) => Some(f64::from(v)),
        Property::Float(v) => Some(f64::from(v)),
        Property::Double(v) => Some(v),
        _ => None,
    }
}

/// Reads three scalar properties, or none when any is absent.
pub(crate) fn triple(element: &DefaultElement, names: [&str; 3]) -> Option<[f64; 3]> {
    let [a, b, c] = names.map(|name| element.get(name).and_then(scalar));
    Some([a?, b?, c?])
}

/// Reads three scalar properties that must all be present.
pub(crate) fn required_triple(
    element: &DefaultElement,
    names: [&str; 3],
    path: &Utf8Path,
    index: usize,
) -> Result<[f64; 3]> {
    if let Some(values) = triple(element, names) {
        return Ok(values);
    }
    let missing = names
        .into_iter()
        .find(|name| element.get(*name).and_then(scalar).is_none())
        .unwrap_or(names[0]);
    Err(GeometryError::MissingProperty {
        path: path.to_owned(),
        element: VERTEX,
        index,
        property: missing.to_owned(),
    })
}

/// Reads an 8-bit colour channel. Floating-point channels are taken to be
/// in `[0, 1]`.
fn channel(property: &Property) -> Option<u8> {
    match *property {
        Property::UChar(v) => Some(v),
        Property::Float(v) => Some(unit_to_byte(f64::from(v))),
        Property::Double(v) => Some(unit_to_byte(v)),
        ref other => scalar(other).map(|v| v.clamp(0.0, 255.0) as u8),
    }
}

fn unit_to_byte(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Reads an RGB colour, or none when any channel is absent.
pub(crate) fn color(element: &DefaultElement) -> Option<[u8; 3]> {
    let [r, g, b] = COLOR.map(|name| element.get(name).and_then(channel));
    Some([r?, g?, b?])
}

/// Reads the vertex index list of a face.
///
/// Returns `Ok(None)` when the face has no index list and an error message
/// when an index is negative.
pub(crate) fn face_indices(
    element: &DefaultElement,
) -> std::result::Result<Option<Vec<u32>>, String> {
    let Some(property) = FACE_INDICES.into_iter().find_map(|name| element.get(name)) else {
        return Ok(None);
    };
    let negative = |_: std::num::TryFromIntError| "negative vertex index".to_owned();
    let indices: Vec<u32> = match property {
        Property::ListUChar(list) => list.iter().map(|&i| u32::from(i)).collect(),
        Property::ListUShort(list) => list.iter().map(|&i| u32::from(i)).collect(),
        Property::ListUInt(list) => list.clone(),
        Property::ListChar(list) => list
            .iter()
            .map(|&i| u32::try_from(i).map_err(negative))
            .collect::<std::result::Result<_, _>>()?,
        Property::ListShort(list) => list
            .iter()
            .map(|&i| u32::try_from(i).map_err(negative))
            .collect::<std::result::Result<_, _>>()?,
        Property::ListInt(list) => list
            .iter()
            .map(|&i| u32::try_from(i).map_err(negative))
            .collect::<std::result::Result<_, _>>()?,
        _ => return Err("vertex index list is not an integer list".to_owned()),
    };
    Ok(Some(indices))
}

/// Builds a PLY document element by element.
pub(crate) struct PlyBuilder {
    ply: Ply<DefaultElement>,
}

impl PlyBuilder {
    pub(crate) fn new(encoding: PlyEncoding) -> Self {
        let mut ply = Ply::<DefaultElement>::new();
        ply.header.encoding = encoding.into();
        ply.header.comments.push("Created by open3d-tutorial".to_owned());
        Self { ply }
    }

    /// Declares element `name` with `properties` and its rows.
    pub(crate) fn element(
        &mut self,
        name: &str,
        properties: &[(&str, PropertyType)],
        rows: Vec<DefaultElement>,
    ) {
        let mut def = ElementDef::new(name.to_owned());
        for (property, kind) in properties {
            def.properties
                .add(PropertyDef::new((*property).to_owned(), kind.clone()));
        }
        def.count = rows.len();
        self.ply.header.elements.add(def);
        self.ply.payload.insert(name.to_owned(), rows);
    }

    pub(crate) fn write(mut self, path: &Utf8Path) -> Result<()> {
        ensure_ply(path)?;
        let file = fs::File::create(path).map_err(io_error(path))?;
        let mut out = BufWriter::new(file);
        Writer::new()
            .write_ply(&mut out, &mut self.ply)
            .map_err(io_error(path))?;
        out.flush().map_err(io_error(path))?;
        debug!("wrote {path}");
        Ok(())
    }
}

pub(crate) fn double() -> PropertyType {
    PropertyType::Scalar(ScalarType::Double)
}

pub(crate) fn uchar() -> PropertyType {
    PropertyType::Scalar(ScalarType::UChar)
}

pub(crate) fn index_list() -> PropertyType {
    PropertyType::List(ScalarType::UChar, ScalarType::UInt)
}

/// A vertex row holding `values` under `names`.
pub(crate) fn push_doubles(row: &mut DefaultElement, names: [&str; 3], values: [f64; 3]) {
    for (name, value) in names.into_iter().zip(values) {
        row.insert(name.to_owned(), Property::Double(value));
    }
}

pub(crate) fn push_color(row: &mut DefaultElement, rgb: [u8; 3]) {
    for (name, value) in COLOR.into_iter().zip(rgb) {
        row.insert(name.to_owned(), Property::UChar(value));
    }
}
