//! PCD point cloud reading and writing.
//!
//! Parsing and encoding are delegated to `pcd-rs`'s schema-less reader and
//! writer. Fields are located by name, so files may order them freely and
//! carry extras such as `curvature`.

use crate::error::{GeometryError, Result};
use crate::point_cloud::PointCloud;
use camino::Utf8Path;
use log::debug;
use pcd_rs::{
    DataKind, DynReader, DynRecord, DynWriter, Field, Schema, ValueKind, ViewPoint, WriterInit,
};

const POINT: &str = "point";

const POSITION: [&str; 3] = ["x", "y", "z"];
const NORMAL: [&str; 3] = ["normal_x", "normal_y", "normal_z"];
/// Packed colour field names, in lookup order.
const COLOR: [&str; 2] = ["rgb", "rgba"];

/// On-disk encoding of a PCD file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PcdEncoding {
    /// Human-readable text.
    #[default]
    Ascii,
    /// Uncompressed binary.
    Binary,
}

impl From<DataKind> for PcdEncoding {
    fn from(kind: DataKind) -> Self {
        match kind {
            DataKind::Ascii => Self::Ascii,
            _ => Self::Binary,
        }
    }
}

impl From<PcdEncoding> for DataKind {
    fn from(encoding: PcdEncoding) -> Self {
        match encoding {
            PcdEncoding::Ascii => Self::Ascii,
            PcdEncoding::Binary => Self::Binary,
        }
    }
}

fn pcd_error(path: &Utf8Path) -> impl FnOnce(pcd_rs::Error) -> GeometryError + '_ {
    move |source| GeometryError::Pcd {
        path: path.to_owned(),
        source,
    }
}

/// Positions of the fields a point cloud is built from.
struct Layout {
    position: [usize; 3],
    normal: Option<[usize; 3]>,
    color: Option<usize>,
}

impl Layout {
    fn from_schema(schema: &Schema, path: &Utf8Path) -> Result<Self> {
        let names: Vec<&str> = schema.iter().map(|field| field.name.as_str()).collect();
        let position_of = |name: &str| names.iter().position(|candidate| *candidate == name);
        let triple = |fields: [&str; 3]| {
            let [a, b, c] = fields.map(position_of);
            Some([a?, b?, c?])
        };

        let position = match triple(POSITION) {
            Some(position) => position,
            None => {
                let missing = POSITION
                    .into_iter()
                    .find(|name| position_of(*name).is_none())
                    .unwrap_or("x");
                return Err(GeometryError::MissingField {
                    path: path.to_owned(),
                    field: missing.to_owned(),
                });
            }
        };
        Ok(Self {
            position,
            normal: triple(NORMAL),
            color: COLOR.into_iter().find_map(position_of),
        })
    }
}

fn first_value(field: &Field) -> Option<f64> {
    match field {
        Field::I8(values) => values.first().copied().map(f64::from),
        Field::I16(values) => values.first().copied().map(f64::from),
        Field::I32(values) => values.first().copied().map(f64::from),
        Field::U8(values) => values.first().copied().map(f64::from),
        Field::U16(values) => values.first().copied().map(f64::from),
        Field::U32(values) => values.first().copied().map(f64::from),
        Field::F32(values) => values.first().copied().map(f64::from),
        Field::F64(values) => values.first().copied(),
    }
}

/// Unpacks a `0x00RRGGBB` colour stored as a float's bits or an integer.
fn packed_rgb(field: &Field) -> Option<[u8; 3]> {
    let bits = match field {
        Field::F32(values) => values.first()?.to_bits(),
        Field::U32(values) => *values.first()?,
        Field::I32(values) => u32::from_ne_bytes(values.first()?.to_ne_bytes()),
        _ => return None,
    };
    let [_, r, g, b] = bits.to_be_bytes();
    Some([r, g, b])
}

fn triple_at(record: &DynRecord, indices: [usize; 3]) -> Option<[f64; 3]> {
    let [a, b, c] = indices.map(|index| record.0.get(index).and_then(first_value));
    Some([a?, b?, c?])
}

/// Parses the PCD file at `path`.
pub(crate) fn read(path: &Utf8Path) -> Result<(PointCloud, PcdEncoding)> {
    let reader = DynReader::open(path).map_err(pcd_error(path))?;
    let encoding = PcdEncoding::from(reader.meta().data);
    let layout = Layout::from_schema(&reader.meta().field_defs, path)?;

    let mut cloud = PointCloud::default();
    let mut normals = Some(Vec::new());
    let mut colors = Some(Vec::new());
    for (index, record) in reader.enumerate() {
        let record = record.map_err(pcd_error(path))?;
        let point = triple_at(&record, layout.position).ok_or_else(|| {
            GeometryError::MalformedElement {
                path: path.to_owned(),
                element: POINT,
                index,
                reason: "position has no value".to_owned(),
            }
        })?;
        cloud.points.push(point);
        // Attributes only count when every point carries them.
        normals = normals.and_then(|mut normals| {
            normals.push(triple_at(&record, layout.normal?)?);
            Some(normals)
        });
        colors = colors.and_then(|mut colors| {
            colors.push(packed_rgb(record.0.get(layout.color?)?)?);
            Some(colors)
        });
    }
    cloud.normals = normals.unwrap_or_default();
    cloud.colors = colors.unwrap_or_default();

    debug!("read {path}: {} points, {encoding:?}", cloud.len());
    Ok((cloud, encoding))
}

/// Writes `cloud` as PCD, storing colours as packed `rgb` integers.
pub(crate) fn write(path: &Utf8Path, cloud: &PointCloud, encoding: PcdEncoding) -> Result<()> {
    let normals = cloud.has_normals().then_some(cloud.normals.as_slice());
    let colors = cloud.has_colors().then_some(cloud.colors.as_slice());

    let mut fields: Vec<(&str, ValueKind, _)> =
        POSITION.iter().map(|name| (*name, ValueKind::F64, 1)).collect();
    if normals.is_some() {
        fields.extend(NORMAL.iter().map(|name| (*name, ValueKind::F64, 1)));
    }
    if colors.is_some() {
        fields.push(("rgb", ValueKind::U32, 1));
    }

    let mut writer: DynWriter<_> = WriterInit {
        width: cloud.len() as u64,
        height: 1,
        viewpoint: ViewPoint::default(),
        data_kind: encoding.into(),
        schema: Some(Schema::from_iter(fields)),
    }
    .create(path)
    .map_err(pcd_error(path))?;

    for (index, point) in cloud.points.iter().enumerate() {
        let mut record: Vec<Field> = point.iter().map(|v| Field::F64(vec![*v])).collect();
        if let Some(normal) = normals.and_then(|normals| normals.get(index)) {
            record.extend(normal.iter().map(|v| Field::F64(vec![*v])));
        }
        if let Some(&[r, g, b]) = colors.and_then(|colors| colors.get(index)) {
            record.push(Field::U32(vec![u32::from_be_bytes([0, r, g, b])]));
        }
        writer.push(&DynRecord(record)).map_err(pcd_error(path))?;
    }
    writer.finish().map_err(pcd_error(path))?;
    debug!("wrote {path}");
    Ok(())
}
