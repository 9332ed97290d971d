//! PostGIS extended well-known binary (EWKB) reading.
//!
//! PostGIS sends `geometry` values in binary format as EWKB: a byte-order
//! marker, a type word carrying optional Z/M/SRID flags, an optional SRID and
//! then the OGC WKB body. The body is read with `wkb::reader`; only the three
//! geometry types the overlay can draw are converted, any other type is
//! reported by name so the decoder can reject it.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use geo_traits::{
    CoordTrait, GeometryTrait, GeometryType, LineStringTrait, PointTrait, PolygonTrait,
};
use thiserror::Error;

use super::types::RawSpatialValue;

const FLAG_SRID: u32 = 0x2000_0000;

const WKB_POINT: u32 = 1;
const WKB_LINESTRING: u32 = 2;
const WKB_POLYGON: u32 = 3;

/// Errors produced while reading an EWKB payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EwkbError {
    #[error("geometry payload is empty")]
    Empty,

    #[error("invalid byte order marker {0:#04x}")]
    InvalidByteOrder(u8),

    #[error("geometry payload is truncated")]
    Truncated,

    #[error("malformed geometry: {0}")]
    Malformed(String),
}

/// The leading part of an EWKB payload: base type and SRID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    /// OGC type code with Z/M flags and ISO dimension offsets removed.
    base_type: u32,
    /// 0 when the payload carries no SRID.
    srid: i32,
}

impl Header {
    fn read(bytes: &[u8]) -> Result<Self, EwkbError> {
        match *bytes.first().ok_or(EwkbError::Empty)? {
            0 => Self::read_with::<BigEndian>(&bytes[1..]),
            1 => Self::read_with::<LittleEndian>(&bytes[1..]),
            other => Err(EwkbError::InvalidByteOrder(other)),
        }
    }

    fn read_with<B: ByteOrder>(rest: &[u8]) -> Result<Self, EwkbError> {
        let type_word = B::read_u32(rest.get(..4).ok_or(EwkbError::Truncated)?);
        let srid = if type_word & FLAG_SRID != 0 {
            B::read_i32(rest.get(4..8).ok_or(EwkbError::Truncated)?)
        } else {
            0
        };
        // ISO WKB encodes Z/M as thousands offsets rather than flag bits.
        let base_type = (type_word & 0x0FFF_FFFF) % 1000;
        Ok(Self { base_type, srid })
    }

    fn is_drawable(&self) -> bool {
        matches!(self.base_type, WKB_POINT | WKB_LINESTRING | WKB_POLYGON)
    }
}

/// Parses an EWKB (or plain WKB) payload into a raw spatial value.
pub fn parse(bytes: &[u8]) -> Result<RawSpatialValue, EwkbError> {
    let header = Header::read(bytes)?;
    if !header.is_drawable() {
        return Ok(RawSpatialValue::Unsupported {
            type_name: type_name(header.base_type).to_string(),
        });
    }

    let geometry =
        wkb::reader::read_wkb(bytes).map_err(|e| EwkbError::Malformed(e.to_string()))?;
    let srid = header.srid;

    let value = match geometry.as_type() {
        GeometryType::Point(point) => {
            // An empty point has no coordinate; NaN marks it for the decoder.
            let (x, y) = point
                .coord()
                .map(|c| (c.x(), c.y()))
                .unwrap_or((f64::NAN, f64::NAN));
            RawSpatialValue::Point { x, y, srid }
        }
        GeometryType::LineString(line) => RawSpatialValue::LineString {
            srid,
            points: line_coords(line),
        },
        GeometryType::Polygon(polygon) => {
            let mut rings: Vec<Vec<(f64, f64)>> = polygon
                .exterior()
                .map(|ring| line_coords(&ring))
                .into_iter()
                .collect();
            rings.extend(polygon.interiors().map(|ring| line_coords(&ring)));
            RawSpatialValue::Polygon { srid, rings }
        }
        _ => RawSpatialValue::Unsupported {
            type_name: type_name(header.base_type).to_string(),
        },
    };

    Ok(value)
}

fn line_coords<L: LineStringTrait<T = f64>>(line: &L) -> Vec<(f64, f64)> {
    line.coords().map(|c| (c.x(), c.y())).collect()
}

fn type_name(base: u32) -> &'static str {
    match base {
        WKB_POINT => "Point",
        WKB_LINESTRING => "LineString",
        WKB_POLYGON => "Polygon",
        4 => "MultiPoint",
        5 => "MultiLineString",
        6 => "MultiPolygon",
        7 => "GeometryCollection",
        8 => "CircularString",
        9 => "CompoundCurve",
        10 => "CurvePolygon",
        11 => "MultiCurve",
        12 => "MultiSurface",
        15 => "PolyhedralSurface",
        16 => "Tin",
        17 => "Triangle",
        _ => "Unknown",
    }
}
