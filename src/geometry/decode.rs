//! Conversion from driver-level spatial values to typed geometries.

use geo_types::Coord;

use super::{Geometry, GeometryKind, PointGeometry, PolygonGeometry, PolylineGeometry};
use crate::db::RawSpatialValue;
use crate::error::DecodeError;

/// Decodes a raw spatial value into a drawable geometry.
///
/// Coordinates, ring order and point order are preserved exactly. Values of
/// any type other than point, polygon or linestring are rejected, as are
/// values with nothing to draw (PostGIS `EMPTY` geometries).
pub fn decode(raw: &RawSpatialValue) -> Result<Geometry, DecodeError> {
    match raw {
        RawSpatialValue::Point { x, y, srid } => {
            if x.is_nan() || y.is_nan() {
                return Err(DecodeError::Empty {
                    kind: GeometryKind::Point,
                });
            }
            Ok(Geometry::Point(PointGeometry {
                x: *x,
                y: *y,
                srid: *srid,
            }))
        }
        RawSpatialValue::Polygon { srid, rings } => {
            if rings.is_empty() || rings.iter().any(Vec::is_empty) {
                return Err(DecodeError::Empty {
                    kind: GeometryKind::Polygon,
                });
            }
            Ok(Geometry::Polygon(PolygonGeometry {
                srid: *srid,
                rings: rings.iter().map(|ring| to_coords(ring)).collect(),
            }))
        }
        RawSpatialValue::LineString { srid, points } => {
            if points.is_empty() {
                return Err(DecodeError::Empty {
                    kind: GeometryKind::Polyline,
                });
            }
            Ok(Geometry::Polyline(PolylineGeometry {
                srid: *srid,
                points: to_coords(points),
            }))
        }
        RawSpatialValue::Unsupported { type_name } => Err(DecodeError::unsupported(type_name)),
    }
}

fn to_coords(points: &[(f64, f64)]) -> Vec<Coord<f64>> {
    points.iter().map(|&(x, y)| Coord { x, y }).collect()
}
