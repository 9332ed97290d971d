//! Typed geometries for pg-overlay.
//!
//! A `Geometry` is what a row's spatial value becomes once it has been
//! decoded: one of the three kinds the overlay knows how to draw, tagged with
//! the SRID of its coordinate system.

mod decode;
mod extent;

pub use decode::decode;
pub use extent::{merge, Extent};

use geo_types::{Coord, LineString};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three drawable geometry kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Point,
    Polygon,
    Polyline,
}

impl GeometryKind {
    /// Returns the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Polygon => "polygon",
            Self::Polyline => "polyline",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single position with its spatial reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    pub x: f64,
    pub y: f64,
    pub srid: i32,
}

/// A polygon as an ordered list of rings; the first ring is the exterior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonGeometry {
    pub srid: i32,
    pub rings: Vec<Vec<Coord<f64>>>,
}

/// An ordered, open sequence of positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylineGeometry {
    pub srid: i32,
    pub points: Vec<Coord<f64>>,
}

/// A decoded, drawable geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    Point(PointGeometry),
    Polygon(PolygonGeometry),
    Polyline(PolylineGeometry),
}

impl Geometry {
    /// Returns the geometry's kind.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Self::Point(_) => GeometryKind::Point,
            Self::Polygon(_) => GeometryKind::Polygon,
            Self::Polyline(_) => GeometryKind::Polyline,
        }
    }

    /// Returns the SRID of the geometry's coordinate system.
    pub fn srid(&self) -> i32 {
        match self {
            Self::Point(p) => p.srid,
            Self::Polygon(p) => p.srid,
            Self::Polyline(l) => l.srid,
        }
    }

    /// Iterates over every coordinate in the geometry.
    pub fn coords(&self) -> Box<dyn Iterator<Item = Coord<f64>> + '_> {
        match self {
            Self::Point(p) => Box::new(std::iter::once(Coord { x: p.x, y: p.y })),
            Self::Polygon(p) => Box::new(p.rings.iter().flatten().copied()),
            Self::Polyline(l) => Box::new(l.points.iter().copied()),
        }
    }

    /// Returns the geometry's own bounding box.
    ///
    /// `None` only for a geometry without coordinates, which the decoder
    /// never produces.
    pub fn bounding_box(&self) -> Option<Extent> {
        let mut coords = self.coords();
        let first = coords.next()?;
        let init = Extent::new(first.x, first.y, first.x, first.y, self.srid());
        Some(coords.fold(init, |extent, c| extent.include(c)))
    }
}

impl From<&Geometry> for geo_types::Geometry<f64> {
    fn from(geometry: &Geometry) -> Self {
        match geometry {
            Geometry::Point(p) => geo_types::Point::new(p.x, p.y).into(),
            Geometry::Polygon(p) => {
                let mut rings = p.rings.iter().map(|ring| LineString::from(ring.clone()));
                let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
                geo_types::Polygon::new(exterior, rings.collect()).into()
            }
            Geometry::Polyline(l) => LineString::from(l.points.clone()).into(),
        }
    }
}
