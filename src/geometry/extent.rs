//! Bounding extents and their incremental accumulation.

use geo_types::Coord;
use serde::{Deserialize, Serialize};

use super::Geometry;

/// Axis-aligned bounding box in the coordinate system named by `srid`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub srid: i32,
}

impl Extent {
    /// Creates an extent from its corners.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64, srid: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
            srid,
        }
    }

    /// Returns the smallest extent containing both `self` and `other`.
    ///
    /// The SRID of `self` is kept; mismatched SRIDs are not reconciled.
    pub fn union(&self, other: &Extent) -> Extent {
        Extent {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
            srid: self.srid,
        }
    }

    /// Grows the extent to contain a coordinate.
    pub fn include(self, coord: Coord<f64>) -> Extent {
        Extent {
            min_x: self.min_x.min(coord.x),
            min_y: self.min_y.min(coord.y),
            max_x: self.max_x.max(coord.x),
            max_y: self.max_y.max(coord.y),
            srid: self.srid,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns the center of the extent, where a view would be centered.
    pub fn center(&self) -> Coord<f64> {
        Coord {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }

    /// Converts to a `geo_types::Rect`.
    pub fn to_rect(&self) -> geo_types::Rect<f64> {
        geo_types::Rect::new(
            Coord {
                x: self.min_x,
                y: self.min_y,
            },
            Coord {
                x: self.max_x,
                y: self.max_y,
            },
        )
    }
}

/// Merges a geometry's bounding box into the running extent.
///
/// With no current extent the result is the geometry's own bounding box.
/// A geometry without coordinates leaves the current extent unchanged.
pub fn merge(current: Option<Extent>, next: &Geometry) -> Option<Extent> {
    match (current, next.bounding_box()) {
        (Some(current), Some(bbox)) => Some(current.union(&bbox)),
        (None, bbox) => bbox,
        (current, None) => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{PointGeometry, PolygonGeometry, PolylineGeometry};
    use geo_types::coord;

    fn point(x: f64, y: f64) -> Geometry {
        Geometry::Point(PointGeometry { x, y, srid: 4326 })
    }

    fn geometries() -> Vec<Geometry> {
        vec![
            point(5.0, 5.0),
            Geometry::Polygon(PolygonGeometry {
                srid: 4326,
                rings: vec![vec![
                    coord! { x: 0.0, y: 0.0 },
                    coord! { x: 0.0, y: 2.0 },
                    coord! { x: 2.0, y: 2.0 },
                    coord! { x: 2.0, y: 0.0 },
                ]],
            }),
            Geometry::Polyline(PolylineGeometry {
                srid: 4326,
                points: vec![coord! { x: -3.0, y: 1.0 }, coord! { x: 1.0, y: 7.5 }],
            }),
            point(-0.5, -4.0),
        ]
    }

    fn merge_all<'a>(geoms: impl IntoIterator<Item = &'a Geometry>) -> Option<Extent> {
        geoms.into_iter().fold(None, merge)
    }

    /// Heap's algorithm, enough for a handful of rows.
    fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
        fn go<T: Clone>(k: usize, items: &mut Vec<T>, out: &mut Vec<Vec<T>>) {
            if k <= 1 {
                out.push(items.clone());
                return;
            }
            go(k - 1, items, out);
            for i in 0..k - 1 {
                if k % 2 == 0 {
                    items.swap(i, k - 1);
                } else {
                    items.swap(0, k - 1);
                }
                go(k - 1, items, out);
            }
        }
        let mut items = items.to_vec();
        let mut out = Vec::new();
        go(items.len(), &mut items, &mut out);
        out
    }

    #[test]
    fn single_point_extent_is_the_point() {
        let extent = merge(None, &point(3.0, 4.0)).unwrap();
        assert_eq!(extent, Extent::new(3.0, 4.0, 3.0, 4.0, 4326));
    }

    #[test]
    fn polygon_and_point_extent() {
        let geoms = geometries();
        let extent = merge(merge(None, &geoms[1]), &geoms[0]).unwrap();
        assert_eq!(extent.min_x, 0.0);
        assert_eq!(extent.max_x, 5.0);
        assert_eq!(extent.min_y, 0.0);
        assert_eq!(extent.max_y, 5.0);
    }

    #[test]
    fn merge_is_order_independent() {
        let geoms = geometries();
        let expected = merge_all(&geoms).unwrap();
        assert_eq!(expected, Extent::new(-3.0, -4.0, 5.0, 7.5, 4326));

        let orders = permutations(&geoms);
        assert_eq!(orders.len(), 24);
        for order in orders {
            assert_eq!(merge_all(&order), Some(expected));
        }
    }

    #[test]
    fn merge_is_associative() {
        let geoms = geometries();
        let left = merge_all(&geoms[..2])
            .unwrap()
            .union(&merge_all(&geoms[2..]).unwrap());
        assert_eq!(Some(left), merge_all(&geoms));
    }

    #[test]
    fn empty_geometry_leaves_extent_unchanged() {
        let empty = Geometry::Polyline(PolylineGeometry {
            srid: 4326,
            points: vec![],
        });
        let current = merge(None, &point(1.0, 1.0));
        assert_eq!(merge(current, &empty), current);
        assert_eq!(merge(None, &empty), None);
    }

    #[test]
    fn extent_helpers() {
        let extent = Extent::new(0.0, 0.0, 4.0, 2.0, 4326);
        assert_eq!(extent.width(), 4.0);
        assert_eq!(extent.height(), 2.0);
        assert_eq!(extent.center(), coord! { x: 2.0, y: 1.0 });
        assert_eq!(extent.to_rect().max(), coord! { x: 4.0, y: 2.0 });
    }
}
