//! Overlays: the display layer produced by one query.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

use super::{Graphic, Renderer, Symbol};
use crate::geometry::Geometry;

/// A named collection of graphics drawn with one renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    /// Identifier of the overlay; the query text that produced it.
    pub id: String,

    pub graphics: Vec<Graphic>,

    /// `None` until the first graphic is added.
    pub renderer: Option<Renderer>,
}

impl Overlay {
    /// Creates an empty overlay.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            graphics: Vec::new(),
            renderer: None,
        }
    }

    /// Appends a graphic.
    pub fn push(&mut self, graphic: Graphic) {
        self.graphics.push(graphic);
    }

    /// Installs the overlay's renderer unless one is already set.
    pub fn set_renderer_once(&mut self, renderer: Renderer) {
        if self.renderer.is_none() {
            self.renderer = Some(renderer);
        }
    }

    pub fn len(&self) -> usize {
        self.graphics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphics.is_empty()
    }

    /// Renders the overlay as a GeoJSON FeatureCollection.
    ///
    /// Symbols are written as simplestyle properties (`marker-color`,
    /// `fill`, `stroke`, ...) so common map viewers pick up the colors.
    pub fn to_geojson(&self) -> JsonValue {
        let features: Vec<JsonValue> = self
            .graphics
            .iter()
            .map(|graphic| {
                json!({
                    "type": "Feature",
                    "geometry": geojson_geometry(&graphic.geometry),
                    "properties": style_properties(&graphic.style.symbol, graphic.geometry.srid()),
                })
            })
            .collect();

        json!({
            "type": "FeatureCollection",
            "name": self.id,
            "features": features,
        })
    }
}

fn geojson_geometry(geometry: &Geometry) -> JsonValue {
    match geometry {
        Geometry::Point(p) => json!({
            "type": "Point",
            "coordinates": [p.x, p.y],
        }),
        Geometry::Polygon(p) => json!({
            "type": "Polygon",
            "coordinates": p
                .rings
                .iter()
                .map(|ring| ring.iter().map(|c| [c.x, c.y]).collect::<Vec<_>>())
                .collect::<Vec<_>>(),
        }),
        Geometry::Polyline(l) => json!({
            "type": "LineString",
            "coordinates": l.points.iter().map(|c| [c.x, c.y]).collect::<Vec<_>>(),
        }),
    }
}

fn style_properties(symbol: &Symbol, srid: i32) -> JsonValue {
    let mut props = Map::new();
    props.insert("srid".into(), json!(srid));
    match symbol {
        Symbol::Marker { color, size, .. } => {
            props.insert("marker-color".into(), json!(color.to_hex()));
            props.insert("marker-size".into(), json!(size));
        }
        Symbol::Fill {
            color,
            outline_color,
            outline_width,
        } => {
            props.insert("fill".into(), json!(color.to_hex()));
            props.insert("stroke".into(), json!(outline_color.to_hex()));
            props.insert("stroke-width".into(), json!(outline_width));
        }
        Symbol::Line { color, width } => {
            props.insert("stroke".into(), json!(color.to_hex()));
            props.insert("stroke-width".into(), json!(width));
        }
    }
    JsonValue::Object(props)
}
