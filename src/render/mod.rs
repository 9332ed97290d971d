//! Styling and overlay assembly.
//!
//! Turns decoded geometries into graphics: each graphic pairs a geometry with
//! a style, and an overlay collects the graphics of one query together with
//! the renderer that draws them.

mod overlay;
mod style;

pub use overlay::Overlay;
pub use style::StyleAssigner;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::{Geometry, GeometryKind};

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Formats the color as `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Sizes of the symbols attached to each geometry kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolSizes {
    /// Diameter of point markers.
    pub marker_size: f64,

    /// Width of polyline strokes.
    pub line_width: f64,

    /// Width of polygon outlines.
    pub outline_width: f64,
}

impl Default for SymbolSizes {
    fn default() -> Self {
        Self {
            marker_size: 10.0,
            line_width: 3.0,
            outline_width: 3.0,
        }
    }
}

/// Marker shapes for point symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerShape {
    Circle,
}

/// How a single graphic is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Symbol {
    /// Point marker.
    Marker {
        shape: MarkerShape,
        color: Rgb,
        size: f64,
    },
    /// Solid polygon fill with a solid outline.
    Fill {
        color: Rgb,
        outline_color: Rgb,
        outline_width: f64,
    },
    /// Solid stroke.
    Line { color: Rgb, width: f64 },
}

impl Symbol {
    /// Builds the symbol for a geometry kind in the given color.
    pub fn for_kind(kind: GeometryKind, color: Rgb, sizes: &SymbolSizes) -> Self {
        match kind {
            GeometryKind::Point => Symbol::Marker {
                shape: MarkerShape::Circle,
                color,
                size: sizes.marker_size,
            },
            GeometryKind::Polygon => Symbol::Fill {
                color,
                outline_color: Rgb::BLACK,
                outline_width: sizes.outline_width,
            },
            GeometryKind::Polyline => Symbol::Line {
                color,
                width: sizes.line_width,
            },
        }
    }

    /// Returns the geometry kind this symbol draws.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Symbol::Marker { .. } => GeometryKind::Point,
            Symbol::Fill { .. } => GeometryKind::Polygon,
            Symbol::Line { .. } => GeometryKind::Polyline,
        }
    }

    /// Returns the symbol's main color (fill for polygons).
    pub fn color(&self) -> Rgb {
        match self {
            Symbol::Marker { color, .. } | Symbol::Fill { color, .. } | Symbol::Line { color, .. } => {
                *color
            }
        }
    }
}

/// A color plus the symbol that applies it to one geometry kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub color: Rgb,
    pub symbol: Symbol,
    #[serde(skip)]
    sizes: SymbolSizes,
}

impl Style {
    pub fn new(kind: GeometryKind, color: Rgb, sizes: SymbolSizes) -> Self {
        Self {
            color,
            symbol: Symbol::for_kind(kind, color, &sizes),
            sizes,
        }
    }

    /// Returns the geometry kind the style's symbol draws.
    pub fn kind(&self) -> GeometryKind {
        self.symbol.kind()
    }

    /// Returns a style with the same color and sizes for another kind.
    pub fn for_kind(&self, kind: GeometryKind) -> Style {
        Style::new(kind, self.color, self.sizes)
    }
}

/// A geometry paired with the style it is drawn in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graphic {
    pub geometry: Geometry,
    pub style: Style,
}

/// Draws every graphic of an overlay with one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Renderer {
    pub symbol: Symbol,
}

impl Renderer {
    pub fn new(symbol: Symbol) -> Self {
        Self { symbol }
    }

    /// Returns the color a layer list shows as the overlay's swatch.
    pub fn color(&self) -> Rgb {
        self.symbol.color()
    }
}

/// Wraps a geometry and a style into a graphic and a matching renderer.
///
/// If the style was made for another geometry kind, its color is carried
/// over to the symbol of the geometry's own kind.
pub fn build(geometry: Geometry, style: &Style) -> (Graphic, Renderer) {
    let style = if style.kind() == geometry.kind() {
        style.clone()
    } else {
        style.for_kind(geometry.kind())
    };
    let renderer = Renderer::new(style.symbol.clone());
    (Graphic { geometry, style }, renderer)
}
