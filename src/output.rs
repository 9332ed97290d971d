//! Presentation of a finished overlay.
//!
//! The pipeline hands back an overlay and its extent; this module turns them
//! into what the CLI prints.

use serde_json::json;

use crate::error::{OverlayError, Result};
use crate::geometry::Extent;
use crate::render::Overlay;

/// Output format for a finished overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// The overlay and extent as JSON.
    Json,
    /// A GeoJSON FeatureCollection with simplestyle properties.
    GeoJson,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "geojson" => Ok(Self::GeoJson),
            _ => Err(format!(
                "Invalid output format: {s}. Expected: text, json, or geojson"
            )),
        }
    }
}

/// Formats an overlay and its extent.
pub fn format_overlay(
    format: OutputFormat,
    overlay: &Overlay,
    extent: Option<&Extent>,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format_text(overlay, extent)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&json!({ "overlay": overlay, "extent": extent }))
                .map_err(|e| OverlayError::internal(format!("Failed to encode overlay: {e}")))
        }
        OutputFormat::GeoJson => serde_json::to_string_pretty(&overlay.to_geojson())
            .map_err(|e| OverlayError::internal(format!("Failed to encode overlay: {e}"))),
    }
}

fn format_text(overlay: &Overlay, extent: Option<&Extent>) -> String {
    let mut lines = vec![
        format!("Overlay: {}", overlay.id.trim()),
        format!("Graphics: {}", overlay.len()),
    ];

    match &overlay.renderer {
        Some(renderer) => lines.push(format!(
            "Renderer: {} {}",
            renderer.symbol.kind(),
            renderer.color()
        )),
        None => lines.push("Renderer: none".to_string()),
    }

    match extent {
        Some(e) => lines.push(format!(
            "Extent: {}, {} .. {}, {} (SRID {})",
            e.min_x, e.min_y, e.max_x, e.max_y, e.srid
        )),
        None => lines.push("Extent: none".to_string()),
    }

    lines.join("\n")
}
