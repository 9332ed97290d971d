//! Query-to-overlay pipeline.
//!
//! One invocation opens a connection, runs a query, decodes the geometry
//! column of every row and hands back an overlay plus its combined extent, or
//! the first error that stopped it.

mod orchestrator;
mod progress;

pub use orchestrator::{Pipeline, NO_GEOMETRY_COLUMN};
pub use progress::{PipelineState, Progress, ProgressReceiver, ProgressSender};

use crate::error::{OverlayError, Result};
use crate::geometry::Extent;
use crate::render::Overlay;

/// Terminal outcome of one pipeline invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineResult {
    /// Every row decoded. `extent` is `None` when the query returned no rows.
    Success {
        overlay: Overlay,
        extent: Option<Extent>,
    },
    /// The invocation stopped; no overlay was produced.
    Failure(OverlayError),
}

impl PipelineResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the failure message as the presentation layer shows it.
    pub fn failure_message(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(err) => Some(err.message()),
        }
    }

    /// Returns the overlay of a successful invocation.
    pub fn overlay(&self) -> Option<&Overlay> {
        match self {
            Self::Success { overlay, .. } => Some(overlay),
            Self::Failure(_) => None,
        }
    }

    /// Converts into a standard `Result`.
    pub fn into_result(self) -> Result<(Overlay, Option<Extent>)> {
        match self {
            Self::Success { overlay, extent } => Ok((overlay, extent)),
            Self::Failure(err) => Err(err),
        }
    }
}

impl From<Result<(Overlay, Option<Extent>)>> for PipelineResult {
    fn from(result: Result<(Overlay, Option<Extent>)>) -> Self {
        match result {
            Ok((overlay, extent)) => Self::Success { overlay, extent },
            Err(err) => Self::Failure(err),
        }
    }
}
