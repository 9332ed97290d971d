//! Drives one query from connection to finished overlay.

use std::sync::Arc;
use std::time::Instant;

use rand::Rng;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::progress::Reporter;
use super::{PipelineResult, PipelineState, Progress, ProgressSender};
use crate::config::RenderConfig;
use crate::db::{ColumnInfo, Connector, DatabaseClient, Value};
use crate::error::{DecodeError, OverlayError, Result};
use crate::geometry::{decode, merge, Extent};
use crate::render::{build, Overlay, Style, StyleAssigner};

/// Failure message when a result set has no geometry column.
pub const NO_GEOMETRY_COLUMN: &str = "No supported geometry column";

/// How often the row loop reports how many rows it has decoded.
const ROW_PROGRESS_INTERVAL: usize = 1000;

/// Runs queries and turns their geometry column into overlays.
///
/// Invocations share nothing but the connector; each owns its own
/// connection, overlay and extent.
#[derive(Clone)]
pub struct Pipeline {
    connector: Arc<dyn Connector>,
    render: RenderConfig,
}

impl Pipeline {
    pub fn new(connector: Arc<dyn Connector>, render: RenderConfig) -> Self {
        Self { connector, render }
    }

    /// Returns the style assigner for a new invocation.
    ///
    /// With a configured seed every invocation draws the same color sequence.
    fn assigner(&self) -> StyleAssigner {
        let sizes = self.render.sizes();
        match self.render.seed {
            Some(seed) => StyleAssigner::from_seed(seed, sizes),
            None => StyleAssigner::from_entropy(sizes),
        }
    }

    /// Runs one invocation to completion.
    pub async fn run(&self, connection_info: &str, query: &str) -> PipelineResult {
        self.run_with(connection_info, query, self.assigner(), None)
            .await
    }

    /// Runs one invocation as a background task.
    ///
    /// The caller is not blocked; it may listen on `progress` while the task
    /// runs and await the handle for the result.
    pub fn spawn(
        &self,
        connection_info: impl Into<String>,
        query: impl Into<String>,
        progress: Option<ProgressSender>,
    ) -> JoinHandle<PipelineResult> {
        let pipeline = self.clone();
        let connection_info = connection_info.into();
        let query = query.into();
        let assigner = self.assigner();
        tokio::spawn(async move {
            pipeline
                .run_with(&connection_info, &query, assigner, progress.as_ref())
                .await
        })
    }

    /// Runs one invocation with an explicit color source and progress sink.
    pub async fn run_with<R: Rng + Send>(
        &self,
        connection_info: &str,
        query: &str,
        mut assigner: StyleAssigner<R>,
        progress: Option<&ProgressSender>,
    ) -> PipelineResult {
        let reporter = Reporter::new(progress);
        reporter.send(Progress::Working);
        let start = Instant::now();

        let result = self
            .execute(connection_info, query, &mut assigner, reporter)
            .await;

        match &result {
            Ok((overlay, _)) => {
                info!(
                    "Built overlay with {} graphics in {:?}",
                    overlay.len(),
                    start.elapsed()
                );
                reporter.send(Progress::State(PipelineState::Completed));
                reporter.send(Progress::Finished {
                    graphics: overlay.len(),
                });
            }
            Err(e) => {
                warn!("{}: {}", e.category(), e.message());
                reporter.send(Progress::Failed(e.message()));
            }
        }

        result.into()
    }

    async fn execute<R: Rng + Send>(
        &self,
        connection_info: &str,
        query: &str,
        assigner: &mut StyleAssigner<R>,
        reporter: Reporter<'_>,
    ) -> Result<(Overlay, Option<Extent>)> {
        reporter.send(Progress::State(PipelineState::Connecting));
        debug!("Pipeline state: {}", PipelineState::Connecting);
        // A failed connect leaves nothing open to close.
        let mut client = self.connector.connect(connection_info).await?;

        let outcome = build_overlay(client.as_mut(), query, assigner, reporter).await;

        // Closed on every path once opened; a failed close does not change the outcome.
        if let Err(e) = client.close().await {
            warn!("Failed to close database connection: {}", e);
        }

        outcome
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("render", &self.render)
            .finish_non_exhaustive()
    }
}

/// Executes the query and decodes every row into the overlay.
async fn build_overlay<R: Rng + Send>(
    client: &mut dyn DatabaseClient,
    query: &str,
    assigner: &mut StyleAssigner<R>,
    reporter: Reporter<'_>,
) -> Result<(Overlay, Option<Extent>)> {
    reporter.send(Progress::State(PipelineState::Executing));
    debug!("Pipeline state: {}", PipelineState::Executing);
    let result = client.execute_query(query).await?;
    debug!(
        "Query returned {} rows in {:?}",
        result.row_count, result.execution_time
    );

    let mut overlay = Overlay::new(query);
    let mut extent = None;

    if result.is_empty() {
        debug!("Query returned no rows");
        return Ok((overlay, extent));
    }

    reporter.send(Progress::State(PipelineState::ColumnScan));
    debug!("Pipeline state: {}", PipelineState::ColumnScan);
    let column = find_geometry_column(&result.columns)
        .ok_or_else(|| OverlayError::schema(NO_GEOMETRY_COLUMN))?;
    debug!(
        "Using geometry column {} ({})",
        column, result.columns[column].name
    );

    reporter.send(Progress::State(PipelineState::RowLoop));
    debug!("Pipeline state: {}", PipelineState::RowLoop);

    // One style per invocation, drawn when the first row's kind is known.
    let mut style: Option<Style> = None;

    for (i, row) in result.rows.iter().enumerate() {
        let raw = match row.get(column) {
            Some(Value::Geometry(raw)) => raw,
            Some(other) => return Err(DecodeError::unsupported(other.type_name()).into()),
            None => {
                return Err(OverlayError::internal(format!(
                    "row {i} has no value in column {column}"
                )))
            }
        };

        let geometry = decode(raw)?;
        let row_style = style.get_or_insert_with(|| assigner.new_style(geometry.kind()));
        let (graphic, renderer) = build(geometry, row_style);

        extent = merge(extent, &graphic.geometry);
        overlay.push(graphic);
        overlay.set_renderer_once(renderer);

        if (i + 1) % ROW_PROGRESS_INTERVAL == 0 {
            reporter.send(Progress::RowsDecoded(i + 1));
        }
    }

    reporter.send(Progress::RowsDecoded(overlay.len()));
    Ok((overlay, extent))
}

/// Returns the index of the first column of the recognized spatial type.
fn find_geometry_column(columns: &[ColumnInfo]) -> Option<usize> {
    columns.iter().position(ColumnInfo::is_spatial)
}
