//! pg-overlay - draws the geometry column of a PostGIS query as an overlay.

mod cli;

use cli::Cli;
use pg_overlay::config::{Config, ConnectionConfig};
use pg_overlay::db::{Connector, MockConnector, MockDatabaseClient, PostgresConnector};
use pg_overlay::error::{OverlayError, Result};
use pg_overlay::logging;
use pg_overlay::output::format_overlay;
use pg_overlay::pipeline::Pipeline;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    if cli.log_file {
        logging::init_file_logging();
    } else {
        logging::init_stderr_logging();
    }

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let format = cli.parse_output_format()?;
    let query = cli.query_text()?;

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    if cli.seed.is_some() {
        config.render.seed = cli.seed;
    }

    let (connector, connection_info): (Arc<dyn Connector>, String) = if cli.mock_db {
        info!("Using mock database");
        (
            Arc::new(MockConnector::new(MockDatabaseClient::sample())),
            "mock://sample".to_string(),
        )
    } else {
        let connection_info = cli.connection_info(&config)?.ok_or_else(|| {
            OverlayError::config(
                "No database connection configured. Use --help for usage information.",
            )
        })?;
        info!("Connection: {}", display_connection(&connection_info));
        (
            Arc::new(PostgresConnector::new().with_query_timeout(config.query.timeout())),
            connection_info,
        )
    };

    let pipeline = Pipeline::new(connector, config.render);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = pipeline.spawn(connection_info, query, Some(tx));

    while let Some(progress) = rx.recv().await {
        debug!(?progress, "pipeline progress");
        if progress.is_terminal() {
            continue;
        }
        eprintln!("{}", progress.status_text());
    }

    let result = handle
        .await
        .map_err(|e| OverlayError::internal(format!("Pipeline task failed: {e}")))?;
    let (overlay, extent) = result.into_result()?;

    let rendered = format_overlay(format, &overlay, extent.as_ref())?;
    match &cli.output_file {
        Some(path) => std::fs::write(path, rendered + "\n").map_err(|e| {
            OverlayError::internal(format!("Failed to write {}: {}", path.display(), e))
        })?,
        None => println!("{rendered}"),
    }

    Ok(())
}

/// Returns a password-free description of a connection string for logs.
fn display_connection(connection_info: &str) -> String {
    ConnectionConfig::from_connection_string(connection_info)
        .map(|c| c.display_string())
        .unwrap_or_else(|_| "custom connection string".to_string())
}
