//! Database abstraction layer for pg-overlay.
//!
//! Provides a trait-based interface for database operations, allowing the
//! pipeline to run against Postgres or an in-memory mock interchangeably.

pub mod ewkb;
mod mock;
mod postgres;
mod types;

pub use mock::{MockConnector, MockDatabaseClient};
pub use postgres::{PostgresClient, PostgresConnector};
pub use types::{ColumnInfo, QueryResult, RawSpatialValue, Row, Value, GEOMETRY_TYPE_NAME};

use crate::error::Result;
use async_trait::async_trait;

/// Opens database connections from a connection string.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Opens one connection, exclusively owned by the caller.
    async fn connect(&self, connection_info: &str) -> Result<Box<dyn DatabaseClient>>;
}

/// Trait defining the interface for a single open database connection.
///
/// All database operations are async and return Results with OverlayError.
#[async_trait]
pub trait DatabaseClient: Send {
    /// Executes a SQL query and returns the results.
    async fn execute_query(&mut self, sql: &str) -> Result<QueryResult>;

    /// Closes the database connection. Closing twice is a no-op.
    async fn close(&mut self) -> Result<()>;
}
