//! PostgreSQL database client implementation.
//!
//! Provides the `PostgresClient` struct that implements the `DatabaseClient` trait
//! for PostgreSQL/PostGIS databases using sqlx over a single connection.

use crate::db::{ewkb, ColumnInfo, Connector, DatabaseClient, QueryResult, Row, Value};
use crate::error::{OverlayError, Result};
use async_trait::async_trait;
use sqlx::postgres::{PgConnection, PgRow};
use sqlx::{Column as SqlxColumn, Connection, Row as SqlxRow, TypeInfo};
use std::time::{Duration, Instant};
use tracing::debug;

/// Opens `PostgresClient` connections.
#[derive(Debug, Clone, Default)]
pub struct PostgresConnector {
    query_timeout: Option<Duration>,
}

impl PostgresConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits how long a query may run. Queries are unbounded by default.
    pub fn with_query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.query_timeout = timeout;
        self
    }
}

#[async_trait]
impl Connector for PostgresConnector {
    async fn connect(&self, connection_info: &str) -> Result<Box<dyn DatabaseClient>> {
        let client = PostgresClient::connect(connection_info)
            .await?
            .with_query_timeout(self.query_timeout);
        Ok(Box::new(client))
    }
}

/// PostgreSQL database client over one connection.
#[derive(Debug)]
pub struct PostgresClient {
    conn: Option<PgConnection>,
    query_timeout: Option<Duration>,
}

impl PostgresClient {
    /// Opens a connection from a `postgres://` connection string.
    pub async fn connect(connection_info: &str) -> Result<Self> {
        debug!("Opening database connection");
        let conn = PgConnection::connect(connection_info)
            .await
            .map_err(|e| OverlayError::connection(e.to_string()))?;
        debug!("Successfully connected to database");

        Ok(Self {
            conn: Some(conn),
            query_timeout: None,
        })
    }

    pub fn with_query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.query_timeout = timeout;
        self
    }
}

#[async_trait]
impl DatabaseClient for PostgresClient {
    async fn execute_query(&mut self, sql: &str) -> Result<QueryResult> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| OverlayError::internal("connection is already closed"))?;

        let start = Instant::now();
        let fetch = sqlx::query(sql).fetch_all(&mut *conn);

        let result = match self.query_timeout {
            Some(timeout) => tokio::time::timeout(timeout, fetch).await.map_err(|_| {
                OverlayError::query(format!(
                    "Query timed out after {} seconds",
                    timeout.as_secs()
                ))
            })?,
            None => fetch.await,
        }
        .map_err(|e| OverlayError::query(format_query_error(e)))?;

        let execution_time = start.elapsed();

        // Column metadata comes from the first row; empty results carry none.
        let columns: Vec<ColumnInfo> = result
            .first()
            .map(|first_row| {
                first_row
                    .columns()
                    .iter()
                    .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                    .collect()
            })
            .unwrap_or_default();

        let rows = result
            .iter()
            .map(convert_row)
            .collect::<Result<Vec<Row>>>()?;

        Ok(QueryResult::with_data(columns, rows).with_execution_time(execution_time))
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close()
                .await
                .map_err(|e| OverlayError::connection(e.to_string()))?;
        }
        Ok(())
    }
}

/// Converts a sqlx PgRow to our Row type.
fn convert_row(row: &PgRow) -> Result<Row> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.name(), col.type_info().name()))
        .collect()
}

/// Converts a single column value from a PgRow to our Value type.
fn convert_value(row: &PgRow, index: usize, column: &str, type_name: &str) -> Result<Value> {
    let value = match type_name.to_uppercase().as_str() {
        "GEOMETRY" => return convert_geometry(row, index, column),

        "BOOL" | "BOOLEAN" => row
            .try_get::<Option<bool>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bool),

        "INT2" | "SMALLINT" => row
            .try_get::<Option<i16>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Int(v as i64)),

        "INT4" | "INT" | "INTEGER" => row
            .try_get::<Option<i32>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Int(v as i64)),

        "INT8" | "BIGINT" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Int),

        "FLOAT4" | "REAL" => row
            .try_get::<Option<f32>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Float(v as f64)),

        "FLOAT8" | "DOUBLE PRECISION" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Float),

        "BYTEA" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bytes),

        // For all other types, try to get as string
        _ => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::String),
    };

    Ok(value.unwrap_or(Value::Null))
}

/// Reads a PostGIS geometry column, which arrives as EWKB in binary format.
fn convert_geometry(row: &PgRow, index: usize, column: &str) -> Result<Value> {
    // sqlx has no geometry type; the raw bytes are decoded without a type check.
    let bytes = row
        .try_get_unchecked::<Option<Vec<u8>>, _>(index)
        .map_err(|e| OverlayError::query(format!("Failed to read column {column}: {e}")))?;

    match bytes {
        Some(bytes) => ewkb::parse(&bytes)
            .map(Value::Geometry)
            .map_err(|e| OverlayError::query(format!("Invalid geometry in column {column}: {e}"))),
        None => Ok(Value::Null),
    }
}

/// Formats a query error with hints if available.
fn format_query_error(error: sqlx::Error) -> String {
    let Some(db_error) = error.as_database_error() else {
        return error.to_string();
    };

    let mut result = String::from("ERROR: ");
    result.push_str(db_error.message());

    if let Some(pg_error) = db_error.try_downcast_ref::<sqlx::postgres::PgDatabaseError>() {
        if let Some(detail) = pg_error.detail() {
            result.push_str("\n  DETAIL: ");
            result.push_str(detail);
        }

        if let Some(hint) = pg_error.hint() {
            result.push_str("\n  HINT: ");
            result.push_str(hint);
        }
    }

    result
}
