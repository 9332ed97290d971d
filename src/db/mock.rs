//! Mock database client for testing.
//!
//! Provides an in-memory database implementation that replays a fixed result
//! and records how it was used, for tests and the `--mock-db` CLI flag.

use super::{ColumnInfo, Connector, DatabaseClient, QueryResult, RawSpatialValue, Value};
use crate::error::{OverlayError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Usage counters shared between a mock connector and its clients.
#[derive(Debug, Default)]
struct Usage {
    connects: AtomicUsize,
    closes: AtomicUsize,
    queries: Mutex<Vec<String>>,
    connection_infos: Mutex<Vec<String>>,
}

/// A mock database client that returns a predefined result.
#[derive(Debug, Clone)]
pub struct MockDatabaseClient {
    outcome: std::result::Result<QueryResult, String>,
    usage: Arc<Usage>,
    closed: bool,
}

impl MockDatabaseClient {
    /// Creates a mock client whose queries return the given result.
    pub fn with_result(result: QueryResult) -> Self {
        Self {
            outcome: Ok(result),
            usage: Arc::default(),
            closed: false,
        }
    }

    /// Creates a mock client whose queries fail with the given message.
    pub fn failing_query(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            usage: Arc::default(),
            closed: false,
        }
    }

    /// Creates a mock client returning a small mixed layer: two points, a
    /// polygon and a linestring near the origin of WGS 84.
    pub fn sample() -> Self {
        let columns = vec![
            ColumnInfo::new("id", "INT4"),
            ColumnInfo::new("name", "TEXT"),
            ColumnInfo::geometry("geom"),
        ];
        let rows = vec![
            vec![
                Value::Int(1),
                Value::from("harbor"),
                Value::Geometry(RawSpatialValue::Point {
                    x: 1.5,
                    y: 2.5,
                    srid: 4326,
                }),
            ],
            vec![
                Value::Int(2),
                Value::from("lighthouse"),
                Value::Geometry(RawSpatialValue::Point {
                    x: 3.0,
                    y: 0.5,
                    srid: 4326,
                }),
            ],
            vec![
                Value::Int(3),
                Value::from("island"),
                Value::Geometry(RawSpatialValue::Polygon {
                    srid: 4326,
                    rings: vec![vec![(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0), (0.0, 0.0)]],
                }),
            ],
            vec![
                Value::Int(4),
                Value::from("ferry"),
                Value::Geometry(RawSpatialValue::LineString {
                    srid: 4326,
                    points: vec![(1.5, 2.5), (2.5, 1.5), (3.0, 0.5)],
                }),
            ],
        ];
        Self::with_result(
            QueryResult::with_data(columns, rows).with_execution_time(Duration::from_millis(1)),
        )
    }

    /// Number of times `close` was called on this client or its clones.
    pub fn close_count(&self) -> usize {
        self.usage.closes.load(Ordering::SeqCst)
    }

    /// Queries executed against this client or its clones, in order.
    pub fn executed_queries(&self) -> Vec<String> {
        self.usage
            .queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::with_result(QueryResult::new())
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute_query(&mut self, sql: &str) -> Result<QueryResult> {
        if self.closed {
            return Err(OverlayError::internal("connection is already closed"));
        }
        if let Ok(mut queries) = self.usage.queries.lock() {
            queries.push(sql.to_string());
        }
        self.outcome.clone().map_err(OverlayError::query)
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.usage.closes.fetch_add(1, Ordering::SeqCst);
        self.closed = true;
        Ok(())
    }
}

/// A connector that hands out clones of a mock client, or refuses to connect.
#[derive(Debug, Clone)]
pub struct MockConnector {
    client: MockDatabaseClient,
    connect_error: Option<String>,
}

impl MockConnector {
    /// Creates a connector handing out clones of `client`.
    pub fn new(client: MockDatabaseClient) -> Self {
        Self {
            client,
            connect_error: None,
        }
    }

    /// Creates a connector whose connection attempts fail with `message`.
    pub fn refusing(message: impl Into<String>) -> Self {
        Self {
            client: MockDatabaseClient::default(),
            connect_error: Some(message.into()),
        }
    }

    /// The client handed out by this connector, for inspecting usage.
    pub fn client(&self) -> &MockDatabaseClient {
        &self.client
    }

    /// Number of connection attempts, successful or not.
    pub fn connect_count(&self) -> usize {
        self.client.usage.connects.load(Ordering::SeqCst)
    }

    /// Connection strings passed to `connect`, in order.
    pub fn connection_infos(&self) -> Vec<String> {
        self.client
            .usage
            .connection_infos
            .lock()
            .map(|infos| infos.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, connection_info: &str) -> Result<Box<dyn DatabaseClient>> {
        self.client.usage.connects.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut infos) = self.client.usage.connection_infos.lock() {
            infos.push(connection_info.to_string());
        }
        match &self.connect_error {
            Some(message) => Err(OverlayError::connection(message.clone())),
            None => Ok(Box::new(self.client.clone())),
        }
    }
}
