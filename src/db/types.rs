//! Query result types for pg-overlay.
//!
//! Defines the structures used to represent query results from the database,
//! including the raw spatial values read out of geometry columns.

use std::time::Duration;

/// Postgres type name of a PostGIS geometry column.
pub const GEOMETRY_TYPE_NAME: &str = "geometry";

/// Represents the result of executing a SQL query.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    /// Column metadata for the result set.
    ///
    /// Taken from the first row, so it is empty when no rows came back.
    pub columns: Vec<ColumnInfo>,

    /// Rows of data.
    pub rows: Vec<Row>,

    /// Time taken to execute the query.
    pub execution_time: Duration,

    /// Number of rows in the result.
    pub row_count: usize,
}

impl QueryResult {
    /// Creates a new empty query result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query result with the given columns and rows.
    pub fn with_data(columns: Vec<ColumnInfo>, rows: Vec<Row>) -> Self {
        let row_count = rows.len();
        Self {
            columns,
            rows,
            execution_time: Duration::ZERO,
            row_count,
        }
    }

    /// Sets the execution time.
    pub fn with_execution_time(mut self, duration: Duration) -> Self {
        self.execution_time = duration;
        self
    }

    /// Returns true if the result set is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Metadata about a column in a result set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,

    /// Column data type.
    pub data_type: String,
}

impl ColumnInfo {
    /// Creates a new column info with the given name and type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }

    /// Creates a column info of the recognized spatial type.
    pub fn geometry(name: impl Into<String>) -> Self {
        Self::new(name, GEOMETRY_TYPE_NAME)
    }

    /// Returns true if the column holds PostGIS geometries.
    pub fn is_spatial(&self) -> bool {
        self.data_type.eq_ignore_ascii_case(GEOMETRY_TYPE_NAME)
    }
}

/// A row of data from a query result.
pub type Row = Vec<Value>;

/// A spatial value as read from the driver, before it becomes a `Geometry`.
///
/// Coordinates are plain `(x, y)` pairs in the order the server sent them.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSpatialValue {
    /// A single position.
    Point { x: f64, y: f64, srid: i32 },

    /// An exterior ring followed by zero or more holes.
    Polygon { srid: i32, rings: Vec<Vec<(f64, f64)>> },

    /// An open sequence of positions.
    LineString { srid: i32, points: Vec<(f64, f64)> },

    /// Any other geometry type; only its name is kept.
    Unsupported { type_name: String },
}

impl RawSpatialValue {
    /// Returns the declared geometry type name.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Point { .. } => "Point",
            Self::Polygon { .. } => "Polygon",
            Self::LineString { .. } => "LineString",
            Self::Unsupported { type_name } => type_name,
        }
    }
}

/// Represents a single value from a database query.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// Boolean value.
    Bool(bool),

    /// Signed integer (up to i64).
    Int(i64),

    /// Floating point number.
    Float(f64),

    /// Text/string value.
    String(String),

    /// Binary data.
    Bytes(Vec<u8>),

    /// PostGIS geometry.
    Geometry(RawSpatialValue),
}

impl Value {
    /// Returns the name of the value's type, as used in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "text",
            Value::Bytes(_) => "bytea",
            Value::Geometry(raw) => raw.type_name(),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_name() {
        assert_eq!(Value::Null.type_name(), "NULL");
        assert_eq!(Value::String("x".into()).type_name(), "text");
        assert_eq!(
            Value::Geometry(RawSpatialValue::Unsupported {
                type_name: "MultiPoint".into()
            })
            .type_name(),
            "MultiPoint"
        );
    }

    #[test]
    fn test_value_from_str() {
        assert_eq!(Value::from("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_query_result_with_data() {
        let columns = vec![ColumnInfo::new("id", "INT4"), ColumnInfo::geometry("geom")];
        let rows = vec![vec![
            Value::Int(1),
            Value::Geometry(RawSpatialValue::Point {
                x: 1.0,
                y: 1.0,
                srid: 4326,
            }),
        ]];

        let result = QueryResult::with_data(columns, rows);

        assert!(!result.is_empty());
        assert_eq!(result.row_count, 1);
        assert_eq!(result.columns.len(), 2);
    }

    #[test]
    fn test_query_result_with_execution_time() {
        let result = QueryResult::new().with_execution_time(Duration::from_millis(100));
        assert_eq!(result.execution_time, Duration::from_millis(100));
        assert!(result.is_empty());
    }

    #[test]
    fn test_column_is_spatial() {
        assert!(ColumnInfo::new("geom", "geometry").is_spatial());
        assert!(ColumnInfo::new("geom", "GEOMETRY").is_spatial());
        assert!(!ColumnInfo::new("geog", "geography").is_spatial());
        assert!(!ColumnInfo::new("wkb", "BYTEA").is_spatial());
    }
}
