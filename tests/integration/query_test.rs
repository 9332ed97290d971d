//! Live PostGIS tests.
//!
//! Requires DATABASE_URL pointing at a database with the postgis extension.

use pg_overlay::config::RenderConfig;
use pg_overlay::db::{DatabaseClient, PostgresClient, PostgresConnector, RawSpatialValue, Value};
use pg_overlay::geometry::{Extent, GeometryKind};
use pg_overlay::pipeline::Pipeline;
use std::sync::Arc;

fn get_test_database_url() -> Option<String> {
    std::env::var("DATABASE_URL").ok()
}

fn pipeline() -> Pipeline {
    Pipeline::new(Arc::new(PostgresConnector::new()), RenderConfig::default())
}

#[tokio::test]
async fn test_geometry_column_is_decoded_from_ewkb() {
    let Some(url) = get_test_database_url() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let mut client = PostgresClient::connect(&url).await.unwrap();
    let result = client
        .execute_query("SELECT 7 AS id, ST_GeomFromText('POINT(1.5 -2)', 4326) AS geom")
        .await
        .unwrap();

    assert_eq!(result.columns.len(), 2);
    assert!(result.columns[1].is_spatial());
    assert_eq!(result.rows[0][0], Value::Int(7));
    assert_eq!(
        result.rows[0][1],
        Value::Geometry(RawSpatialValue::Point {
            x: 1.5,
            y: -2.0,
            srid: 4326
        })
    );

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_mixed_layer_through_pipeline() {
    let Some(url) = get_test_database_url() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let query = "SELECT ST_GeomFromText(wkt, 3857) AS geom FROM (VALUES \
         ('POINT(10 20)'), \
         ('POLYGON((0 0, 0 5, 5 5, 5 0, 0 0))'), \
         ('LINESTRING(-1 2, 3 4)')) AS t(wkt)";

    let (overlay, extent) = pipeline().run(&url, query).await.into_result().unwrap();

    assert_eq!(overlay.id, query);
    assert_eq!(overlay.len(), 3);
    let kinds: Vec<GeometryKind> = overlay
        .graphics
        .iter()
        .map(|g| g.geometry.kind())
        .collect();
    assert_eq!(
        kinds,
        vec![GeometryKind::Point, GeometryKind::Polygon, GeometryKind::Polyline]
    );
    assert_eq!(extent, Some(Extent::new(-1.0, 0.0, 10.0, 20.0, 3857)));
}

#[tokio::test]
async fn test_multipoint_fails_whole_invocation() {
    let Some(url) = get_test_database_url() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let query = "SELECT ST_GeomFromText(wkt, 4326) AS geom FROM (VALUES \
         ('POINT(1 1)'), ('MULTIPOINT((1 1), (2 2))')) AS t(wkt)";

    let result = pipeline().run(&url, query).await;
    assert_eq!(
        result.failure_message().as_deref(),
        Some("Unsupported geometry type: MultiPoint")
    );
}

#[tokio::test]
async fn test_query_without_geometry_column() {
    let Some(url) = get_test_database_url() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let result = pipeline().run(&url, "SELECT 1 AS id, 'x' AS name").await;
    assert_eq!(
        result.failure_message().as_deref(),
        Some("No supported geometry column")
    );
}

#[tokio::test]
async fn test_syntax_error_keeps_driver_message() {
    let Some(url) = get_test_database_url() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let result = pipeline().run(&url, "SELEC geom FROM nowhere").await;
    let message = result.failure_message().unwrap();
    assert!(message.contains("syntax error"), "got: {message}");
}
