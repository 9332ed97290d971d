//! End-to-end pipeline tests against the mock database.

use pg_overlay::config::{Config, RenderConfig};
use pg_overlay::db::{
    ColumnInfo, MockConnector, MockDatabaseClient, QueryResult, RawSpatialValue, Value,
};
use pg_overlay::geometry::Extent;
use pg_overlay::output::{format_overlay, OutputFormat};
use pg_overlay::pipeline::{Pipeline, PipelineResult, Progress};
use pg_overlay::render::Symbol;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

fn seeded(seed: u64) -> RenderConfig {
    RenderConfig {
        seed: Some(seed),
        ..RenderConfig::default()
    }
}

fn points(n: usize) -> MockDatabaseClient {
    let rows = (0..n)
        .map(|i| {
            vec![Value::Geometry(RawSpatialValue::Point {
                x: i as f64,
                y: (i * 2) as f64,
                srid: 4326,
            })]
        })
        .collect();
    MockDatabaseClient::with_result(QueryResult::with_data(
        vec![ColumnInfo::geometry("geom")],
        rows,
    ))
}

#[tokio::test]
async fn test_sample_layer_end_to_end() {
    let connector = MockConnector::new(MockDatabaseClient::sample());
    let pipeline = Pipeline::new(Arc::new(connector.clone()), seeded(7));

    let query = "SELECT id, name, geom FROM harbor";
    let result = pipeline.run("mock://sample", query).await;
    let (overlay, extent) = result.into_result().unwrap();

    assert_eq!(overlay.id, query);
    assert_eq!(overlay.len(), 4);
    assert_eq!(extent, Some(Extent::new(0.0, 0.0, 3.0, 2.5, 4326)));
    assert_eq!(connector.connect_count(), 1);
    assert_eq!(connector.client().close_count(), 1);
    assert_eq!(connector.client().executed_queries(), vec![query]);
}

#[tokio::test]
async fn test_ten_points_share_renderer_color() {
    let pipeline = Pipeline::new(Arc::new(MockConnector::new(points(10))), seeded(99));

    let (overlay, extent) = pipeline
        .run("mock://points", "SELECT geom FROM poi")
        .await
        .into_result()
        .unwrap();

    let renderer = overlay.renderer.clone().unwrap();
    assert_eq!(overlay.len(), 10);
    for graphic in &overlay.graphics {
        assert_eq!(graphic.style.color, renderer.color());
        assert!(matches!(graphic.style.symbol, Symbol::Marker { size, .. } if size == 10.0));
    }
    assert_eq!(extent, Some(Extent::new(0.0, 0.0, 9.0, 18.0, 4326)));
}

#[tokio::test]
async fn test_same_seed_gives_same_color() {
    let first = Pipeline::new(Arc::new(MockConnector::new(points(2))), seeded(5))
        .run("mock://a", "SELECT geom FROM a")
        .await
        .into_result()
        .unwrap()
        .0;
    let second = Pipeline::new(Arc::new(MockConnector::new(points(3))), seeded(5))
        .run("mock://b", "SELECT geom FROM b")
        .await
        .into_result()
        .unwrap()
        .0;

    assert_eq!(
        first.renderer.unwrap().color(),
        second.renderer.unwrap().color()
    );
}

#[tokio::test]
async fn test_refused_connection_reports_driver_text() {
    let connector = MockConnector::refusing("password authentication failed for user \"gis\"");
    let pipeline = Pipeline::new(Arc::new(connector.clone()), RenderConfig::default());

    let result = pipeline.run("postgres://gis@localhost/gis", "SELECT 1").await;

    assert!(matches!(result, PipelineResult::Failure(_)));
    assert_eq!(
        result.failure_message().as_deref(),
        Some("password authentication failed for user \"gis\"")
    );
    assert!(connector.client().executed_queries().is_empty());
}

#[tokio::test]
async fn test_spawned_run_streams_progress() {
    let pipeline = Pipeline::new(
        Arc::new(MockConnector::new(MockDatabaseClient::sample())),
        RenderConfig::default(),
    );
    let (tx, mut rx) = mpsc::unbounded_channel();

    let handle = pipeline.spawn("mock://sample", "SELECT geom FROM harbor", Some(tx));

    let mut events = Vec::new();
    while let Some(progress) = rx.recv().await {
        events.push(progress);
    }

    assert_eq!(events.first(), Some(&Progress::Working));
    assert_eq!(events.last(), Some(&Progress::Finished { graphics: 4 }));
    assert!(handle.await.unwrap().is_success());
}

#[tokio::test]
async fn test_geojson_output_of_sample() {
    let pipeline = Pipeline::new(
        Arc::new(MockConnector::new(MockDatabaseClient::sample())),
        seeded(1),
    );
    let (overlay, extent) = pipeline
        .run("mock://sample", "SELECT geom FROM harbor")
        .await
        .into_result()
        .unwrap();

    let text = format_overlay(OutputFormat::GeoJson, &overlay, extent.as_ref()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["type"], "FeatureCollection");
    assert_eq!(value["features"].as_array().map(Vec::len), Some(4));
}

#[test]
fn test_render_settings_load_from_config_file() {
    let toml = r#"
[render]
marker_size = 6.0
seed = 3

[query]
timeout_secs = 15
"#;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, toml).unwrap();

    let config = Config::load_from_file(&path).unwrap();
    assert_eq!(config.render.marker_size, 6.0);
    assert_eq!(config.render.line_width, 3.0);
    assert_eq!(config.render.seed, Some(3));
    assert_eq!(config.query.timeout().map(|t| t.as_secs()), Some(15));

    let missing = Config::load_from_file(Path::new("/nonexistent/pg-overlay.toml")).unwrap();
    assert_eq!(missing.render, RenderConfig::default());
}

#[tokio::test]
async fn test_connection_string_reaches_connector_unchanged() {
    let connector = MockConnector::new(MockDatabaseClient::sample());
    let pipeline = Pipeline::new(Arc::new(connector.clone()), RenderConfig::default());
    let url = "postgres://gis@db.local:5432/parcels?sslmode=require&application_name=x";

    let result = pipeline
        .spawn(url, "SELECT geom FROM harbor", None)
        .await
        .unwrap();

    assert!(result.is_success());
    assert_eq!(connector.connection_infos(), vec![url]);
}
