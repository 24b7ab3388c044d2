//! End-to-end pipeline runs over synthetic NetCDF datasets.

use std::fs;
use std::path::PathBuf;

use cdf_parser::open_dataset;
use pipeline::{run, ColormapPolicy, DirectorySink, PipelineConfig};
use test_utils::{create_constant_grid, create_nan_grid, create_temperature_grid, CdfBuilder};
use viz_common::ArtifactHandle;

const BASE_URL: &str = "/media";

fn everything() -> PipelineConfig {
    PipelineConfig {
        render_images: true,
        export_tables: true,
        build_combined: true,
    }
}

fn artifact_path(root: &std::path::Path, handle: &ArtifactHandle) -> PathBuf {
    let rel = handle
        .as_str()
        .strip_prefix("/media/")
        .expect("handle under base url");
    root.join(rel)
}

#[test]
fn test_renders_and_exports_mixed_dimensionality() {
    // T2 is fixed [y, x]; RAINC carries a record time axis reduced to its
    // first step before rendering.
    let bytes = CdfBuilder::new()
        .unlimited_dim("time", 3)
        .dim("y", 2)
        .dim("x", 2)
        .coord("y", vec![10.0, 20.0])
        .coord("x", vec![100.0, 200.0])
        .var("T2", &["y", "x"], vec![1.0; 4])
        .var("RAINC", &["time", "y", "x"], vec![0.0; 12])
        .build();
    let dataset = open_dataset(&bytes).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let sink = DirectorySink::new(dir.path(), BASE_URL);
    let policy = ColormapPolicy::default();

    let output = run(&dataset, &everything(), &policy, &sink).unwrap();

    assert_eq!(output.images.len(), 2);
    assert_eq!(output.tables.len(), 2);
    assert!(output.combined_table.is_some());
    assert!(output.failures.is_empty());

    // Policy lookups behind those renders are case-insensitive.
    assert_eq!(policy.resolve("T2"), "plasma");
    assert_eq!(policy.resolve("RAINC"), "Blues");

    for handle in output.images.values() {
        let png = fs::read(artifact_path(dir.path(), handle)).unwrap();
        assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");
    }
}

#[test]
fn test_unknown_variable_uses_default_colormap() {
    let bytes = CdfBuilder::new()
        .dim("y", 2)
        .dim("x", 2)
        .var("snowh", &["y", "x"], vec![0.0, 1.0, 2.0, 3.0])
        .build();
    let dataset = open_dataset(&bytes).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let sink = DirectorySink::new(dir.path(), BASE_URL);
    let policy = ColormapPolicy::default();
    assert_eq!(policy.resolve("snowh"), "viridis");

    let output = run(&dataset, &PipelineConfig::images(), &policy, &sink).unwrap();
    assert_eq!(output.images.len(), 1);
    assert!(output.images.contains_key("snowh"));
    assert!(output.tables.is_empty());
    assert!(output.combined_table.is_none());
}

#[test]
fn test_unopenable_dataset_is_fatal() {
    let err = open_dataset(&bytes::Bytes::from_static(b"not a netcdf file")).unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn test_render_failure_isolated_per_variable() {
    // Variable "b" is all-NaN, which renders nothing but still flattens
    // into a table.
    let bytes = CdfBuilder::new()
        .dim("y", 2)
        .dim("x", 2)
        .var("a", &["y", "x"], create_constant_grid(2, 2, 1.0))
        .var("b", &["y", "x"], create_nan_grid(2, 2))
        .var("c", &["y", "x"], create_constant_grid(2, 2, 2.0))
        .build();
    let dataset = open_dataset(&bytes).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let sink = DirectorySink::new(dir.path(), BASE_URL);
    let output = run(&dataset, &everything(), &ColormapPolicy::default(), &sink).unwrap();

    let image_keys: Vec<&str> = output.images.keys().map(String::as_str).collect();
    assert_eq!(image_keys, vec!["a", "c"]);

    // The render failure must not touch the table side.
    let table_keys: Vec<&str> = output.tables.keys().map(String::as_str).collect();
    assert_eq!(table_keys, vec!["a", "b", "c"]);
    assert!(output.combined_table.is_some());
    assert!(output.failures.contains_key("b"));
}

#[test]
fn test_combined_table_joins_on_shared_coordinates() {
    let bytes = CdfBuilder::new()
        .dim("y", 2)
        .dim("x", 2)
        .coord("y", vec![0.0, 1.0])
        .coord("x", vec![0.0, 1.0])
        .var("t2", &["y", "x"], create_temperature_grid(2, 2))
        .var("rh2", &["y", "x"], vec![50.0, 60.0, 70.0, 80.0])
        .build();
    let dataset = open_dataset(&bytes).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let sink = DirectorySink::new(dir.path(), BASE_URL);
    let output = run(
        &dataset,
        &PipelineConfig::tables(),
        &ColormapPolicy::default(),
        &sink,
    )
    .unwrap();

    let handle = output.combined_table.as_ref().unwrap();
    assert!(handle.as_str().ends_with("_combined.csv"));
    let csv = fs::read_to_string(artifact_path(dir.path(), handle)).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("y,x,t2,rh2"));
    // Shared coordinates match row for row, so the join stays 4 rows.
    assert_eq!(lines.count(), 4);
}

#[test]
fn test_unjoinable_variable_keeps_table_but_leaves_combined_alone() {
    // "p" is a scalar, so its one-column table shares nothing with the
    // accumulator. The merge failure must not cost it its own table, and
    // the combined CSV must not pick up its column.
    let bytes = CdfBuilder::new()
        .dim("y", 2)
        .dim("x", 2)
        .var("t2", &["y", "x"], create_temperature_grid(2, 2))
        .var("p", &[], vec![1013.25])
        .build();
    let dataset = open_dataset(&bytes).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let sink = DirectorySink::new(dir.path(), BASE_URL);
    let output = run(
        &dataset,
        &PipelineConfig::tables(),
        &ColormapPolicy::default(),
        &sink,
    )
    .unwrap();

    let table_keys: Vec<&str> = output.tables.keys().map(String::as_str).collect();
    assert_eq!(table_keys, vec!["p", "t2"]);
    assert!(output.failures.contains_key("p"));

    let handle = output.combined_table.as_ref().unwrap();
    let csv = fs::read_to_string(artifact_path(dir.path(), handle)).unwrap();
    assert_eq!(csv.lines().next(), Some("y,x,t2"));
}

#[test]
fn test_empty_time_axis_skips_render_but_not_export() {
    let bytes = CdfBuilder::new()
        .unlimited_dim("time", 0)
        .dim("x", 2)
        .var("v", &["time", "x"], vec![])
        .var("w", &["x"], vec![5.0, 6.0])
        .build();
    let dataset = open_dataset(&bytes).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let sink = DirectorySink::new(dir.path(), BASE_URL);
    let output = run(&dataset, &everything(), &ColormapPolicy::default(), &sink).unwrap();

    // "v" cannot reduce (zero-length time) and "w" is 1-D, so neither
    // renders; both still export.
    assert!(output.images.is_empty());
    assert_eq!(output.tables.len(), 2);
    assert!(output.failures.contains_key("v"));
}
