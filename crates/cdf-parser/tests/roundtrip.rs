//! Round-trip tests: builder-produced classic bytes parsed back into the
//! dataset model.

use cdf_parser::parse_dataset;
use test_utils::{create_test_grid, CdfBuilder, CdfType};

#[test]
fn test_fixed_variables_roundtrip() {
    let grid = create_test_grid(3, 2);
    let bytes = CdfBuilder::new()
        .dim("y", 2)
        .dim("x", 3)
        .coord("y", vec![10.0, 20.0])
        .coord("x", vec![0.0, 0.5, 1.0])
        .var("t2", &["y", "x"], grid.clone())
        .build();

    let ds = parse_dataset(&bytes).unwrap();

    assert_eq!(ds.dims().len(), 2);
    assert_eq!(ds.dimension("y").unwrap().len, 2);
    assert_eq!(ds.dimension("x").unwrap().len, 3);

    let t2 = ds.variable("t2").unwrap();
    assert_eq!(t2.dims, vec!["y".to_string(), "x".to_string()]);
    assert_eq!(t2.shape, vec![2, 3]);
    assert_eq!(t2.data, grid);

    let y = ds.coord("y").unwrap();
    assert_eq!(y.data, vec![10.0, 20.0]);

    // Coordinate variables are not data variables.
    let names: Vec<&str> = ds.data_vars().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["t2"]);
}

#[test]
fn test_record_variable_roundtrip() {
    // rainc[time=4, y=2, x=3], values equal to their flat index.
    let data: Vec<f64> = (0..24).map(|i| i as f64).collect();
    let bytes = CdfBuilder::new()
        .unlimited_dim("time", 4)
        .dim("y", 2)
        .dim("x", 3)
        .var("rainc", &["time", "y", "x"], data.clone())
        .build();

    let ds = parse_dataset(&bytes).unwrap();
    assert_eq!(ds.dimension("time").unwrap().len, 4);

    let rainc = ds.variable("rainc").unwrap();
    assert_eq!(rainc.shape, vec![4, 2, 3]);
    assert_eq!(rainc.data, data);
}

#[test]
fn test_multiple_record_variables_interleave() {
    // Two record variables of different types; the short slab (3 * 2 bytes)
    // needs padding between records.
    let a: Vec<f64> = (0..6).map(|i| i as f64).collect();
    let b: Vec<f64> = (0..6).map(|i| (100 + i) as f64).collect();
    let bytes = CdfBuilder::new()
        .unlimited_dim("time", 2)
        .dim("x", 3)
        .var_typed("a", &["time", "x"], CdfType::Short, a.clone(), None)
        .var_typed("b", &["time", "x"], CdfType::Double, b.clone(), None)
        .build();

    let ds = parse_dataset(&bytes).unwrap();
    assert_eq!(ds.variable("a").unwrap().data, a);
    assert_eq!(ds.variable("b").unwrap().data, b);
}

#[test]
fn test_single_short_record_variable_unpadded() {
    // With exactly one record variable the per-record slab is not padded.
    let data: Vec<f64> = (0..9).map(|i| i as f64).collect();
    let bytes = CdfBuilder::new()
        .unlimited_dim("time", 3)
        .dim("x", 3)
        .var_typed("v", &["time", "x"], CdfType::Short, data.clone(), None)
        .build();

    let ds = parse_dataset(&bytes).unwrap();
    assert_eq!(ds.variable("v").unwrap().data, data);
}

#[test]
fn test_fill_value_becomes_nan() {
    let data = vec![1.0, -9999.0, 3.0, 4.0];
    let bytes = CdfBuilder::new()
        .dim("x", 4)
        .var_typed("v", &["x"], CdfType::Float, data, Some(-9999.0))
        .build();

    let ds = parse_dataset(&bytes).unwrap();
    let v = ds.variable("v").unwrap();
    assert_eq!(v.data[0], 1.0);
    assert!(v.data[1].is_nan());
    assert_eq!(v.data[2], 3.0);
}

#[test]
fn test_char_variables_skipped() {
    let bytes = CdfBuilder::new()
        .dim("x", 4)
        .var_typed(
            "label",
            &["x"],
            CdfType::Char,
            vec![104.0, 101.0, 121.0, 0.0],
            None,
        )
        .var("v", &["x"], vec![1.0, 2.0, 3.0, 4.0])
        .build();

    let ds = parse_dataset(&bytes).unwrap();
    assert!(ds.variable("label").is_none());
    assert!(ds.variable("v").is_some());
}

#[test]
fn test_cdf2_64bit_offsets() {
    let grid = create_test_grid(4, 4);
    let bytes = CdfBuilder::new()
        .version2()
        .dim("y", 4)
        .dim("x", 4)
        .var("t2", &["y", "x"], grid.clone())
        .build();

    assert_eq!(&bytes[0..4], b"CDF\x02");
    let ds = parse_dataset(&bytes).unwrap();
    assert_eq!(ds.variable("t2").unwrap().data, grid);
}

#[test]
fn test_integer_widening() {
    let bytes = CdfBuilder::new()
        .dim("x", 3)
        .var_typed("b", &["x"], CdfType::Byte, vec![-1.0, 0.0, 127.0], None)
        .var_typed("i", &["x"], CdfType::Int, vec![-70000.0, 0.0, 70000.0], None)
        .build();

    let ds = parse_dataset(&bytes).unwrap();
    assert_eq!(ds.variable("b").unwrap().data, vec![-1.0, 0.0, 127.0]);
    assert_eq!(ds.variable("i").unwrap().data, vec![-70000.0, 0.0, 70000.0]);
}
