//! # Configuration Tests
//!
//! Defaults, JSON deserialization, file loading, and validation.

use std::fs;

use pretty_assertions::assert_eq;
use rstest::rstest;
use tbsim_core::HarnessError;
use tbsim_core::config::*;
use tempfile::TempDir;

#[test]
fn defaults_match_harness_constants() {
    let config = Config::default();
    assert_eq!(config.harness.clock_signal, "clk_0__io");
    assert_eq!(config.harness.reset_signal, "rst_0__io");
    assert_eq!(config.harness.reset_cycles, 20);
    assert_eq!(config.harness.max_delta_cycles, 1000);
    assert_eq!(config.trace.timescale_ns, 100);
    assert_eq!(config.trace.chunk_size, 4096);
    assert!(config.validate().is_ok());
}

#[test]
fn empty_document_is_default() {
    assert_eq!(Config::from_json("{}").unwrap(), Config::default());
}

#[test]
fn partial_sections_keep_other_defaults() {
    let config = Config::from_json(
        r#"{ "harness": { "clock_signal": "clk" }, "trace": { "chunk_size": 16 } }"#,
    )
    .unwrap();
    assert_eq!(config.harness.clock_signal, "clk");
    assert_eq!(config.harness.reset_signal, "rst_0__io");
    assert_eq!(config.trace.chunk_size, 16);
    assert_eq!(config.trace.timescale_ns, 100);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = Config::from_json(r#"{ "harness": { "cycles": 3 } }"#).unwrap_err();
    assert!(matches!(err, HarnessError::ConfigParse(_)));
}

#[rstest]
#[case::zero_reset(r#"{ "harness": { "reset_cycles": 0 } }"#)]
#[case::zero_delta(r#"{ "harness": { "max_delta_cycles": 0 } }"#)]
#[case::empty_clock(r#"{ "harness": { "clock_signal": "" } }"#)]
#[case::same_names(r#"{ "harness": { "clock_signal": "x", "reset_signal": "x" } }"#)]
#[case::zero_chunk(r#"{ "trace": { "chunk_size": 0 } }"#)]
#[case::zero_timescale(r#"{ "trace": { "timescale_ns": 0 } }"#)]
fn invalid_values_are_rejected(#[case] json: &str) {
    let err = Config::from_json(json).unwrap_err();
    assert!(matches!(err, HarnessError::Configuration(_)), "{err}");
}

#[test]
fn loads_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tbsim.json");
    fs::write(&path, r#"{ "harness": { "reset_cycles": 3 } }"#).unwrap();
    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.harness.reset_cycles, 3);
}

#[test]
fn missing_file_names_the_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");
    let err = Config::from_file(&path).unwrap_err();
    assert!(matches!(err, HarnessError::ConfigRead { .. }));
    assert!(err.to_string().contains("absent.json"));
}
