//! File loading integration tests
//!
//! Tests for end-to-end file loading through the memory-mapped path.

#[path = "../common/mod.rs"]
mod common;

use common::assertions::*;
use common::synthetic::*;
use common::write_temp_log;
use drivelog::parsers::{Nmf, ParseError, Parseable};
use std::path::Path;

fn drive(offset: f64) -> String {
    let mut lines = vec![
        "#START,10:00:00.000,,\"01.01.2024\"".to_string(),
        chi_umts_line("10:00:00.000", 57_089_444, 2010),
    ];
    for i in 0..20 {
        let t = format!("10:00:{:02}.000", i);
        lines.push(gps_line(&t, 33.5 + offset + i as f64 * 0.001, -7.5));
        lines.push(umts_meas_line(
            &t,
            10700.0,
            -80.0 - i as f64,
            &[
                (10700.0, 100, -6.0, -80.0 - i as f64),
                (10700.0, 200, -8.0, -82.0),
            ],
        ));
        lines.push(signaling_line("RRCSM", &t, &["UL", "MEASUREMENT_REPORT"]));
    }
    log(&lines)
}

// ============================================
// Single File Tests
// ============================================

#[test]
fn test_parse_file_matches_parse() {
    let body = drive(0.0);
    let path = write_temp_log("single.nmf", body.as_bytes());

    let parser = Nmf::new();
    let from_file = parser.parse_file(&path).unwrap();
    let from_text = parser.parse(&body).unwrap();

    assert_eq!(from_file.measurements, from_text.measurements);
    assert_eq!(from_file.signaling, from_text.signaling);
    assert_eq!(from_file.stats, from_text.stats);
    assert_eq!(from_file.measurements.len(), 20);
    assert_counts_balance(&from_file);
}

#[test]
fn test_parse_empty_file() {
    let path = write_temp_log("empty.nmf", b"");
    let result = Nmf::new().parse_file(&path).unwrap();
    assert!(result.measurements.is_empty());
    assert_eq!(result.stats.lines, 0);
}

#[test]
fn test_parse_missing_file() {
    let err = Nmf::new()
        .parse_file(Path::new("/nonexistent/drivelog/missing.nmf"))
        .unwrap_err();
    assert!(matches!(err, ParseError::Io(_)));
}

#[test]
fn test_parse_binary_file() {
    let path = write_temp_log("binary.nmf", &[0x47, 0x50, 0x53, 0xFF, 0x00, 0x80]);
    let err = Nmf::new().parse_file(&path).unwrap_err();
    assert!(matches!(err, ParseError::InvalidEncoding { valid_up_to: 3 }));
}

// ============================================
// Multi File Tests
// ============================================

#[test]
fn test_parse_files_keeps_order_and_isolation() {
    let first = write_temp_log("multi-a.nmf", drive(0.0).as_bytes());
    // No GPS in the second log: context must not leak from the first
    let second = write_temp_log(
        "multi-b.nmf",
        generic_meas_line("t", 7, 1300.0, "-90").as_bytes(),
    );
    let third = write_temp_log("multi-c.nmf", drive(1.0).as_bytes());

    let results = Nmf::new().parse_files(&[&first, &second, &third]);
    assert_eq!(results.len(), 3);

    let a = results[0].as_ref().unwrap();
    let b = results[1].as_ref().unwrap();
    let c = results[2].as_ref().unwrap();

    assert_eq!(a.measurements[0].lat, 33.5);
    assert!(b.measurements.is_empty());
    assert_eq!(b.stats.discarded_no_gps, 1);
    assert_eq!(c.measurements[0].lat, 34.5);
}

#[test]
fn test_parse_files_reports_per_file_errors() {
    let good = write_temp_log("multi-good.nmf", drive(0.0).as_bytes());
    let missing = Path::new("/nonexistent/drivelog/missing.nmf").to_path_buf();

    let results = Nmf::new().parse_files(&[good, missing]);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
}
