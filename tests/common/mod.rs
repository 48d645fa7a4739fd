//! Common test utilities shared across all test modules
//!
//! This module provides builders for synthetic NMF lines, assertion
//! helpers for parse results, and float comparison helpers.

#![allow(dead_code)]

use std::path::PathBuf;

/// Write `contents` to a fresh file under the system temp directory and
/// return its path. `name` must be unique per test.
pub fn write_temp_log(name: &str, contents: &[u8]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("drivelog-tests-{}", std::process::id()));
    std::fs::create_dir_all(&dir)
        .unwrap_or_else(|e| panic!("Failed to create temp dir '{}': {}", dir.display(), e));
    let path = dir.join(name);
    std::fs::write(&path, contents)
        .unwrap_or_else(|e| panic!("Failed to write temp log '{}': {}", path.display(), e));
    path
}

/// Synthetic NMF line builders
pub mod synthetic {
    /// `GPS` record with longitude before latitude, as the equipment writes it
    pub fn gps_line(time: &str, lat: f64, lng: f64) -> String {
        format!("GPS,{},,{},{},120,4,0.9,36.5", time, lng, lat)
    }

    /// LTE `CHI` record (cell id at field 9, lac at field 10)
    pub fn chi_lte_line(time: &str, cell_id: i64, lac: i64) -> String {
        format!("CHI,{},,7,60401,1,1300,6,x,{},{}", time, cell_id, lac)
    }

    /// UMTS `CHI` record carrying a full 28-bit cell id followed by the lac
    pub fn chi_umts_line(time: &str, cell_id: i64, lac: i64) -> String {
        format!("CHI,{},,5,60401,1,10700,{},{},100", time, cell_id, lac)
    }

    /// UMTS `CELLMEAS` record: 14 header fields, then one 17-field group per
    /// `(freq, pci, ecno, rscp)` entry
    pub fn umts_meas_line(time: &str, freq: f64, level: f64, cells: &[(f64, i64, f64, f64)]) -> String {
        let mut fields: Vec<String> = vec![String::new(); 14];
        fields[0] = "CELLMEAS".into();
        fields[1] = time.into();
        fields[3] = "5".into();
        fields[7] = freq.to_string();
        fields[8] = level.to_string();
        for &(f, pci, ecno, rscp) in cells {
            let mut group = vec![String::new(); 17];
            group[0] = f.to_string();
            group[1] = pci.to_string();
            group[2] = ecno.to_string();
            group[4] = rscp.to_string();
            fields.extend(group);
        }
        fields.join(",")
    }

    /// Generic-layout `CELLMEAS` record (frequency at 7, level at 8)
    pub fn generic_meas_line(time: &str, tech_id: i64, freq: f64, level: &str) -> String {
        format!("CELLMEAS,{},,{},x,x,x,{},{}", time, tech_id, freq, level)
    }

    /// Signaling record with free-form tokens after the time stamp
    pub fn signaling_line(tag: &str, time: &str, tokens: &[&str]) -> String {
        format!("{},{},{}", tag, time, tokens.join(","))
    }

    /// Join lines into a log body
    pub fn log(lines: &[String]) -> String {
        lines.join("\n")
    }
}

/// Assertion helpers for common test patterns
pub mod assertions {
    use drivelog::parsers::ParseResult;

    /// Every measurement record is either a sample or counted as discarded
    pub fn assert_counts_balance(result: &ParseResult) {
        let stats = &result.stats;
        assert_eq!(
            result.measurements.len() + stats.discarded_no_gps + stats.discarded_level,
            stats.measurement_records,
            "Samples plus discards should equal measurement records: {:?}",
            stats
        );
        assert_eq!(result.signaling.len(), stats.signaling_records);
    }

    /// No sample may carry a sentinel, non-finite or positive serving level
    pub fn assert_levels_valid(result: &ParseResult) {
        for (i, sample) in result.measurements.iter().enumerate() {
            assert!(
                sample.level.is_finite() && sample.level != -999.0 && sample.level <= 0.0,
                "Sample {} has invalid level {}",
                i,
                sample.level
            );
        }
    }

    /// A serving cell id never appears among its own neighbors
    pub fn assert_no_self_neighbor(result: &ParseResult) {
        for (i, sample) in result.measurements.iter().enumerate() {
            if let Some(sc) = sample.sc {
                assert!(
                    !sample.neighbors.iter().any(|n| n.pci == sc),
                    "Sample {} lists serving cell {} as a neighbor",
                    i,
                    sc
                );
            }
        }
    }

    /// Eager rank fields agree with the on-demand accessor
    pub fn assert_ranks_consistent(result: &ParseResult) {
        for sample in &result.measurements {
            assert_eq!(sample.a1, sample.active_rank(1));
            assert_eq!(sample.a2, sample.active_rank(2));
            assert_eq!(sample.a3, sample.active_rank(3));
        }
    }
}

/// Float comparison helpers for testing
pub mod float_cmp {
    /// Check if two floats are approximately equal within a tolerance
    pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    /// Assert that two floats are approximately equal
    pub fn assert_approx_eq(a: f64, b: f64, tolerance: f64) {
        assert!(
            approx_eq(a, b, tolerance),
            "Values not approximately equal: {} vs {} (tolerance: {})",
            a,
            b,
            tolerance
        );
    }

    /// Default tolerance for float comparisons (0.0001)
    pub const DEFAULT_TOLERANCE: f64 = 0.0001;
}
