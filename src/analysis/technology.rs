//! Whole-log technology detection from serving channel numbers.

use crate::parsers::types::{MeasurementSample, Technology};

/// Number of leading samples inspected
pub const DEFAULT_SAMPLE_SIZE: usize = 50;

/// UARFCN ranges that identify a 3G log outright
const UMTS_RANGES: [(f64, f64); 3] = [(10500.0, 10900.0), (2900.0, 3100.0), (4300.0, 4500.0)];

/// Channel number that forces the WCDMA label
const WCDMA_MARKER: f64 = 10788.0;

const GSM_MAX_MEAN: f64 = 1000.0;
const NR_MIN_MEAN: f64 = 120_000.0;

/// Guess the radio technology from the first `sample_size` samples. Only a
/// log without samples is `Unknown`.
pub fn detect_technology(samples: &[MeasurementSample], sample_size: usize) -> Technology {
    if samples.is_empty() {
        return Technology::Unknown;
    }

    let freqs: Vec<f64> = samples
        .iter()
        .take(sample_size)
        .map(|s| s.serving.frequency)
        .filter(|f| f.is_finite())
        .collect();

    classify_frequencies(&freqs)
}

/// Classify a set of serving channel numbers. With no finite channel the
/// mean is undefined and the result falls through to LTE.
pub fn classify_frequencies(freqs: &[f64]) -> Technology {
    if freqs.is_empty() {
        return Technology::Lte;
    }
    if freqs.contains(&WCDMA_MARKER) {
        return Technology::Wcdma;
    }

    let is_umts = freqs
        .iter()
        .any(|f| UMTS_RANGES.iter().any(|(lo, hi)| (*lo..=*hi).contains(f)));
    if is_umts {
        return Technology::Umts;
    }

    let mean = freqs.iter().sum::<f64>() / freqs.len() as f64;
    if mean < GSM_MAX_MEAN {
        Technology::Gsm
    } else if mean > NR_MIN_MEAN {
        Technology::Nr
    } else {
        Technology::Lte
    }
}
