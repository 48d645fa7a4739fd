//! Nemo-style NMF drive-test log parser.
//!
//! An NMF log is line-oriented comma-separated text. Every line starts with
//! a record tag. Position (`GPS`) and serving-cell identity (`CHI`) records
//! set up context; measurement (`CELLMEAS`) and signaling records are
//! interpreted against whatever context preceded them.
//!
//! Parsing runs in three phases:
//! 1. a sequential walk that applies context records and captures a
//!    [`ContextSnapshot`] for every record that needs one
//! 2. a parallel decode of the captured records, which is pure
//! 3. a sequential in-order aggregation into the [`ParseResult`]

use memmap2::Mmap;
use rayon::prelude::*;
use std::fs::File;
use std::path::Path;

use super::context::{ContextSnapshot, ParseContext};
use super::error::ParseError;
use super::measurement::{decode_measurement, DiscardReason};
use super::record::{tokenize, Record, RecordKind, TAG_GPS, TAG_IDENTITY, TAG_MEASUREMENT};
use super::signaling::decode_signaling;
use super::types::{Category, MeasurementSample, ParseResult, ParseStats, Parseable, SignalingEvent};
use crate::analysis::detect_technology;
use crate::settings::ParserSettings;

/// Lines inspected by [`Nmf::detect`]
const DETECT_LINES: usize = 50;

/// NMF log file parser
#[derive(Clone, Debug, Default)]
pub struct Nmf {
    settings: ParserSettings,
}

/// A record captured in phase 1, waiting to be decoded
enum Pending<'a> {
    Measurement(Record<'a>, ContextSnapshot),
    Signaling(Record<'a>, Category, ContextSnapshot),
}

enum Decoded {
    Measurement(usize, Result<MeasurementSample, DiscardReason>),
    Signaling(SignalingEvent),
}

impl Pending<'_> {
    fn decode(self, settings: &ParserSettings) -> Decoded {
        match self {
            Pending::Measurement(record, snapshot) => Decoded::Measurement(
                record.line_no,
                decode_measurement(&record, &snapshot, settings),
            ),
            Pending::Signaling(record, category, snapshot) => {
                Decoded::Signaling(decode_signaling(&record, category, snapshot.gps))
            }
        }
    }
}

impl Nmf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ParserSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    /// Detect if content looks like an NMF log
    pub fn detect(contents: &str) -> bool {
        contents.lines().take(DETECT_LINES).any(|line| {
            let tag = line.split(',').next().unwrap_or("").trim();
            tag.starts_with("#START")
                || matches!(tag, TAG_IDENTITY | TAG_GPS | TAG_MEASUREMENT)
        })
    }

    /// Parse raw bytes. Fails only when the bytes are not UTF-8.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<ParseResult, ParseError> {
        let text = std::str::from_utf8(bytes)?;
        self.parse(text)
    }

    /// Parse a log file from disk
    pub fn parse_file(&self, path: &Path) -> Result<ParseResult, ParseError> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return self.parse("");
        }

        // SAFETY: the mapping is read-only and dropped before returning. The
        // log must not be truncated by another process while it is parsed.
        let mmap = unsafe { Mmap::map(&file)? };
        let result = self.parse_bytes(&mmap);

        if let Err(e) = &result {
            tracing::warn!("Failed to parse {}: {}", path.display(), e);
        }
        result
    }

    /// Parse several logs in parallel. Each log gets its own context and
    /// results come back in input order.
    pub fn parse_files<P>(&self, paths: &[P]) -> Vec<Result<ParseResult, ParseError>>
    where
        P: AsRef<Path> + Sync,
    {
        paths
            .par_iter()
            .map(|path| self.parse_file(path.as_ref()))
            .collect()
    }
}

impl Parseable for Nmf {
    fn parse(&self, data: &str) -> Result<ParseResult, ParseError> {
        let mut stats = ParseStats::default();
        let mut context = ParseContext::new();
        let mut pending: Vec<Pending> = Vec::new();

        // Phase 1: walk records in order, maintaining context
        for record in tokenize(data) {
            stats.lines += 1;
            stats.record_types.insert(record.tag().to_string());

            match record.kind() {
                RecordKind::Comment => stats.comments += 1,
                RecordKind::Identity => {
                    stats.identity_records += 1;
                    context.on_identity_record(&record);
                }
                RecordKind::Gps => {
                    stats.gps_records += 1;
                    context.on_gps_record(&record);
                }
                RecordKind::Measurement => {
                    stats.measurement_records += 1;
                    let snapshot = context.snapshot();
                    pending.push(Pending::Measurement(record, snapshot));
                }
                RecordKind::Signaling(category) => {
                    stats.signaling_records += 1;
                    let snapshot = context.snapshot();
                    pending.push(Pending::Signaling(record, category, snapshot));
                }
                RecordKind::Other => {}
            }
        }

        // Phase 2: decode in parallel, order preserved by the indexed collect
        let settings = &self.settings;
        let decoded: Vec<Decoded> = pending
            .into_par_iter()
            .map(|p| p.decode(settings))
            .collect();

        // Phase 3: aggregate sequentially
        let mut measurements = Vec::with_capacity(stats.measurement_records);
        let mut signaling = Vec::with_capacity(stats.signaling_records);

        for item in decoded {
            match item {
                Decoded::Measurement(_, Ok(sample)) => measurements.push(sample),
                Decoded::Measurement(line_no, Err(reason)) => {
                    match reason {
                        DiscardReason::MissingGps => stats.discarded_no_gps += 1,
                        _ => stats.discarded_level += 1,
                    }
                    tracing::trace!("Discarded measurement at line {}: {:?}", line_no, reason);
                }
                Decoded::Signaling(event) => signaling.push(event),
            }
        }

        let technology = detect_technology(&measurements, settings.technology_sample_size);

        tracing::debug!("NMF record types: {:?}", stats.record_types);
        tracing::info!(
            "Parsed NMF log: {} lines, {} measurements ({} discarded), {} signaling events, technology {}",
            stats.lines,
            measurements.len(),
            stats.discarded(),
            signaling.len(),
            technology
        );

        Ok(ParseResult {
            measurements,
            signaling,
            technology,
            stats,
        })
    }
}
