//! `CELLMEAS` record decoding.
//!
//! A measurement record carries the serving channel and level at offsets that
//! depend on the technology id in field 3. Only the UMTS layout carries a
//! neighbor block: fixed-stride groups of fields, one per measured cell,
//! starting at field 14.
//!
//! All offsets below are reverse-engineered from captured logs. They are
//! kept as literal constants so they can be checked against new captures.

use super::context::ContextSnapshot;
use super::record::Record;
use super::types::{Band, MeasurementSample, Neighbor, NeighborKind, ServingCell};
use crate::analysis::active_set;
use crate::settings::ParserSettings;

/// Level value the equipment writes when it has no measurement
pub const NO_MEASUREMENT: f64 = -999.0;

/// Levels above this are corrupt (received power is never positive here)
pub const DEFAULT_LEVEL_CEILING: f64 = 0.0;

const MEAS_TECHNOLOGY: usize = 3;

/// Position of one neighbor's fields relative to the start of its group
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeighborBlock {
    pub start: usize,
    pub stride: usize,
    pub frequency: usize,
    pub pci: usize,
    pub quality: usize,
    pub level: usize,
}

/// Field layout of one measurement record variant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeasurementLayout {
    pub name: &'static str,
    /// Records shorter than this carry no measurement
    pub min_fields: usize,
    pub frequency: usize,
    pub level: usize,
    pub neighbors: Option<NeighborBlock>,
}

pub static UMTS_LAYOUT: MeasurementLayout = MeasurementLayout {
    name: "UMTS",
    min_fields: 0,
    frequency: 7,
    level: 8,
    neighbors: Some(NeighborBlock {
        start: 14,
        stride: 17,
        frequency: 0,
        pci: 1,
        quality: 2,
        level: 4,
    }),
};

pub static LEGACY_LAYOUT: MeasurementLayout = MeasurementLayout {
    name: "Legacy",
    min_fields: 12,
    frequency: 8,
    level: 11,
    neighbors: None,
};

pub static GENERIC_LAYOUT: MeasurementLayout = MeasurementLayout {
    name: "Generic",
    min_fields: 0,
    frequency: 7,
    level: 8,
    neighbors: None,
};

impl MeasurementLayout {
    pub fn for_technology(tech_id: Option<i64>) -> &'static MeasurementLayout {
        match tech_id {
            Some(5) => &UMTS_LAYOUT,
            Some(1) | Some(2) => &LEGACY_LAYOUT,
            _ => &GENERIC_LAYOUT,
        }
    }
}

/// Why a measurement record produced no sample
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiscardReason {
    /// No GPS fix has been seen yet
    MissingGps,
    /// Level is the no-measurement sentinel or the record is too short
    NoMeasurement,
    /// Level field is missing or not a finite number
    UnparseableLevel,
    /// Level is above the sanity ceiling
    AboveCeiling,
}

/// Validate a serving level against the discard rule
pub fn check_level(level: Option<f64>, ceiling: f64) -> Result<f64, DiscardReason> {
    match level {
        None => Err(DiscardReason::UnparseableLevel),
        Some(l) if l == NO_MEASUREMENT => Err(DiscardReason::NoMeasurement),
        Some(l) if l > ceiling => Err(DiscardReason::AboveCeiling),
        Some(l) => Ok(l),
    }
}

/// Decode every complete neighbor group of a record
pub fn decode_neighbors(record: &Record, block: &NeighborBlock) -> Vec<Neighbor> {
    (block.start..)
        .step_by(block.stride)
        .take_while(|j| j + block.level < record.len())
        .filter_map(|j| {
            let frequency = record.float(j + block.frequency)?;
            let pci = record.int(j + block.pci)?;
            Some(Neighbor {
                frequency,
                pci,
                quality: record.float(j + block.quality),
                level: record.float(j + block.level),
                band: Band::from_frequency(frequency),
                kind: NeighborKind::Normal,
            })
        })
        .collect()
}

/// Decode a `CELLMEAS` record against the context captured when it was read
pub fn decode_measurement(
    record: &Record,
    context: &ContextSnapshot,
    settings: &ParserSettings,
) -> Result<MeasurementSample, DiscardReason> {
    let gps = context.gps.ok_or(DiscardReason::MissingGps)?;
    let layout = MeasurementLayout::for_technology(record.int(MEAS_TECHNOLOGY));

    let (frequency, level) = if record.len() >= layout.min_fields {
        (
            record.float(layout.frequency).unwrap_or(f64::NAN),
            record.float(layout.level),
        )
    } else {
        (f64::NAN, Some(NO_MEASUREMENT))
    };
    let level = check_level(level, settings.level_ceiling)?;

    let mut neighbors = layout
        .neighbors
        .map(|block| decode_neighbors(record, &block))
        .unwrap_or_default();

    // The serving cell shows up in its own neighbor block as the first
    // entry on the serving channel.
    let serving_entry = neighbors
        .iter()
        .find(|n| active_set::same_frequency(n.frequency, frequency));
    let serving = ServingCell {
        frequency,
        level,
        quality: serving_entry.and_then(|n| n.quality),
        band: Band::from_frequency(frequency),
        pci: serving_entry.map(|n| n.pci),
        identity: context.identity,
    };

    if let Some(sc) = serving.pci {
        neighbors.retain(|n| n.pci != sc);
    }
    active_set::sort_neighbors(&mut neighbors);

    let [n1, n2, n3] = active_set::ranked_neighbors(&neighbors);
    let active = active_set::compute(&serving, &neighbors, settings.active_set_window);
    let rank = |r| active_set::resolve_rank(&active, &serving, &neighbors, r);
    let (a1, a2, a3) = (rank(1), rank(2), rank(3));

    Ok(MeasurementSample {
        time: record.time().to_string(),
        lat: gps.lat,
        lng: gps.lng,
        altitude: gps.altitude,
        speed_kmh: gps.speed_kmh,
        level,
        ecno: serving.quality,
        sc: serving.pci,
        freq: frequency,
        band: serving.band,
        identity: context.identity,
        rnc: context.identity.rnc(),
        cid: context.identity.cid(),
        n1,
        n2,
        n3,
        active_set: active,
        a1,
        a2,
        a3,
        serving,
        neighbors,
        details: record.line.to_string(),
    })
}
