//! Per-parse tracking of the last GPS fix and serving-cell identity.
//!
//! NMF exports never link a measurement to the position or cell it belongs
//! to. The link is implicit: a measurement belongs to whatever GPS and `CHI`
//! records came before it. [`ParseContext`] holds that running state for one
//! parse. It is only written by GPS and identity records.

use super::record::Record;
use super::types::{CellIdentity, GpsFix};

// GPS record layout: GPS,time,,lon,lat,alt,...,speed
const GPS_MIN_FIELDS: usize = 5;
const GPS_LON: usize = 3;
const GPS_LAT: usize = 4;
const GPS_ALTITUDE: usize = 5;
const GPS_SPEED: usize = 8;

// CHI record: technology id at field 3
const CHI_TECHNOLOGY: usize = 3;
const TECH_UMTS: i64 = 5;
const TECH_LTE: i64 = 7;

// LTE: CHI,time,,7,plmn,1,?,?,?,cell_id,lac
const LTE_MIN_FIELDS: usize = 11;
const LTE_CELL_ID: usize = 9;
const LTE_LAC: usize = 10;

// Any other technology
const OTHER_MIN_FIELDS: usize = 11;
const OTHER_CELL_ID: usize = 8;
const OTHER_LAC: usize = 10;

// UMTS: CHI,time,,5,plmn,1,freq,cell_id,lac,psc... with variable placement
const UMTS_SEARCH: std::ops::Range<usize> = 6..14;
const UMTS_FULL_CELL_ID_FLOOR: i64 = 20_000;
const UMTS_MIN_FIXED_FIELDS: usize = 8;
const UMTS_FIXED_CELL_ID: usize = 7;
const UMTS_FIXED_LAC: usize = 8;
const U16_EXCLUSIVE_MAX: i64 = 65_535;

/// Copy of the context taken when a measurement or signaling record is seen
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContextSnapshot {
    pub gps: Option<GpsFix>,
    pub identity: CellIdentity,
}

/// Running state for one parse. Never shared between parses.
#[derive(Clone, Debug, Default)]
pub struct ParseContext {
    gps: Option<GpsFix>,
    identity: CellIdentity,
    rnc: Option<i64>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gps(&self) -> Option<GpsFix> {
        self.gps
    }

    pub fn identity(&self) -> CellIdentity {
        self.identity
    }

    /// Last RNC inferred from a UMTS identity record
    pub fn rnc(&self) -> Option<i64> {
        self.rnc
    }

    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            gps: self.gps,
            identity: self.identity,
        }
    }

    /// Apply a GPS record. The fix is replaced only when both latitude and
    /// longitude parse; returns whether it was replaced.
    pub fn on_gps_record(&mut self, record: &Record) -> bool {
        if record.len() < GPS_MIN_FIELDS {
            return false;
        }

        match (record.float(GPS_LAT), record.float(GPS_LON)) {
            (Some(lat), Some(lng)) => {
                self.gps = Some(GpsFix {
                    lat,
                    lng,
                    altitude: record.float(GPS_ALTITUDE),
                    speed_kmh: record.float(GPS_SPEED),
                });
                true
            }
            _ => false,
        }
    }

    /// Apply a `CHI` record. Values that fail to parse leave the previous
    /// value in place.
    pub fn on_identity_record(&mut self, record: &Record) {
        match record.int(CHI_TECHNOLOGY) {
            Some(TECH_UMTS) => self.on_umts_identity(record),
            Some(TECH_LTE) => {
                if record.len() >= LTE_MIN_FIELDS {
                    self.update(record.int(LTE_CELL_ID), record.int(LTE_LAC));
                }
            }
            _ => {
                if record.len() >= OTHER_MIN_FIELDS {
                    self.update(record.int(OTHER_CELL_ID), record.int(OTHER_LAC));
                }
            }
        }
    }

    fn update(&mut self, cell_id: Option<i64>, lac: Option<i64>) {
        if cell_id.is_some() {
            self.identity.cell_id = cell_id;
        }
        if lac.is_some() {
            self.identity.lac = lac;
        }
    }

    /// UMTS identity fields move around between firmware versions. Try, in
    /// order: a full (RNC << 16 | CID) cell id, an RNC + short CID pair, and
    /// finally the fixed offsets.
    fn on_umts_identity(&mut self, record: &Record) {
        let window = UMTS_SEARCH.start..record.len().min(UMTS_SEARCH.end);

        let full_id = window
            .clone()
            .find(|&k| record.int(k).is_some_and(|v| v > UMTS_FULL_CELL_ID_FLOOR));
        if let Some(k) = full_id {
            let lac = record
                .int(k + 1)
                .filter(|v| *v > 0 && *v < U16_EXCLUSIVE_MAX);
            self.update(record.int(k), lac);
            return;
        }

        if let Some(cell_id) = self.synthesize_umts_cell_id(record, window) {
            self.identity.cell_id = Some(cell_id);
            return;
        }

        if record.len() >= UMTS_MIN_FIXED_FIELDS {
            let cell_id = record.int(UMTS_FIXED_CELL_ID).filter(|v| *v > 0);
            self.update(cell_id, record.int(UMTS_FIXED_LAC));
        }
    }

    /// Find an RNC (first small integer above 10) and a short CID elsewhere
    /// in the window. The RNC is remembered even when no CID is found.
    fn synthesize_umts_cell_id(
        &mut self,
        record: &Record,
        window: std::ops::Range<usize>,
    ) -> Option<i64> {
        let (rnc_index, rnc) = window.clone().find_map(|k| {
            record
                .int(k)
                .filter(|v| *v > 10 && *v < 4096)
                .map(|v| (k, v))
        })?;
        self.rnc = Some(rnc);

        let cid = window
            .filter(|&m| m != rnc_index)
            .find_map(|m| short_cid_candidate(record, m))?;
        Some((rnc << 16) + cid)
    }
}

/// A field that plausibly holds a short UMTS CID: a plain integer that is
/// not a metric, not a UARFCN and not a technology/status flag.
fn short_cid_candidate(record: &Record, index: usize) -> Option<i64> {
    let raw = record.field(index)?;
    if raw.contains('.') {
        return None;
    }

    // A channel number is followed by its level (negative or decimal)
    let followed_by_level = record.float(index + 1).is_some_and(|next| {
        next < 0.0 || record.field(index + 1).is_some_and(|f| f.contains('.'))
    });
    if followed_by_level {
        return None;
    }

    let cid = record.int(index)?;
    if is_uarfcn(cid) || cid > 9000 {
        return None;
    }
    if cid > 0 && cid < U16_EXCLUSIVE_MAX && cid != TECH_UMTS && cid != 1 {
        Some(cid)
    } else {
        None
    }
}

fn is_uarfcn(value: i64) -> bool {
    (10562..=10838).contains(&value) || (2937..=3088).contains(&value)
}
