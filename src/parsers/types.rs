use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use strum::{AsRefStr, Display, EnumString};

use super::error::ParseError;

/// Serialize label enums as their display string rather than the variant name
macro_rules! serialize_as_label {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Serialize for $ty {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: Serializer,
                {
                    serializer.serialize_str(self.as_ref())
                }
            }
        )+
    };
}

/// Sentinel written in place of an identity value that was never observed
pub const NOT_AVAILABLE: &str = "N/A";

fn serialize_or_na<S>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) => serializer.serialize_i64(*v),
        None => serializer.serialize_str(NOT_AVAILABLE),
    }
}

/// Most recent position fix reported by the GPS receiver
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GpsFix {
    pub lat: f64,
    pub lng: f64,
    pub altitude: Option<f64>,
    pub speed_kmh: Option<f64>,
}

/// Location area and cell identity of the serving cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CellIdentity {
    #[serde(serialize_with = "serialize_or_na")]
    pub lac: Option<i64>,
    #[serde(serialize_with = "serialize_or_na")]
    pub cell_id: Option<i64>,
}

impl CellIdentity {
    /// Radio network controller id (upper 16 bits of a UMTS cell id)
    pub fn rnc(&self) -> Option<i64> {
        self.cell_id.filter(|id| *id >= 0).map(|id| id >> 16)
    }

    /// Cell id within the RNC (lower 16 bits)
    pub fn cid(&self) -> Option<i64> {
        self.cell_id.filter(|id| *id >= 0).map(|id| id & 0xFFFF)
    }
}

/// Frequency band label derived from the channel number
#[derive(AsRefStr, Clone, Copy, Debug, Default, Display, EnumString, PartialEq, Eq)]
pub enum Band {
    #[strum(serialize = "B1 (2100)")]
    B1,
    #[strum(serialize = "B8 (900)")]
    B8,
    #[strum(serialize = "High Band")]
    HighBand,
    #[strum(serialize = "Low Band")]
    LowBand,
    #[default]
    Unknown,
}

impl Band {
    /// Label a channel number. Only used for display, never for comparisons.
    pub fn from_frequency(freq: f64) -> Self {
        if (10562.0..=10838.0).contains(&freq) {
            Band::B1
        } else if (2937.0..=3088.0).contains(&freq) {
            Band::B8
        } else if freq > 10000.0 {
            Band::HighBand
        } else if freq < 4000.0 {
            Band::LowBand
        } else {
            Band::Unknown
        }
    }
}

/// How a neighbor entered the measurement report
#[derive(AsRefStr, Clone, Copy, Debug, Default, Display, EnumString, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum NeighborKind {
    #[default]
    Normal,
    Detected,
}

/// Best-guess radio technology of a whole log
#[derive(AsRefStr, Clone, Copy, Debug, Default, Display, EnumString, PartialEq, Eq)]
pub enum Technology {
    #[strum(serialize = "2G (GSM)")]
    Gsm,
    #[strum(serialize = "3G (UMTS)")]
    Umts,
    #[strum(serialize = "3G (WCDMA)")]
    Wcdma,
    #[strum(serialize = "4G (LTE)")]
    Lte,
    #[strum(serialize = "5G (NR)")]
    Nr,
    #[default]
    Unknown,
}

/// Protocol layer a signaling record belongs to
#[derive(AsRefStr, Clone, Copy, Debug, Display, EnumString, PartialEq, Eq)]
pub enum Category {
    #[strum(serialize = "RRC")]
    Rrc,
    #[strum(serialize = "L3")]
    L3,
}

impl Category {
    /// Classify a record tag. Tags mentioning L3 or NAS are layer 3, any
    /// other tag mentioning RRC is RRC. Everything else is not signaling.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let upper = tag.to_ascii_uppercase();
        if upper.contains("L3") || upper.contains("NAS") {
            Some(Category::L3)
        } else if upper.contains("RRC") {
            Some(Category::Rrc)
        } else {
            None
        }
    }
}

/// Link direction of a signaling message
#[derive(AsRefStr, Clone, Copy, Debug, Default, Display, EnumString, PartialEq, Eq)]
pub enum Direction {
    #[strum(serialize = "UL")]
    Uplink,
    #[strum(serialize = "DL")]
    Downlink,
    #[default]
    #[strum(serialize = "-")]
    Unknown,
}

impl Direction {
    /// Map a direction keyword (`UL`, `DL`, `UPLINK`, `DOWNLINK`, any case)
    pub fn from_keyword(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "UL" | "UPLINK" => Some(Direction::Uplink),
            "DL" | "DOWNLINK" => Some(Direction::Downlink),
            _ => None,
        }
    }
}

/// Call/mobility event inferred from a signaling message name
#[derive(AsRefStr, Clone, Copy, Debug, Display, EnumString, PartialEq, Eq)]
pub enum EventType {
    #[strum(serialize = "HO Fail")]
    HandoverFailure,
    #[strum(serialize = "Call Drop")]
    CallDrop,
    #[strum(serialize = "Call Disconnect")]
    CallDisconnect,
    #[strum(serialize = "Call Fail")]
    CallFail,
}

serialize_as_label!(Band, NeighborKind, Technology, Category, Direction, EventType);

/// One neighbor entry decoded from a measurement record
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Neighbor {
    pub frequency: f64,
    pub pci: i64,
    pub quality: Option<f64>,
    pub level: Option<f64>,
    pub band: Band,
    pub kind: NeighborKind,
}

/// Raw serving-cell block of a measurement sample
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ServingCell {
    pub frequency: f64,
    pub level: f64,
    pub quality: Option<f64>,
    pub band: Band,
    pub pci: Option<i64>,
    #[serde(flatten)]
    pub identity: CellIdentity,
}

/// Neighbor exposed under a rank slot (n1/n2/n3)
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RankedNeighbor {
    pub sc: i64,
    pub level: Option<f64>,
    pub quality: Option<f64>,
}

/// Active-set position resolved back to a cell (a1/a2/a3)
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ActiveRank {
    pub sc: i64,
    pub level: Option<f64>,
}

/// A decoded measurement record anchored to the last GPS fix
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MeasurementSample {
    pub time: String,
    pub lat: f64,
    pub lng: f64,
    pub altitude: Option<f64>,
    pub speed_kmh: Option<f64>,

    pub level: f64,
    pub ecno: Option<f64>,
    pub sc: Option<i64>,
    pub freq: f64,
    pub band: Band,
    #[serde(flatten)]
    pub identity: CellIdentity,
    pub rnc: Option<i64>,
    pub cid: Option<i64>,

    pub n1: Option<RankedNeighbor>,
    pub n2: Option<RankedNeighbor>,
    pub n3: Option<RankedNeighbor>,

    pub active_set: Vec<i64>,
    pub a1: Option<ActiveRank>,
    pub a2: Option<ActiveRank>,
    pub a3: Option<ActiveRank>,

    pub serving: ServingCell,
    pub neighbors: Vec<Neighbor>,
    pub details: String,
}

impl MeasurementSample {
    /// Resolve a 1-based active-set position from the stored serving and
    /// neighbor blocks. Matches the eager `a1`..`a3` fields.
    pub fn active_rank(&self, rank: usize) -> Option<ActiveRank> {
        crate::analysis::active_set::resolve_rank(
            &self.active_set,
            &self.serving,
            &self.neighbors,
            rank,
        )
    }
}

/// A decoded signaling record
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SignalingEvent {
    pub time: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub category: Category,
    pub direction: Direction,
    pub message: String,
    pub payload_hex: Option<String>,
    pub event: Option<EventType>,
    pub details: String,
}

/// Record counters collected while parsing
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ParseStats {
    /// Non-empty lines seen, comments included
    pub lines: usize,
    pub comments: usize,
    /// Every distinct record tag, comments included
    pub record_types: BTreeSet<String>,
    pub identity_records: usize,
    pub gps_records: usize,
    pub measurement_records: usize,
    /// Measurement records seen before any GPS fix
    pub discarded_no_gps: usize,
    /// Measurement records rejected by the level rule
    pub discarded_level: usize,
    pub signaling_records: usize,
}

impl ParseStats {
    pub fn discarded(&self) -> usize {
        self.discarded_no_gps + self.discarded_level
    }
}

/// Parsed log file structure
#[derive(Clone, Debug, Default, Serialize)]
pub struct ParseResult {
    pub measurements: Vec<MeasurementSample>,
    pub signaling: Vec<SignalingEvent>,
    pub technology: Technology,
    pub stats: ParseStats,
}

/// Trait for log file parsers
pub trait Parseable {
    fn parse(&self, data: &str) -> Result<ParseResult, ParseError>;
}
