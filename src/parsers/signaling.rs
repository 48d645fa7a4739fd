//! Heuristic decoding of RRC / L3 signaling records.
//!
//! Signaling records have no name/value tagging: after the tag and time
//! stamp come free-form fields holding some mix of direction keywords,
//! technology names, numeric counters, the message name and a hex dump of
//! the message. [`classify_tokens`] guesses which is which from token shape
//! alone. It is approximate by nature, so the full list of message-name
//! candidates is returned alongside the verdict and every event keeps its
//! source line in `details`.

use regex::Regex;
use std::sync::LazyLock;

use super::record::Record;
use super::types::{Category, Direction, EventType, GpsFix, SignalingEvent};

/// First field examined (after tag and time)
pub const FIRST_TOKEN_FIELD: usize = 2;

/// Tokens shorter than this are never a message name
pub const MIN_TOKEN_LEN: usize = 3;

/// Hex-only tokens longer than this are payload dumps
pub const MAX_HEX_NAME_LEN: usize = 6;

/// Message name used when no candidate survives classification
pub const UNKNOWN_MESSAGE: &str = "Unknown";

const TECHNOLOGY_KEYWORDS: [&str; 4] = ["UMTS", "LTE", "GSM", "WCDMA"];

static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("Failed to compile regex"));
static HEX_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f]+$").expect("Failed to compile regex"));

/// Outcome of classifying the free-form fields of a signaling record
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenClassification {
    pub direction: Direction,
    /// Best message-name candidate, if any
    pub message: Option<String>,
    /// Last hex payload seen
    pub payload: Option<String>,
    /// Every token that competed for the message name, in field order
    pub candidates: Vec<String>,
}

/// Shape of a single cleaned token
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenClass {
    Ignored,
    Direction(Direction),
    Technology,
    Payload,
    Candidate,
}

/// Trim a raw field and drop quote characters
pub fn clean_token(raw: &str) -> String {
    raw.trim().replace('"', "")
}

/// Classify one cleaned token. Direction keywords are checked before the
/// length rule so that `UL` and `DL` are recognized.
pub fn classify_token(token: &str) -> TokenClass {
    if let Some(direction) = Direction::from_keyword(token) {
        return TokenClass::Direction(direction);
    }
    if token.chars().count() < MIN_TOKEN_LEN || NUMERIC_TOKEN.is_match(token) {
        return TokenClass::Ignored;
    }
    let upper = token.to_ascii_uppercase();
    if TECHNOLOGY_KEYWORDS.contains(&upper.as_str()) {
        return TokenClass::Technology;
    }
    if token.len() > MAX_HEX_NAME_LEN && HEX_TOKEN.is_match(token) {
        return TokenClass::Payload;
    }
    TokenClass::Candidate
}

/// Whether `challenger` should replace `current` as the message name.
/// An underscore beats no underscore; otherwise the strictly longer wins.
fn outranks(challenger: &str, current: &str) -> bool {
    match (challenger.contains('_'), current.contains('_')) {
        (true, false) => true,
        (false, true) => false,
        _ => challenger.chars().count() > current.chars().count(),
    }
}

/// Classify the free-form fields of a signaling record
pub fn classify_tokens<'a, I>(fields: I) -> TokenClassification
where
    I: IntoIterator<Item = &'a str>,
{
    let mut result = TokenClassification::default();

    for raw in fields {
        let token = clean_token(raw);
        match classify_token(&token) {
            TokenClass::Ignored | TokenClass::Technology => {}
            TokenClass::Direction(direction) => result.direction = direction,
            TokenClass::Payload => result.payload = Some(token),
            TokenClass::Candidate => {
                let replace = result
                    .message
                    .as_deref()
                    .map_or(true, |current| outranks(&token, current));
                if replace {
                    result.message = Some(token.clone());
                }
                result.candidates.push(token);
            }
        }
    }

    result
}

/// Map a message name to a call/mobility event, first match wins
pub fn detect_event(message: &str) -> Option<EventType> {
    let m = message.to_ascii_uppercase();
    let any = |needles: &[&str]| needles.iter().any(|n| m.contains(n));

    if any(&[
        "HANDOVER_FAILURE",
        "ACTIVE_SET_UPDATE_FAILURE",
        "PHYSICAL_CHANNEL_RECONFIGURATION_FAILURE",
    ]) || (m.contains("FAILURE") && any(&["HO", "RECONF"]))
    {
        Some(EventType::HandoverFailure)
    } else if any(&["RADIO_LINK_FAILURE", "RLF", "DROP"]) {
        Some(EventType::CallDrop)
    } else if any(&["DISCONNECT", "RELEASE_COMPLETE", "DEACTIVATE"]) {
        Some(EventType::CallDisconnect)
    } else if any(&["REJECT", "SETUP_FAILURE", "CALL_FAIL", "ABORT"]) {
        Some(EventType::CallFail)
    } else {
        None
    }
}

/// Decode a signaling record. Position comes from the last GPS fix, if any.
pub fn decode_signaling(record: &Record, category: Category, gps: Option<GpsFix>) -> SignalingEvent {
    let tokens = classify_tokens(record.fields.iter().skip(FIRST_TOKEN_FIELD).copied());
    let message = tokens
        .message
        .unwrap_or_else(|| UNKNOWN_MESSAGE.to_string());

    SignalingEvent {
        time: record.time().to_string(),
        lat: gps.map(|g| g.lat),
        lng: gps.map(|g| g.lng),
        category,
        direction: tokens.direction,
        event: detect_event(&message),
        message,
        payload_hex: tokens.payload,
        details: record.line.to_string(),
    }
}
