//! Line tokenizer for NMF-style drive-test exports.
//!
//! Each physical line is one record. The first comma-separated field is the
//! record tag, the remaining fields are positional. There is no quoting or
//! escaping in this format, so splitting on `,` is the whole grammar.

use super::types::Category;

/// Tag of cell identity records
pub const TAG_IDENTITY: &str = "CHI";
/// Tag of GPS position records
pub const TAG_GPS: &str = "GPS";
/// Tag of cell measurement records
pub const TAG_MEASUREMENT: &str = "CELLMEAS";

/// What a record tag means to the decoder
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Comment,
    Identity,
    Gps,
    Measurement,
    Signaling(Category),
    Other,
}

impl RecordKind {
    pub fn from_tag(tag: &str) -> Self {
        if tag.starts_with('#') {
            return RecordKind::Comment;
        }
        match tag {
            TAG_IDENTITY => RecordKind::Identity,
            TAG_GPS => RecordKind::Gps,
            TAG_MEASUREMENT => RecordKind::Measurement,
            _ => Category::from_tag(tag).map_or(RecordKind::Other, RecordKind::Signaling),
        }
    }
}

/// A single tokenized line
#[derive(Clone, Debug)]
pub struct Record<'a> {
    /// 1-based line number in the source text
    pub line_no: usize,
    /// Trimmed source line
    pub line: &'a str,
    /// Comma-separated fields, tag included at index 0
    pub fields: Vec<&'a str>,
}

impl<'a> Record<'a> {
    pub fn new(line_no: usize, line: &'a str) -> Self {
        Self {
            line_no,
            line,
            fields: line.split(',').collect(),
        }
    }

    pub fn tag(&self) -> &'a str {
        // split() always yields at least one item
        self.fields[0]
    }

    pub fn kind(&self) -> RecordKind {
        RecordKind::from_tag(self.tag())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    /// Raw field, untrimmed
    pub fn raw(&self, index: usize) -> Option<&'a str> {
        self.fields.get(index).copied()
    }

    /// Trimmed field
    pub fn field(&self, index: usize) -> Option<&'a str> {
        self.raw(index).map(str::trim)
    }

    /// Field as a finite float
    pub fn float(&self, index: usize) -> Option<f64> {
        self.field(index).and_then(parse_float)
    }

    /// Field as an integer, reading the leading digits only (`"3.0"` is 3)
    pub fn int(&self, index: usize) -> Option<i64> {
        self.field(index).and_then(parse_leading_int)
    }

    /// Record time stamp (field 1), empty when absent
    pub fn time(&self) -> &'a str {
        self.field(1).unwrap_or("")
    }
}

/// Parse a finite float. `NaN`/`inf` spellings are treated as missing.
pub fn parse_float(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse the optional sign and leading decimal digits of a field
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let value = value.trim();
    let sign_len = usize::from(value.starts_with(|c: char| c == '-' || c == '+'));
    let digits_end = value[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(value.len(), |i| i + sign_len);

    if digits_end == sign_len {
        return None;
    }
    value[..digits_end].parse().ok()
}

/// Split log text into records, one per non-empty line, in source order.
/// Comment lines are yielded too so callers can observe their tags.
pub fn tokenize(text: &str) -> impl Iterator<Item = Record<'_>> {
    text.lines().enumerate().filter_map(|(i, line)| {
        let line = line.trim();
        if line.is_empty() {
            None
        } else {
            Some(Record::new(i + 1, line))
        }
    })
}
