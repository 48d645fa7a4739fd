pub mod context;
pub mod error;
pub mod measurement;
pub mod nmf;
pub mod record;
pub mod signaling;
pub mod types;

pub use error::ParseError;
pub use nmf::Nmf;
pub use types::{MeasurementSample, ParseResult, ParseStats, Parseable, SignalingEvent, Technology};
