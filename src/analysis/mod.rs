//! Derived metrics computed from decoded measurement samples.
//!
//! - [`active_set`] - Active-set candidates, rank accessors and neighbor ranking
//! - [`technology`] - Whole-log technology detection from serving channels

pub mod active_set;
pub mod technology;

pub use active_set::{resolve_rank, DEFAULT_WINDOW};
pub use technology::{detect_technology, DEFAULT_SAMPLE_SIZE};
