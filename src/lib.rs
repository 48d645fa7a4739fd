//! DriveLog - A drive-test log parsing engine written in Rust
//!
//! This library turns raw NMF drive-test exports into geo-referenced radio
//! measurement samples and signaling events, ready for map rendering or
//! export.
//!
//! ## Module Structure
//!
//! - [`parsers`] - Log tokenizing, context tracking and record decoders
//!   - `nmf` - The NMF parser entry point ([`parsers::Nmf`])
//!   - `measurement` - `CELLMEAS` layouts and the discard rule
//!   - `signaling` - Heuristic RRC / L3 message classification
//! - [`analysis`] - Active-set ranking and technology detection
//! - [`settings`] - Parser settings persistence

pub mod analysis;
pub mod parsers;
pub mod settings;
