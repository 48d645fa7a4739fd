//! Parser integration tests organized by record family
//!
//! Each area has its own test module covering:
//! - Format detection
//! - Context tracking across records
//! - Measurement and signaling decoding
//! - Edge cases and error handling
