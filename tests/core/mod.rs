//! Core module tests for non-parser functionality
//!
//! Tests for:
//! - Active-set membership and rank resolution
//! - Technology detection
//! - Settings persistence

pub mod active_set_tests;
pub mod settings_tests;
