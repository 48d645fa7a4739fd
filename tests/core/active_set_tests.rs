//! Tests for active-set membership and rank resolution
//!
//! Tests cover:
//! - Window boundaries
//! - Stable ordering on equal levels
//! - Rank lookups past the end of the set

use drivelog::analysis::active_set::{candidates, compute, CandidateSource};
use drivelog::analysis::{resolve_rank, DEFAULT_WINDOW};
use drivelog::parsers::types::{ActiveRank, Band, CellIdentity, Neighbor, NeighborKind, ServingCell};

fn serving(pci: i64, level: f64) -> ServingCell {
    ServingCell {
        frequency: 10700.0,
        level,
        quality: Some(-6.0),
        band: Band::B1,
        pci: Some(pci),
        identity: CellIdentity::default(),
    }
}

fn neighbor(pci: i64, level: f64) -> Neighbor {
    Neighbor {
        frequency: 10700.0,
        pci,
        quality: None,
        level: Some(level),
        band: Band::B1,
        kind: NeighborKind::Normal,
    }
}

// ============================================
// Window Tests
// ============================================

#[test]
fn test_window_boundary_is_inclusive() {
    let s = serving(1, -80.0);
    let n = vec![neighbor(2, -86.0), neighbor(3, -86.01)];
    assert_eq!(compute(&s, &n, DEFAULT_WINDOW), vec![1, 2]);
}

#[test]
fn test_custom_window() {
    let s = serving(1, -80.0);
    let n = vec![neighbor(2, -82.0), neighbor(3, -84.0)];
    assert_eq!(compute(&s, &n, 3.0), vec![1, 2]);
    assert_eq!(compute(&s, &n, 0.0), vec![1]);
}

#[test]
fn test_stronger_neighbor_leads() {
    let s = serving(1, -80.0);
    let n = vec![neighbor(2, -75.0)];
    let set = candidates(&s, &n, DEFAULT_WINDOW);
    assert_eq!(set[0].source, CandidateSource::Neighbor);
    assert_eq!(set[1].source, CandidateSource::Serving);
}

#[test]
fn test_equal_levels_keep_collection_order() {
    let s = serving(1, -80.0);
    let n = vec![neighbor(5, -80.0), neighbor(3, -80.0), neighbor(4, -80.0)];
    assert_eq!(compute(&s, &n, DEFAULT_WINDOW), vec![1, 5, 3, 4]);
}

// ============================================
// Rank Resolution Tests
// ============================================

#[test]
fn test_resolve_rank_prefers_serving_on_shared_id() {
    let s = serving(1, -80.0);
    let n = vec![neighbor(1, -70.0)];
    assert_eq!(
        resolve_rank(&[1], &s, &n, 1),
        Some(ActiveRank { sc: 1, level: Some(-80.0) })
    );
}

#[test]
fn test_resolve_rank_out_of_range() {
    let s = serving(1, -80.0);
    assert_eq!(resolve_rank(&[1], &s, &[], 2), None);
    assert_eq!(resolve_rank(&[], &s, &[], 1), None);
}
