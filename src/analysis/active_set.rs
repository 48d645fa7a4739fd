//! Active-set and neighbor ranking for measurement samples.
//!
//! The active set is the ordered list of cells close enough to the serving
//! level to be soft-handover candidates: the serving cell plus every
//! intra-frequency neighbor within a fixed window below it. Downstream
//! charting and export logic recomputes these values on its own, so the
//! ordering here must stay exactly reproducible:
//!
//! - candidates are collected serving first, then neighbors in list order
//! - the sort is stable, so equal levels keep collection order
//! - unparsed levels rank below every real level

use std::cmp::Ordering;

use crate::parsers::types::{ActiveRank, Neighbor, RankedNeighbor, ServingCell};

/// Default window below the serving level, in level units (dB)
pub const DEFAULT_WINDOW: f64 = 6.0;

/// Two channel numbers closer than this are the same frequency
pub const SAME_FREQUENCY_TOLERANCE: f64 = 1.0;

/// Number of neighbor and active-set rank slots exposed on a sample
pub const RANK_SLOTS: usize = 3;

/// Where an active-set candidate came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandidateSource {
    Serving,
    Neighbor,
}

/// An entry considered for the active set
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub sc: i64,
    pub level: f64,
    pub source: CandidateSource,
}

pub fn same_frequency(a: f64, b: f64) -> bool {
    (a - b).abs() < SAME_FREQUENCY_TOLERANCE
}

/// Descending comparison of optional levels, missing levels last
pub fn level_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    let key = |v: Option<f64>| v.filter(|l| !l.is_nan()).unwrap_or(f64::NEG_INFINITY);
    key(b).total_cmp(&key(a))
}

/// Stable sort of neighbors, strongest first
pub fn sort_neighbors(neighbors: &mut [Neighbor]) {
    neighbors.sort_by(|a, b| level_desc(a.level, b.level));
}

/// Collect the active-set candidates in level order
pub fn candidates(serving: &ServingCell, neighbors: &[Neighbor], window: f64) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = Vec::new();

    if let Some(sc) = serving.pci {
        if serving.level.is_finite() {
            candidates.push(Candidate {
                sc,
                level: serving.level,
                source: CandidateSource::Serving,
            });
        }
    }

    let floor = serving.level - window;
    for neighbor in neighbors {
        if !same_frequency(neighbor.frequency, serving.frequency) {
            continue;
        }
        let Some(level) = neighbor.level else {
            continue;
        };
        if level >= floor && !candidates.iter().any(|c| c.sc == neighbor.pci) {
            candidates.push(Candidate {
                sc: neighbor.pci,
                level,
                source: CandidateSource::Neighbor,
            });
        }
    }

    candidates.sort_by(|a, b| level_desc(Some(a.level), Some(b.level)));
    candidates
}

/// Ordered ids of the active set
pub fn compute(serving: &ServingCell, neighbors: &[Neighbor], window: f64) -> Vec<i64> {
    candidates(serving, neighbors, window)
        .into_iter()
        .map(|c| c.sc)
        .collect()
}

/// Resolve a 1-based active-set position back to a cell. The serving cell
/// wins if its id matches, otherwise the first neighbor with that id. A
/// position past the end of the set resolves to `None`.
pub fn resolve_rank(
    active_set: &[i64],
    serving: &ServingCell,
    neighbors: &[Neighbor],
    rank: usize,
) -> Option<ActiveRank> {
    let sc = *active_set.get(rank.checked_sub(1)?)?;
    let level = if serving.pci == Some(sc) {
        Some(serving.level)
    } else {
        neighbors.iter().find(|n| n.pci == sc).and_then(|n| n.level)
    };
    Some(ActiveRank { sc, level })
}

/// Top neighbors exposed as n1/n2/n3. Expects `neighbors` already sorted.
pub fn ranked_neighbors(neighbors: &[Neighbor]) -> [Option<RankedNeighbor>; RANK_SLOTS] {
    std::array::from_fn(|i| {
        neighbors.get(i).map(|n| RankedNeighbor {
            sc: n.pci,
            level: n.level,
            quality: n.quality,
        })
    })
}
