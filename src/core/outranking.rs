//! ELECTRE-style outranking over a candidate set.
//!
//! The engine compares every ordered pair of candidates `(i, j)` on each
//! criterion and builds three `n x n` matrices:
//!
//! - **concordance** `C[i][j]`: weighted share of criteria supporting
//!   "i is at least as good as j", with a linear band between the
//!   indifference and preference thresholds;
//! - **discordance** `D[i][j]`: 1 as soon as a single criterion opposes the
//!   claim by more than its veto threshold, 0 otherwise;
//! - **credibility** `S[i][j] = C[i][j] * (1 - D[i][j])`, with `S[i][i] = 1`.
//!
//! The *core* is the set of candidates no other candidate outranks with
//! credibility at or above the cut level `s`. Among the remaining candidates,
//! the *dominant* set holds those outranking every other excluded candidate.
//!
//! Every criterion is compared as a gain: cost criteria (distance) enter the
//! performance table negated so that closer places count as better.

use serde::{Deserialize, Serialize};

use crate::core::preferences::{PreferenceProfile, SumNormalizedWeights};
use crate::core::thresholds::{
    derive_thresholds, CriterionMaxima, ThresholdMap, Thresholds, DEFAULT_K_INDIFFERENCE,
    DEFAULT_K_PREFERENCE,
};
use crate::models::{Candidate, Criterion, GeoPoint, Orientation};

/// Default credibility cut level
pub const DEFAULT_CREDIBILITY_THRESHOLD: f64 = 0.90;

/// Tunable parameters of the outranking analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutrankingParams {
    pub k_indifference: f64,
    pub k_preference: f64,
    pub credibility_threshold: f64,
    pub criterion_maxima: CriterionMaxima,
}

impl Default for OutrankingParams {
    fn default() -> Self {
        Self {
            k_indifference: DEFAULT_K_INDIFFERENCE,
            k_preference: DEFAULT_K_PREFERENCE,
            credibility_threshold: DEFAULT_CREDIBILITY_THRESHOLD,
            criterion_maxima: CriterionMaxima::default(),
        }
    }
}

/// Square matrix indexed by candidate position
///
/// Built once from a cell function and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl PairwiseMatrix {
    fn from_fn<F>(size: usize, mut cell: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut cells = Vec::with_capacity(size * size);
        for i in 0..size {
            for j in 0..size {
                cells.push(cell(i, j));
            }
        }
        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.size + j]
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.size)
            .map(|i| self.cells[i * self.size..(i + 1) * self.size].to_vec())
            .collect()
    }
}

/// Oriented criterion values, one row per candidate
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceTable {
    rows: Vec<[f64; Criterion::COUNT]>,
}

impl PerformanceTable {
    pub fn from_candidates(candidates: &[Candidate], user: GeoPoint) -> Self {
        let rows = candidates
            .iter()
            .map(|candidate| {
                let mut row = [0.0; Criterion::COUNT];
                for criterion in Criterion::ALL {
                    let raw = candidate.criterion_value(criterion, user);
                    row[criterion.index()] = match criterion.orientation() {
                        Orientation::Gain => raw,
                        Orientation::Cost => -raw,
                    };
                }
                row
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn value(&self, candidate: usize, criterion: Criterion) -> f64 {
        self.rows[candidate][criterion.index()]
    }
}

/// Support of one criterion for "i is at least as good as j"
///
/// `diff` is `value(i) - value(j)`. Full support within the indifference
/// threshold, none beyond the preference threshold, linear in between. The
/// interpolation branch is only reachable when `p > q`.
#[inline]
pub fn partial_concordance(diff: f64, thresholds: &Thresholds) -> f64 {
    let q = thresholds.indifference;
    let p = thresholds.preference;
    if diff >= -q {
        1.0
    } else if diff <= -p {
        0.0
    } else {
        (p + diff) / (p - q)
    }
}

/// Opposition of one criterion to "i is at least as good as j"
///
/// `diff` is `value(j) - value(i)`. Binary: any excess over the veto
/// threshold is a full veto.
#[inline]
pub fn partial_discordance(diff: f64, thresholds: &Thresholds) -> f64 {
    if diff <= thresholds.veto {
        0.0
    } else {
        1.0
    }
}

pub fn concordance_matrix(
    table: &PerformanceTable,
    weights: &SumNormalizedWeights,
    thresholds: &ThresholdMap,
) -> PairwiseMatrix {
    PairwiseMatrix::from_fn(table.len(), |i, j| {
        if i == j {
            return 1.0;
        }
        thresholds
            .iter()
            .map(|(criterion, t)| {
                let diff = table.value(i, criterion) - table.value(j, criterion);
                weights.get(criterion) * partial_concordance(diff, t)
            })
            .sum::<f64>()
            // Weights can sum to 1 + ε in floating point
            .min(1.0)
    })
}

pub fn discordance_matrix(table: &PerformanceTable, thresholds: &ThresholdMap) -> PairwiseMatrix {
    PairwiseMatrix::from_fn(table.len(), |i, j| {
        if i == j {
            return 0.0;
        }
        thresholds
            .iter()
            .map(|(criterion, t)| {
                let diff = table.value(j, criterion) - table.value(i, criterion);
                partial_discordance(diff, t)
            })
            .fold(0.0, f64::max)
    })
}

pub fn credibility_matrix(
    concordance: &PairwiseMatrix,
    discordance: &PairwiseMatrix,
) -> PairwiseMatrix {
    PairwiseMatrix::from_fn(concordance.size(), |i, j| {
        if i == j {
            1.0
        } else {
            concordance.get(i, j) * (1.0 - discordance.get(i, j))
        }
    })
}

/// Indices of candidates no other candidate outranks at level `threshold`
pub fn find_core(credibility: &PairwiseMatrix, threshold: f64) -> Vec<usize> {
    let n = credibility.size();
    (0..n)
        .filter(|&i| !(0..n).any(|j| j != i && credibility.get(j, i) >= threshold))
        .collect()
}

/// Non-core candidates that outrank every other non-core candidate
pub fn find_dominant(credibility: &PairwiseMatrix, core: &[usize], threshold: f64) -> Vec<usize> {
    let n = credibility.size();
    let excluded: Vec<usize> = (0..n).filter(|i| !core.contains(i)).collect();

    excluded
        .iter()
        .copied()
        .filter(|&i| {
            excluded
                .iter()
                .all(|&j| j == i || credibility.get(i, j) >= threshold)
        })
        .collect()
}

/// Matrices and extracted sets of one analysis run
#[derive(Debug, Clone)]
pub struct OutrankingAnalysis {
    pub concordance: PairwiseMatrix,
    pub discordance: PairwiseMatrix,
    pub credibility: PairwiseMatrix,
    pub core: Vec<usize>,
    pub dominant: Vec<usize>,
}

/// Outranking engine configured for one preference profile
#[derive(Debug, Clone)]
pub struct OutrankingEngine {
    weights: SumNormalizedWeights,
    thresholds: ThresholdMap,
    credibility_threshold: f64,
}

impl OutrankingEngine {
    pub fn new(profile: &PreferenceProfile, params: &OutrankingParams) -> Self {
        let thresholds = derive_thresholds(
            &profile.max_relative(),
            params.k_indifference,
            params.k_preference,
            &params.criterion_maxima,
        );
        Self {
            weights: profile.sum_normalized(),
            thresholds,
            credibility_threshold: params.credibility_threshold,
        }
    }

    pub fn thresholds(&self) -> &ThresholdMap {
        &self.thresholds
    }

    pub fn credibility_threshold(&self) -> f64 {
        self.credibility_threshold
    }

    /// Run the full analysis, O(n² · criteria)
    pub fn analyze(&self, candidates: &[Candidate], user: GeoPoint) -> OutrankingAnalysis {
        let table = PerformanceTable::from_candidates(candidates, user);

        let concordance = concordance_matrix(&table, &self.weights, &self.thresholds);
        let discordance = discordance_matrix(&table, &self.thresholds);
        let credibility = credibility_matrix(&concordance, &discordance);

        let core = find_core(&credibility, self.credibility_threshold);
        let dominant = find_dominant(&credibility, &core, self.credibility_threshold);

        tracing::debug!(
            "Outranking over {} candidates: core={}, dominant={}",
            table.len(),
            core.len(),
            dominant.len()
        );

        OutrankingAnalysis {
            concordance,
            discordance,
            credibility,
            core,
            dominant,
        }
    }
}
