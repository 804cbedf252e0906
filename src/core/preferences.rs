//! User importance levels and the two weight conventions derived from them.
//!
//! The weighted-sum scorer and the outranking concordance use
//! [`SumNormalizedWeights`]; threshold derivation uses
//! [`MaxRelativeImportance`]. The two are distinct types and never converted
//! into one another.

use serde::Serialize;
use thiserror::Error;

use crate::models::Criterion;

pub const MIN_IMPORTANCE: u8 = 1;
pub const MAX_IMPORTANCE: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreferenceError {
    #[error("importance {value} is outside 1..=5")]
    OutOfRange { value: u8 },

    #[error("importance {value} for {criterion} is outside 1..=5")]
    InvalidImportance { criterion: Criterion, value: u8 },

    #[error("no importance given for {0}")]
    MissingCriterion(Criterion),

    #[error("importance for {0} given more than once")]
    DuplicateCriterion(Criterion),
}

/// Importance of a criterion, from 1 (not important) to 5 (very important)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Importance(u8);

impl Importance {
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Importance {
    type Error = PreferenceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (MIN_IMPORTANCE..=MAX_IMPORTANCE).contains(&value) {
            Ok(Self(value))
        } else {
            Err(PreferenceError::OutOfRange { value })
        }
    }
}

/// One validated importance per criterion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreferenceProfile {
    importance: [Importance; Criterion::COUNT],
}

impl PreferenceProfile {
    /// Build a profile from `(criterion, importance)` pairs
    ///
    /// Every criterion must appear exactly once with a value in 1..=5.
    pub fn new<I>(entries: I) -> Result<Self, PreferenceError>
    where
        I: IntoIterator<Item = (Criterion, u8)>,
    {
        let mut slots: [Option<Importance>; Criterion::COUNT] = [None; Criterion::COUNT];

        for (criterion, value) in entries {
            let importance = Importance::try_from(value)
                .map_err(|_| PreferenceError::InvalidImportance { criterion, value })?;
            let slot = &mut slots[criterion.index()];
            if slot.is_some() {
                return Err(PreferenceError::DuplicateCriterion(criterion));
            }
            *slot = Some(importance);
        }

        let mut importance = [Importance(MIN_IMPORTANCE); Criterion::COUNT];
        for criterion in Criterion::ALL {
            importance[criterion.index()] =
                slots[criterion.index()].ok_or(PreferenceError::MissingCriterion(criterion))?;
        }

        Ok(Self { importance })
    }

    /// Same importance for every criterion
    pub fn uniform(importance: Importance) -> Self {
        Self {
            importance: [importance; Criterion::COUNT],
        }
    }

    pub fn importance(&self, criterion: Criterion) -> Importance {
        self.importance[criterion.index()]
    }

    /// `importance / Σ importance`, summing to 1
    pub fn sum_normalized(&self) -> SumNormalizedWeights {
        let total: f64 = self.importance.iter().map(|i| f64::from(i.get())).sum();
        let mut weights = [0.0; Criterion::COUNT];
        for criterion in Criterion::ALL {
            weights[criterion.index()] = f64::from(self.importance(criterion).get()) / total;
        }
        SumNormalizedWeights { weights }
    }

    /// Raw importances alongside their maximum, for threshold derivation
    pub fn max_relative(&self) -> MaxRelativeImportance {
        let max = self
            .importance
            .iter()
            .copied()
            .max()
            .unwrap_or(Importance(MAX_IMPORTANCE));
        MaxRelativeImportance {
            importance: self.importance,
            max,
        }
    }
}

/// Weights in [0, 1] that sum to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SumNormalizedWeights {
    weights: [f64; Criterion::COUNT],
}

impl SumNormalizedWeights {
    #[inline]
    pub fn get(&self, criterion: Criterion) -> f64 {
        self.weights[criterion.index()]
    }

    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// Unnormalized importances plus the largest of them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaxRelativeImportance {
    importance: [Importance; Criterion::COUNT],
    max: Importance,
}

impl MaxRelativeImportance {
    #[inline]
    pub fn get(&self, criterion: Criterion) -> f64 {
        f64::from(self.importance[criterion.index()].get())
    }

    #[inline]
    pub fn max(&self) -> f64 {
        f64::from(self.max.get())
    }
}
