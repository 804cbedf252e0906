use serde::{Deserialize, Serialize};

use crate::core::preferences::MaxRelativeImportance;
use crate::models::Criterion;

pub const DEFAULT_K_INDIFFERENCE: f64 = 0.05;
pub const DEFAULT_K_PREFERENCE: f64 = 0.3;

/// Indifference (q), preference (p) and veto (v) thresholds of one criterion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub indifference: f64,
    pub preference: f64,
    pub veto: f64,
}

/// Largest meaningful value of each criterion, scaling the veto threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriterionMaxima {
    values: [f64; Criterion::COUNT],
}

impl CriterionMaxima {
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Criterion, f64)>,
    {
        let mut maxima = Self::default();
        for (criterion, value) in entries {
            maxima.values[criterion.index()] = value;
        }
        maxima
    }

    #[inline]
    pub fn get(&self, criterion: Criterion) -> f64 {
        self.values[criterion.index()]
    }
}

impl Default for CriterionMaxima {
    /// Rating out of 5, price tier out of 4, distance capped at 10 km, flags at 1
    fn default() -> Self {
        let mut values = [1.0; Criterion::COUNT];
        values[Criterion::Rating.index()] = 5.0;
        values[Criterion::Price.index()] = 4.0;
        values[Criterion::Distance.index()] = 10.0;
        Self { values }
    }
}

/// Thresholds for every criterion
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdMap {
    thresholds: [Thresholds; Criterion::COUNT],
}

impl ThresholdMap {
    #[inline]
    pub fn get(&self, criterion: Criterion) -> &Thresholds {
        &self.thresholds[criterion.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Criterion, &Thresholds)> {
        Criterion::ALL.into_iter().zip(self.thresholds.iter())
    }
}

/// Derive q/p/v for each criterion from its importance `i`
///
/// ```text
/// q = (1 / i) * k_indifference
/// p = (i / max_importance) * k_preference
/// v = (1 - i / max_importance) * criterion_max
/// ```
///
/// The most important criteria get `v = 0`: any disadvantage vetoes.
pub fn derive_thresholds(
    importance: &MaxRelativeImportance,
    k_indifference: f64,
    k_preference: f64,
    maxima: &CriterionMaxima,
) -> ThresholdMap {
    let max_importance = importance.max();
    let mut thresholds = [Thresholds {
        indifference: 0.0,
        preference: 0.0,
        veto: 0.0,
    }; Criterion::COUNT];

    for criterion in Criterion::ALL {
        let i = importance.get(criterion);
        let relative = i / max_importance;
        let derived = Thresholds {
            indifference: (1.0 / i) * k_indifference,
            preference: relative * k_preference,
            veto: (1.0 - relative) * maxima.get(criterion),
        };

        if derived.preference <= derived.indifference {
            tracing::warn!(
                "Degenerate thresholds for {}: p={} <= q={}",
                criterion,
                derived.preference,
                derived.indifference
            );
        }

        thresholds[criterion.index()] = derived;
    }

    ThresholdMap { thresholds }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::preferences::PreferenceProfile;

    fn importance(values: [u8; Criterion::COUNT]) -> MaxRelativeImportance {
        PreferenceProfile::new(Criterion::ALL.into_iter().zip(values))
            .unwrap()
            .max_relative()
    }

    #[test]
    fn test_most_important_criterion_has_zero_veto() {
        let map = derive_thresholds(
            &importance([5, 3, 2, 1, 1, 1, 1, 1]),
            DEFAULT_K_INDIFFERENCE,
            DEFAULT_K_PREFERENCE,
            &CriterionMaxima::default(),
        );

        let rating = map.get(Criterion::Rating);
        assert_eq!(rating.veto, 0.0);
        assert_eq!(rating.preference, DEFAULT_K_PREFERENCE);
        assert!((rating.indifference - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_formulas() {
        let map = derive_thresholds(
            &importance([4, 2, 1, 1, 1, 1, 1, 1]),
            0.05,
            0.3,
            &CriterionMaxima::default(),
        );

        let price = map.get(Criterion::Price);
        assert!((price.indifference - 0.025).abs() < 1e-12);
        assert!((price.preference - 0.15).abs() < 1e-12);
        assert!((price.veto - 2.0).abs() < 1e-12);

        let distance = map.get(Criterion::Distance);
        assert!((distance.veto - 7.5).abs() < 1e-12);
    }

    #[test]
    fn test_default_parameters_keep_p_above_q() {
        for values in [[1; 8], [5, 1, 1, 1, 1, 1, 1, 1], [1, 2, 3, 4, 5, 4, 3, 2]] {
            let map = derive_thresholds(
                &importance(values),
                DEFAULT_K_INDIFFERENCE,
                DEFAULT_K_PREFERENCE,
                &CriterionMaxima::default(),
            );
            for (criterion, t) in map.iter() {
                assert!(t.preference > t.indifference, "{} has p <= q", criterion);
            }
        }
    }

    #[test]
    fn test_criterion_maxima_overrides() {
        let maxima = CriterionMaxima::new([(Criterion::Distance, 3.0)]);
        assert_eq!(maxima.get(Criterion::Distance), 3.0);
        assert_eq!(maxima.get(Criterion::Rating), 5.0);
    }
}
