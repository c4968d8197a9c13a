//! Scoring engine
//!
//! Each trained word gets a spam probability from its relative frequency in
//! spam and ham, smoothed toward a prior. The per-word probabilities are then
//! combined with Fisher's method (Robinson's variant) into one score in
//! [0, 1]: near 0 for ham, near 1 for spam, 0.5 when there is no evidence.
//!
//! All arithmetic is `f64`, so scores are approximate.

use std::sync::Arc;

use crate::store::{DocTotals, WordFeature};
use crate::types::WordScore;

/// Raw spam likelihood of a word from its per-label document frequencies.
///
/// Must not be called for an untrained feature; see [`is_untrained`].
pub fn spam_probability(feature: &WordFeature, totals: DocTotals) -> f64 {
    debug_assert!(
        !is_untrained(feature),
        "spam probability of untrained word {:?}",
        feature.word()
    );

    let spam_freq = f64::from(feature.spam_count()) / f64::from(totals.spam.max(1));
    let ham_freq = f64::from(feature.ham_count()) / f64::from(totals.ham.max(1));
    spam_freq / (spam_freq + ham_freq)
}

/// [`spam_probability`] pulled toward `assumed_probability`.
///
/// `weight` is how many observations the prior is worth. A word seen in only
/// a handful of documents stays close to the prior.
pub fn bayesian_spam_probability(
    feature: &WordFeature,
    totals: DocTotals,
    assumed_probability: f64,
    weight: f64,
) -> f64 {
    let basic = spam_probability(feature, totals);
    let data_points = f64::from(feature.spam_count()) + f64::from(feature.ham_count());
    (weight * assumed_probability + data_points * basic) / (weight + data_points)
}

/// Both counts are zero: the word carries no signal
pub fn is_untrained(feature: &WordFeature) -> bool {
    feature.is_untrained()
}

/// Fisher's combined probability of `probs`.
///
/// Chi-square survival of `-2 * sum(ln p)` with `2 * probs.len()` degrees of
/// freedom. An empty slice gives 0.
pub fn fisher(probs: &[f64]) -> f64 {
    let log_sum: f64 = probs.iter().map(|p| p.ln()).sum();
    inverse_chi_square(-2.0 * log_sum, 2 * probs.len())
}

/// Survival function of the chi-square distribution for even degrees of
/// freedom, capped at 1.
///
/// # Panics
///
/// If `degrees_of_freedom` is odd.
pub fn inverse_chi_square(value: f64, degrees_of_freedom: usize) -> f64 {
    assert!(
        degrees_of_freedom % 2 == 0,
        "inverse chi-square needs even degrees of freedom, got {}",
        degrees_of_freedom
    );

    let m = value / 2.0;
    if m.is_infinite() {
        return 0.0;
    }

    let mut term = (-m).exp();
    let mut sum = 0.0;
    for i in 0..degrees_of_freedom / 2 {
        if i > 0 {
            term *= m / i as f64;
        }
        sum += term;
    }
    sum.min(1.0)
}

/// Combine per-word spam probabilities into a document score.
///
/// Runs Fisher's method once on the spam probabilities and once on their
/// complements, then averages the two one-sided results.
pub fn combine(spam_probs: &[f64]) -> f64 {
    let ham_probs: Vec<f64> = spam_probs.iter().map(|p| 1.0 - p).collect();
    let h = 1.0 - fisher(spam_probs);
    let s = 1.0 - fisher(&ham_probs);
    ((1.0 - h) + s) / 2.0
}

/// Scoring parameters and the document totals they apply to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scorer {
    pub assumed_probability: f64,
    pub prior_weight: f64,
    pub totals: DocTotals,
}

impl Scorer {
    pub fn new(assumed_probability: f64, prior_weight: f64, totals: DocTotals) -> Self {
        Self {
            assumed_probability,
            prior_weight,
            totals,
        }
    }

    /// Smoothed spam probability of one trained word
    pub fn word_probability(&self, feature: &WordFeature) -> f64 {
        bayesian_spam_probability(
            feature,
            self.totals,
            self.assumed_probability,
            self.prior_weight,
        )
    }

    /// Probabilities of the trained words in `features`; untrained ones are skipped
    pub fn word_scores(&self, features: &[Arc<WordFeature>]) -> Vec<WordScore> {
        features
            .iter()
            .filter(|f| !is_untrained(f))
            .map(|f| WordScore {
                word: f.word().to_string(),
                probability: self.word_probability(f),
            })
            .collect()
    }

    /// Document score in [0, 1]
    pub fn score(&self, features: &[Arc<WordFeature>]) -> f64 {
        let spam_probs: Vec<f64> = features
            .iter()
            .filter(|f| !is_untrained(f))
            .map(|f| self.word_probability(f))
            .collect();
        combine(&spam_probs)
    }
}
