//! Spam classifier
//!
//! Ties the tokenizer, feature store and scoring engine together: train on
//! labeled text, classify unlabeled text.

use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::scoring::Scorer;
use crate::store::{DocTotals, FeatureStore};
use crate::tokenizer::extract_words;
use crate::types::*;

/// Trainable ham/spam classifier
#[derive(Debug)]
pub struct SpamClassifier {
    config: ClassifierConfig,
    store: Arc<FeatureStore>,
}

impl SpamClassifier {
    /// Create a classifier with its own empty store.
    ///
    /// `config` is trusted as given; an out-of-range prior or threshold gives
    /// meaningless scores. Use [`SpamClassifier::try_new`] for unchecked input.
    pub fn new(config: ClassifierConfig) -> Self {
        Self::with_store(config, Arc::new(FeatureStore::new()))
    }

    /// Create a classifier after validating `config`
    pub fn try_new(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Create a classifier over an existing, possibly shared, store
    pub fn with_store(config: ClassifierConfig, store: Arc<FeatureStore>) -> Self {
        Self { config, store }
    }

    /// Get current config
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Replace the config; trained data is kept. Invalid configs are rejected.
    pub fn set_config(&mut self, config: ClassifierConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn store(&self) -> &Arc<FeatureStore> {
        &self.store
    }

    /// Learn from one labeled document
    pub fn train(&self, text: &str, label: Label) -> Result<()> {
        let words = extract_words(text);
        self.store.record(&words, label)
    }

    /// Learn from one document whose label is given as text.
    ///
    /// An unknown label fails before the store is touched.
    pub fn train_as(&self, text: &str, label: &str) -> Result<()> {
        let label: Label = label.parse()?;
        self.train(text, label)
    }

    /// Learn from a spam message
    pub fn learn_spam(&self, text: &str) -> Result<()> {
        self.train(text, Label::Spam)
    }

    /// Learn from a ham (non-spam) message
    pub fn learn_ham(&self, text: &str) -> Result<()> {
        self.train(text, Label::Ham)
    }

    /// Score `text` and bucket the score.
    ///
    /// Unseen words are interned with zero counts and take no part in the score.
    pub fn classify(&self, text: &str) -> Result<Verdict> {
        let (words, score) = self
            .store
            .intern_and_read(extract_words(text), |features, totals| {
                (features.len(), self.scorer(totals).score(features))
            })?;
        let verdict = self.verdict(score);

        debug!(
            words = words,
            score = verdict.score,
            classification = %verdict.classification,
            "Classified message"
        );
        Ok(verdict)
    }

    /// Like [`SpamClassifier::classify`], also listing each trained word's
    /// probability, most decisive first
    pub fn explain(&self, text: &str) -> Result<Explanation> {
        let (score, mut words) =
            self.store
                .intern_and_read(extract_words(text), |features, totals| {
                    let scorer = self.scorer(totals);
                    (scorer.score(features), scorer.word_scores(features))
                })?;

        words.sort_by(|a, b| {
            let da = (a.probability - 0.5).abs();
            let db = (b.probability - 0.5).abs();
            db.partial_cmp(&da)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.word.cmp(&b.word))
        });

        Ok(Explanation {
            verdict: self.verdict(score),
            words,
        })
    }

    /// Bucket a score using the configured thresholds.
    ///
    /// Both bounds are inclusive: `max_ham_score` is ham, `min_spam_score` is spam.
    pub fn classification(&self, score: f64) -> Classification {
        if score <= self.config.max_ham_score {
            Classification::Ham
        } else if score >= self.config.min_spam_score {
            Classification::Spam
        } else {
            Classification::Unsure
        }
    }

    /// Forget everything learned so far
    pub fn clear_database(&self) {
        self.store.clear();
    }

    fn scorer(&self, totals: DocTotals) -> Scorer {
        Scorer::new(
            self.config.assumed_probability,
            self.config.prior_weight,
            totals,
        )
    }

    fn verdict(&self, score: f64) -> Verdict {
        Verdict {
            classification: self.classification(score),
            score,
        }
    }
}

impl Default for SpamClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpamError;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_text_is_neutral() {
        let classifier = SpamClassifier::default();
        let verdict = classifier.classify("").unwrap();
        assert_eq!(verdict.score, 0.5);
        assert_eq!(verdict.classification, Classification::Unsure);
    }

    #[test]
    fn test_single_strong_signal() {
        let classifier = SpamClassifier::default();
        classifier.train("lisp", Label::Spam).unwrap();

        let verdict = classifier.classify("lisp").unwrap();
        assert_relative_eq!(verdict.score, 0.75, epsilon = 1e-9);
        assert_eq!(verdict.classification, Classification::Spam);
    }

    #[test]
    fn test_threshold_boundaries() {
        let classifier = SpamClassifier::default();
        assert_eq!(classifier.classification(0.4), Classification::Ham);
        assert_eq!(classifier.classification(0.4000001), Classification::Unsure);
        assert_eq!(classifier.classification(0.6), Classification::Spam);
        assert_eq!(classifier.classification(0.5999999), Classification::Unsure);
        assert_eq!(classifier.classification(0.0), Classification::Ham);
        assert_eq!(classifier.classification(1.0), Classification::Spam);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = ClassifierConfig::default().with_thresholds(0.1, 0.9);
        let classifier = SpamClassifier::new(config);
        classifier.train("lisp", Label::Spam).unwrap();

        let verdict = classifier.classify("lisp").unwrap();
        assert_eq!(verdict.classification, Classification::Unsure);
    }

    #[test]
    fn test_train_as_invalid_label() {
        let classifier = SpamClassifier::default();
        let err = classifier.train_as("cheap pills", "junk").unwrap_err();
        assert!(matches!(err, SpamError::InvalidLabel(_)));

        let stats = classifier.store().stats();
        assert_eq!(stats.unique_words, 0);
        assert_eq!(stats.total_spam_docs + stats.total_ham_docs, 0);
    }

    #[test]
    fn test_train_as_valid_label() {
        let classifier = SpamClassifier::default();
        classifier.train_as("cheap pills", "spam").unwrap();
        classifier.train_as("team lunch", "Ham").unwrap();
        let stats = classifier.store().stats();
        assert_eq!(stats.total_spam_docs, 1);
        assert_eq!(stats.total_ham_docs, 1);
    }

    #[test]
    fn test_train_counts_word_once_per_document() {
        let classifier = SpamClassifier::default();
        classifier.train("win win win win win", Label::Spam).unwrap();
        let win = classifier.store().get("win").unwrap();
        assert_eq!(win.spam_count(), 1);
    }

    #[test]
    fn test_classify_interns_unseen_words() {
        let classifier = SpamClassifier::default();
        let verdict = classifier.classify("completely novel words").unwrap();
        assert_eq!(verdict.score, 0.5);

        let stats = classifier.store().stats();
        assert_eq!(stats.unique_words, 3);
        assert_eq!(stats.trained_words, 0);
    }

    #[test]
    fn test_explain_orders_by_decisiveness() {
        let classifier = SpamClassifier::default();
        for _ in 0..5 {
            classifier.learn_spam("viagra offer").unwrap();
            classifier.learn_ham("meeting notes offer").unwrap();
        }
        classifier.learn_spam("meeting").unwrap();
        classifier.learn_ham("notes").unwrap();

        let explanation = classifier.explain("viagra offer meeting unknown").unwrap();
        let words: Vec<&str> = explanation.words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, vec!["viagra", "meeting", "offer"]);
        assert!(explanation.words[0].probability > 0.9);
        assert_relative_eq!(explanation.words[2].probability, 0.5, epsilon = 1e-12);

        let verdict = classifier.classify("viagra offer meeting unknown").unwrap();
        assert_relative_eq!(explanation.verdict.score, verdict.score, epsilon = 1e-12);
    }

    #[test]
    fn test_shared_store() {
        let store = Arc::new(FeatureStore::new());
        let strict = SpamClassifier::with_store(
            ClassifierConfig::default().with_thresholds(0.1, 0.9),
            Arc::clone(&store),
        );
        let lenient = SpamClassifier::with_store(ClassifierConfig::default(), store);

        lenient.learn_spam("lisp").unwrap();
        assert_eq!(strict.classify("lisp").unwrap().classification, Classification::Unsure);
        assert_eq!(lenient.classify("lisp").unwrap().classification, Classification::Spam);
    }

    #[test]
    fn test_try_new_rejects_invalid_config() {
        let err = SpamClassifier::try_new(ClassifierConfig::default().with_prior(2.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, SpamError::Config(_)));

        assert!(SpamClassifier::try_new(ClassifierConfig::default().with_prior(0.5, -1.0)).is_err());
        assert!(SpamClassifier::try_new(ClassifierConfig::default()).is_ok());
    }

    #[test]
    fn test_set_config_rejects_invalid_config() {
        let mut classifier = SpamClassifier::default();
        let err = classifier
            .set_config(ClassifierConfig::default().with_thresholds(0.8, 0.2))
            .unwrap_err();
        assert!(matches!(err, SpamError::Config(_)));
        assert_eq!(*classifier.config(), ClassifierConfig::default());

        classifier
            .set_config(ClassifierConfig::default().with_thresholds(0.1, 0.9))
            .unwrap();
        assert_eq!(classifier.config().min_spam_score, 0.9);
    }

    #[test]
    fn test_clear_database() {
        let classifier = SpamClassifier::default();
        classifier.learn_spam("lisp").unwrap();
        classifier.clear_database();

        let verdict = classifier.classify("lisp").unwrap();
        assert_eq!(verdict.score, 0.5);
        assert_eq!(verdict.classification, Classification::Unsure);
    }
}
