//! Word feature store
//!
//! Maps every word seen by the classifier to a shared [`WordFeature`] record
//! and keeps the number of documents trained under each label.

use parking_lot::{RwLock, RwLockWriteGuard};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{Result, SpamError};
use crate::types::Label;

/// Accumulated ham/spam counts for one word
#[derive(Debug)]
pub struct WordFeature {
    word: String,
    spam_count: AtomicU32,
    ham_count: AtomicU32,
}

impl WordFeature {
    /// Create a record with zero counts. The word is required.
    pub fn new(word: impl Into<String>) -> Result<Self> {
        Self::with_counts(word, 0, 0)
    }

    fn with_counts(word: impl Into<String>, ham_count: u32, spam_count: u32) -> Result<Self> {
        let word = word.into();
        if word.is_empty() {
            return Err(SpamError::MissingField("word"));
        }
        Ok(WordFeature {
            word,
            spam_count: AtomicU32::new(spam_count),
            ham_count: AtomicU32::new(ham_count),
        })
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    /// Number of spam documents containing this word
    pub fn spam_count(&self) -> u32 {
        self.spam_count.load(Ordering::Relaxed)
    }

    /// Number of ham documents containing this word
    pub fn ham_count(&self) -> u32 {
        self.ham_count.load(Ordering::Relaxed)
    }

    pub fn count(&self, label: Label) -> u32 {
        match label {
            Label::Ham => self.ham_count(),
            Label::Spam => self.spam_count(),
        }
    }

    /// Never observed in any training document
    pub fn is_untrained(&self) -> bool {
        self.spam_count() == 0 && self.ham_count() == 0
    }

    fn increment(&self, label: Label) {
        let counter = match label {
            Label::Ham => &self.ham_count,
            Label::Spam => &self.spam_count,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl fmt::Display for WordFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: ham={}, spam={}",
            self.word,
            self.ham_count(),
            self.spam_count()
        )
    }
}

/// Number of documents trained under each label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocTotals {
    pub spam: u32,
    pub ham: u32,
}

/// Store statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub total_spam_docs: u32,
    pub total_ham_docs: u32,
    /// Interned words, including ones never trained
    pub unique_words: usize,
    /// Words with at least one ham or spam observation
    pub trained_words: usize,
}

/// Serializable form of one word record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub word: String,
    pub ham_count: u32,
    pub spam_count: u32,
}

/// Full store state, for callers that persist the model themselves
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub total_spam_docs: u32,
    pub total_ham_docs: u32,
    /// Sorted by word
    pub features: Vec<FeatureRecord>,
}

impl StoreSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the snapshot as JSON to `path`
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read a JSON snapshot from `path`
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

#[derive(Default)]
struct Inner {
    features: HashMap<String, Arc<WordFeature>>,
    totals: DocTotals,
}

impl Inner {
    fn intern(&mut self, word: &str) -> Result<Arc<WordFeature>> {
        if let Some(feature) = self.features.get(word) {
            return Ok(Arc::clone(feature));
        }
        let feature = Arc::new(WordFeature::new(word)?);
        self.features.insert(word.to_string(), Arc::clone(&feature));
        Ok(feature)
    }
}

/// Shared registry of word features and document totals.
///
/// Records handed out by [`FeatureStore::intern`] are the same objects later
/// training mutates. All mutation of one training call happens under a single
/// write lock, so readers never see half of it.
#[derive(Default)]
pub struct FeatureStore {
    inner: RwLock<Inner>,
}

impl FeatureStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the record for `word`, creating a zero-count one if needed
    pub fn intern(&self, word: &str) -> Result<Arc<WordFeature>> {
        self.inner.write().intern(word)
    }

    /// Intern every word under one lock
    pub fn intern_all<I, S>(&self, words: I) -> Result<Vec<Arc<WordFeature>>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut inner = self.inner.write();
        words
            .into_iter()
            .map(|word| inner.intern(word.as_ref()))
            .collect()
    }

    /// Look up a word without interning it
    pub fn get(&self, word: &str) -> Option<Arc<WordFeature>> {
        self.inner.read().features.get(word).cloned()
    }

    /// Count one document under `label`.
    ///
    /// Every distinct word's count for `label` goes up by one and so does the
    /// label's document total, even when `words` is empty. Nothing changes on
    /// error, including when a count is already at `u32::MAX`.
    pub fn record<I, S>(&self, words: I, label: Label) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<S> = words.into_iter().collect();
        let mut unique: Vec<&str> = words.iter().map(|w| w.as_ref()).collect();
        unique.sort_unstable();
        unique.dedup();
        if unique.iter().any(|w| w.is_empty()) {
            return Err(SpamError::MissingField("word"));
        }

        let mut inner = self.inner.write();
        let total = match label {
            Label::Ham => inner.totals.ham,
            Label::Spam => inner.totals.spam,
        };
        let total = total
            .checked_add(1)
            .ok_or_else(|| SpamError::CountOverflow(format!("{} document total", label)))?;
        if let Some(word) = unique.iter().find(|w| {
            inner
                .features
                .get(**w)
                .is_some_and(|f| f.count(label) == u32::MAX)
        }) {
            return Err(SpamError::CountOverflow(format!(
                "{} count of {:?}",
                label, word
            )));
        }

        // Counters only change under the write lock, so the checks above hold
        for word in &unique {
            inner.intern(word)?.increment(label);
        }
        match label {
            Label::Ham => inner.totals.ham = total,
            Label::Spam => inner.totals.spam = total,
        }

        debug!(label = %label, words = unique.len(), "Recorded training document");
        Ok(())
    }

    /// Intern `words`, then run `f` on the records and the totals.
    ///
    /// No writer gets in between interning and `f`, so the counts `f` reads
    /// always belong to the store state the totals come from.
    pub fn intern_and_read<I, S, R>(
        &self,
        words: I,
        f: impl FnOnce(&[Arc<WordFeature>], DocTotals) -> R,
    ) -> Result<R>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut inner = self.inner.write();
        let features = words
            .into_iter()
            .map(|word| inner.intern(word.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let inner = RwLockWriteGuard::downgrade(inner);
        Ok(f(&features, inner.totals))
    }

    /// Current document totals
    pub fn totals(&self) -> DocTotals {
        self.inner.read().totals
    }

    /// Every record currently in the store, in no particular order
    pub fn features(&self) -> Vec<Arc<WordFeature>> {
        self.inner.read().features.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().features.is_empty()
    }

    pub fn stats(&self) -> StoreStats {
        let inner = self.inner.read();
        StoreStats {
            total_spam_docs: inner.totals.spam,
            total_ham_docs: inner.totals.ham,
            unique_words: inner.features.len(),
            trained_words: inner
                .features
                .values()
                .filter(|f| !f.is_untrained())
                .count(),
        }
    }

    /// Drop every record and reset both totals
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.features.clear();
        inner.totals = DocTotals::default();
        info!("Feature store cleared");
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let inner = self.inner.read();
        let mut features: Vec<FeatureRecord> = inner
            .features
            .values()
            .map(|f| FeatureRecord {
                word: f.word.clone(),
                ham_count: f.ham_count(),
                spam_count: f.spam_count(),
            })
            .collect();
        features.sort_by(|a, b| a.word.cmp(&b.word));

        StoreSnapshot {
            total_spam_docs: inner.totals.spam,
            total_ham_docs: inner.totals.ham,
            features,
        }
    }

    /// Replace the whole store with `snapshot`.
    ///
    /// Records held by callers from before the restore are detached from the
    /// store. Nothing changes if the snapshot holds an empty or repeated word.
    pub fn restore(&self, snapshot: StoreSnapshot) -> Result<()> {
        let mut features = HashMap::with_capacity(snapshot.features.len());
        for record in snapshot.features {
            if features.contains_key(&record.word) {
                return Err(SpamError::DuplicateWord(record.word));
            }
            let feature =
                WordFeature::with_counts(record.word.clone(), record.ham_count, record.spam_count)?;
            features.insert(record.word, Arc::new(feature));
        }

        let mut inner = self.inner.write();
        inner.features = features;
        inner.totals = DocTotals {
            spam: snapshot.total_spam_docs,
            ham: snapshot.total_ham_docs,
        };
        info!(
            words = inner.features.len(),
            spam_docs = inner.totals.spam,
            ham_docs = inner.totals.ham,
            "Feature store restored"
        );
        Ok(())
    }
}

impl fmt::Debug for FeatureStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        f.debug_struct("FeatureStore")
            .field("unique_words", &stats.unique_words)
            .field("total_spam_docs", &stats.total_spam_docs)
            .field("total_ham_docs", &stats.total_ham_docs)
            .finish()
    }
}
