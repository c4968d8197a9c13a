//! spam-rs: Trainable Bayesian spam filter
//!
//! Learns word statistics from labeled text and scores new text with
//! Robinson's Fisher-method combination of per-word spam probabilities.
//!
//! # Features
//!
//! - Word extraction: runs of three or more ASCII letters, case-sensitive
//! - Shared, thread-safe feature store with snapshot/restore for persistence
//! - Bayesian-smoothed per-word probabilities
//! - Three-way verdict (`ham`, `spam`, `unsure`) with the numeric score
//!
//! # Example
//!
//! ```
//! use spam_rs::{Classification, ClassifierConfig, Label, SpamClassifier};
//!
//! let classifier = SpamClassifier::new(ClassifierConfig::default());
//! classifier.train("cheap pills online", Label::Spam)?;
//! classifier.train("lunch meeting notes", Label::Ham)?;
//!
//! let verdict = classifier.classify("cheap pills")?;
//! assert_eq!(verdict.classification, Classification::Spam);
//! # Ok::<(), spam_rs::SpamError>(())
//! ```
//!
//! # Modules
//!
//! - [`tokenizer`]: Word extraction
//! - [`store`]: Word feature store
//! - [`scoring`]: Probability combination
//! - [`classifier`]: Training and classification
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling

pub mod classifier;
pub mod config;
pub mod error;
pub mod scoring;
pub mod store;
pub mod tokenizer;
pub mod types;

// Re-export commonly used types
pub use classifier::SpamClassifier;
pub use config::ClassifierConfig;
pub use error::{Result, SpamError};
pub use store::{FeatureStore, StoreSnapshot, WordFeature};
pub use types::*;
