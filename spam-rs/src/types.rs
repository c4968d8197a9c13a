//! Classifier types and data structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SpamError;

/// Training label for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Legitimate message
    Ham,
    /// Unwanted message
    Spam,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Ham => "ham",
            Label::Spam => "spam",
        }
    }

    /// The other label
    pub fn opposite(&self) -> Label {
        match self {
            Label::Ham => Label::Spam,
            Label::Spam => Label::Ham,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = SpamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ham" => Ok(Label::Ham),
            "spam" => Ok(Label::Spam),
            _ => Err(SpamError::InvalidLabel(s.to_string())),
        }
    }
}

/// Outcome bucket for a scored document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Score at or below the ham threshold
    Ham,
    /// Score at or above the spam threshold
    Spam,
    /// Score strictly between the two thresholds
    Unsure,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Classification::Ham => "ham",
            Classification::Spam => "spam",
            Classification::Unsure => "unsure",
        };
        f.write_str(name)
    }
}

/// Classification result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Bucket the score falls in
    pub classification: Classification,
    /// Spamminess in [0, 1]
    pub score: f64,
}

/// Smoothed spam probability of one word that took part in a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordScore {
    pub word: String,
    pub probability: f64,
}

/// A verdict together with the words behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub verdict: Verdict,
    /// Trained words only, most decisive first
    pub words: Vec<WordScore>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label() {
        assert_eq!("ham".parse::<Label>().unwrap(), Label::Ham);
        assert_eq!("SPAM".parse::<Label>().unwrap(), Label::Spam);
        assert_eq!(" Spam ".parse::<Label>().unwrap(), Label::Spam);
    }

    #[test]
    fn test_parse_invalid_label() {
        let err = "eggs".parse::<Label>().unwrap_err();
        assert!(matches!(err, SpamError::InvalidLabel(ref s) if s == "eggs"));
    }

    #[test]
    fn test_label_serde() {
        assert_eq!(serde_json::to_string(&Label::Spam).unwrap(), "\"spam\"");
        let label: Label = serde_json::from_str("\"ham\"").unwrap();
        assert_eq!(label, Label::Ham);
        assert_eq!(Label::Ham.opposite(), Label::Spam);
    }

    #[test]
    fn test_classification_display() {
        assert_eq!(Classification::Unsure.to_string(), "unsure");
        assert_eq!(Classification::Spam.to_string(), "spam");
    }
}
