//! Feedback pattern sets
//!
//! A [`FeedbackPatternSet`] maps each [`ScenarioKey`] to its message
//! variants. A set handed to callers must be complete: all eleven keys with
//! exactly [`VARIANTS_PER_KEY`] non-empty messages each. Sets read back from
//! storage are not trusted to be complete, so completeness is a checked
//! property rather than a construction guarantee.

use crate::error::PatternSetError;
use crate::scenario::ScenarioKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Message variants required per scenario
pub const VARIANTS_PER_KEY: usize = 3;

/// Untrusted generator output: scenario wire name → messages
pub type RawPatterns = BTreeMap<String, Vec<String>>;

/// Message variants for every scenario
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackPatternSet {
    entries: BTreeMap<ScenarioKey, Vec<String>>,
}

impl FeedbackPatternSet {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a complete set from generator output
    ///
    /// Variants are trimmed; extra variants beyond [`VARIANTS_PER_KEY`] are
    /// dropped and keys outside the catalog are ignored.
    ///
    /// # Errors
    /// Returns the first coverage violation in catalog order.
    pub fn from_raw(raw: &RawPatterns) -> Result<Self, PatternSetError> {
        let mut entries = BTreeMap::new();

        for key in ScenarioKey::ALL {
            let variants = raw
                .get(key.as_str())
                .ok_or(PatternSetError::MissingKey(key))?;

            if variants.len() < VARIANTS_PER_KEY {
                return Err(PatternSetError::WrongVariantCount {
                    key,
                    expected: VARIANTS_PER_KEY,
                    actual: variants.len(),
                });
            }

            let trimmed = variants
                .iter()
                .take(VARIANTS_PER_KEY)
                .enumerate()
                .map(|(index, message)| {
                    let message = message.trim();
                    if message.is_empty() {
                        Err(PatternSetError::EmptyVariant { key, index })
                    } else {
                        Ok(message.to_string())
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;

            entries.insert(key, trimmed);
        }

        Ok(Self { entries })
    }

    /// Set variants for a scenario, returning the previous ones
    pub fn insert<I, S>(&mut self, key: ScenarioKey, variants: I) -> Option<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .insert(key, variants.into_iter().map(Into::into).collect())
    }

    /// Builder form of [`insert`](Self::insert)
    #[must_use]
    pub fn with<I, S>(mut self, key: ScenarioKey, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(key, variants);
        self
    }

    /// Variants for a scenario
    #[inline]
    #[must_use]
    pub fn get(&self, key: ScenarioKey) -> Option<&[String]> {
        self.entries.get(&key).map(Vec::as_slice)
    }

    /// Single variant for a scenario
    #[inline]
    #[must_use]
    pub fn variant(&self, key: ScenarioKey, index: usize) -> Option<&str> {
        self.get(key)
            .and_then(|variants| variants.get(index))
            .map(String::as_str)
    }

    /// Check the completeness invariant
    ///
    /// # Errors
    /// Returns the first violation in catalog order.
    pub fn validate(&self) -> Result<(), PatternSetError> {
        for key in ScenarioKey::ALL {
            let variants = self.get(key).ok_or(PatternSetError::MissingKey(key))?;
            if variants.len() != VARIANTS_PER_KEY {
                return Err(PatternSetError::WrongVariantCount {
                    key,
                    expected: VARIANTS_PER_KEY,
                    actual: variants.len(),
                });
            }
            if let Some(index) = variants.iter().position(|m| m.trim().is_empty()) {
                return Err(PatternSetError::EmptyVariant { key, index });
            }
        }
        Ok(())
    }

    /// Whether every scenario has its full set of variants
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    /// Number of scenarios present
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no scenario is present
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate scenarios in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (ScenarioKey, &[String])> {
        self.entries.iter().map(|(k, v)| (*k, v.as_slice()))
    }
}
