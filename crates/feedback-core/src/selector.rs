//! Display-time message selection

use crate::fallback::neutral_message;
use feedback_scenario::{
    BlockPerformance, FeedbackPatternSet, Language, ScenarioClassifier, ScenarioKey,
};

/// Picks the message to show for the current block
///
/// Variants rotate with the block number, so the same scenario seen on
/// consecutive blocks does not repeat the same sentence.
#[derive(Debug, Clone, Copy)]
pub struct FeedbackSelector {
    classifier: ScenarioClassifier,
    neutral: &'static str,
}

impl FeedbackSelector {
    /// Create selector using a classifier
    #[inline]
    #[must_use]
    pub fn new(classifier: ScenarioClassifier) -> Self {
        Self {
            classifier,
            neutral: neutral_message(Language::default()),
        }
    }

    /// With the neutral message used when the set lacks the scenario
    #[inline]
    #[must_use]
    pub fn with_neutral_message(mut self, message: &'static str) -> Self {
        self.neutral = message;
        self
    }

    /// With the neutral message of a language
    #[inline]
    #[must_use]
    pub fn with_language(self, language: Language) -> Self {
        self.with_neutral_message(neutral_message(language))
    }

    /// Message for the current block
    #[must_use]
    pub fn select(
        &self,
        current: &BlockPerformance,
        previous: Option<&BlockPerformance>,
        patterns: &FeedbackPatternSet,
    ) -> String {
        self.select_for(current, previous, patterns).1
    }

    /// Scenario and message for the current block
    #[must_use]
    pub fn select_for(
        &self,
        current: &BlockPerformance,
        previous: Option<&BlockPerformance>,
        patterns: &FeedbackPatternSet,
    ) -> (ScenarioKey, String) {
        let key = self.classifier.classify(current, previous);
        let index = variant_index(current.block_number());

        let message = patterns
            .get(key)
            .filter(|variants| !variants.is_empty())
            .map(|variants| variants[index % variants.len()].as_str())
            .filter(|message| !message.trim().is_empty());

        match message {
            Some(message) => (key, message.to_string()),
            None => {
                tracing::warn!(scenario = %key, "pattern set lacks scenario, using neutral message");
                (key, self.neutral.to_string())
            }
        }
    }
}

impl Default for FeedbackSelector {
    fn default() -> Self {
        Self::new(ScenarioClassifier::default())
    }
}

/// Variant slot for a block: `(block_number - 1) mod 3`
#[inline]
#[must_use]
pub fn variant_index(block_number: u32) -> usize {
    (block_number.saturating_sub(1) % 3) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::default_pattern_set;

    fn block(n: u32, accuracy: f64, rt: f64) -> BlockPerformance {
        BlockPerformance::new(n, accuracy, rt).unwrap()
    }

    fn steady_set() -> FeedbackPatternSet {
        FeedbackPatternSet::new().with(ScenarioKey::RtSameAccSame, ["first", "second", "third"])
    }

    #[test]
    fn rotates_variants_with_block_number() {
        let selector = FeedbackSelector::default();
        let set = steady_set();
        let picked: Vec<_> = (1..=6)
            .map(|n| selector.select(&block(n, 80.0, 600.0), None, &set))
            .collect();
        assert_eq!(picked, ["first", "second", "third", "first", "second", "third"]);
    }

    #[test]
    fn uses_classified_scenario() {
        let selector = FeedbackSelector::default();
        let set = default_pattern_set(Language::En);
        let previous = block(1, 80.0, 710.0);
        let current = block(2, 86.0, 640.0);

        let (key, message) = selector.select_for(&current, Some(&previous), &set);
        assert_eq!(key, ScenarioKey::RtShortAccUp);
        assert_eq!(
            Some(message.as_str()),
            set.variant(ScenarioKey::RtShortAccUp, 1)
        );
    }

    #[test]
    fn missing_scenario_yields_neutral_message() {
        let selector = FeedbackSelector::default().with_language(Language::En);
        let previous = block(1, 85.0, 700.0);
        let current = block(2, 60.0, 900.0);

        let message = selector.select(&current, Some(&previous), &steady_set());
        assert_eq!(message, neutral_message(Language::En));
    }

    #[test]
    fn empty_variant_list_yields_neutral_message() {
        let selector = FeedbackSelector::default().with_neutral_message("keep going");
        let set = FeedbackPatternSet::new().with(ScenarioKey::RtSameAccSame, Vec::<String>::new());
        assert_eq!(selector.select(&block(1, 80.0, 600.0), None, &set), "keep going");
    }

    #[test]
    fn selection_does_not_mutate_set() {
        let selector = FeedbackSelector::default();
        let set = default_pattern_set(Language::Ja);
        let before = set.clone();
        let _ = selector.select(&block(4, 80.0, 600.0), None, &set);
        assert_eq!(set, before);
    }

    #[test]
    fn variant_index_formula() {
        assert_eq!(variant_index(1), 0);
        assert_eq!(variant_index(3), 2);
        assert_eq!(variant_index(4), 0);
        assert_eq!(variant_index(0), 0);
    }
}
