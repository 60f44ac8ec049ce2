//! Query Intent Classifier.
//!
//! Maps free text to a [`QueryIntent`] by keyword presence in the lowercased
//! text. Rules are checked in order and the first match wins; anything that
//! matches no rule is a single-area question.

use super::types::QueryIntent;

/// How a rule's keywords must appear in the query.
#[derive(Debug, Clone, Copy)]
enum Keywords {
    Any(&'static [&'static str]),
    All(&'static [&'static str]),
}

impl Keywords {
    fn matches(&self, text: &str) -> bool {
        match self {
            Self::Any(words) => words.iter().any(|w| text.contains(w)),
            Self::All(words) => words.iter().all(|w| text.contains(w)),
        }
    }
}

/// Ordered classification rules.
const RULES: &[(QueryIntent, Keywords)] = &[
    (QueryIntent::Compare, Keywords::Any(&["compare", "vs"])),
    (QueryIntent::PriceGrowth, Keywords::All(&["price", "growth"])),
    (QueryIntent::DemandTrend, Keywords::Any(&["demand", "trend"])),
];

/// Classifies natural language questions into intents.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a question. Always returns exactly one intent.
    pub fn classify(&self, query: &str) -> QueryIntent {
        let text = query.to_lowercase();

        RULES
            .iter()
            .find(|(_, keywords)| keywords.matches(&text))
            .map(|(intent, _)| *intent)
            .unwrap_or_default()
    }
}
