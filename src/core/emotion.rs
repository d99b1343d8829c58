//! # Emotion Labels
//!
//! The closed set of moods the kiosk knows how to recommend for.
//!
//! The analysis service is loosely typed: it answers with whatever string it
//! likes. Everything entering the app goes through [`EmotionLabel::parse`],
//! which is total: anything it can't place becomes [`EmotionLabel::Calm`].
//!
//! ```text
//! "Happy😊"    → Happy      (decoration stripped)
//! "sad"        → Sadness    (case-insensitive, short alias)
//! "Anxiety"    → Stressed   (fine-grained expression folded into a category)
//! ""           → Calm       (fallback)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EmotionLabel {
    Sadness,
    Anger,
    Stressed,
    #[default]
    Calm,
    Happy,
    Curious,
}

// Fine-grained expression names, grouped by the category they fold into.
const SADNESS_EXPRESSIONS: &[&str] = &[
    "Awkwardness",
    "Boredom",
    "Contemplation",
    "Disappointment",
    "Distress",
    "Doubt",
    "Embarrassment",
    "Empathic Pain",
    "Pain",
    "Shame",
    "Sympathy",
    "Tiredness",
];

const ANGER_EXPRESSIONS: &[&str] = &["Contempt", "Disgust", "Envy", "Guilt"];

const CALM_EXPRESSIONS: &[&str] = &["Calmness", "Contentment", "Realization"];

const HAPPY_EXPRESSIONS: &[&str] = &[
    "Craving",
    "Determination",
    "Ecstasy",
    "Entrancement",
    "Excitement",
    "Joy",
    "Pride",
    "Triumph",
    "Admiration",
    "Adoration",
    "Aesthetic Appreciation",
    "Amusement",
    "Love",
    "Nostalgia",
    "Relief",
    "Romance",
    "Satisfaction",
];

const STRESSED_EXPRESSIONS: &[&str] = &["Anxiety", "Awe", "Fear", "Horror"];

const CURIOUS_EXPRESSIONS: &[&str] = &[
    "Interest",
    "Surprise (positive)",
    "Surprise (negative)",
    "Confusion",
];

impl EmotionLabel {
    pub const ALL: [EmotionLabel; 6] = [
        EmotionLabel::Sadness,
        EmotionLabel::Anger,
        EmotionLabel::Stressed,
        EmotionLabel::Calm,
        EmotionLabel::Happy,
        EmotionLabel::Curious,
    ];

    /// Parses a label returned by the analysis service.
    ///
    /// Returns `None` only when the string can't be placed in any category.
    /// Most callers want [`EmotionLabel::parse`], which falls back to Calm.
    pub fn recognize(raw: &str) -> Option<EmotionLabel> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        // Fine-grained names carry spaces and parentheses, so check them
        // before stripping anything.
        if let Some(label) = Self::categorize(trimmed) {
            return Some(label);
        }

        let core = trimmed.trim_end_matches(|c: char| !c.is_alphabetic());
        match core.to_ascii_lowercase().as_str() {
            "sadness" | "sad" => Some(EmotionLabel::Sadness),
            "anger" | "angry" => Some(EmotionLabel::Anger),
            "stressed" | "stress" => Some(EmotionLabel::Stressed),
            "calm" => Some(EmotionLabel::Calm),
            "happy" => Some(EmotionLabel::Happy),
            "curious" => Some(EmotionLabel::Curious),
            _ => None,
        }
    }

    /// Total parse: unknown or empty input yields Calm.
    pub fn parse(raw: &str) -> EmotionLabel {
        Self::recognize(raw).unwrap_or_default()
    }

    /// Folds a fine-grained expression name into one of the six categories.
    pub fn categorize(expression: &str) -> Option<EmotionLabel> {
        let groups: [(&[&str], EmotionLabel); 6] = [
            (SADNESS_EXPRESSIONS, EmotionLabel::Sadness),
            (ANGER_EXPRESSIONS, EmotionLabel::Anger),
            (CALM_EXPRESSIONS, EmotionLabel::Calm),
            (HAPPY_EXPRESSIONS, EmotionLabel::Happy),
            (STRESSED_EXPRESSIONS, EmotionLabel::Stressed),
            (CURIOUS_EXPRESSIONS, EmotionLabel::Curious),
        ];
        groups
            .iter()
            .find(|(names, _)| names.iter().any(|n| n.eq_ignore_ascii_case(expression)))
            .map(|(_, label)| *label)
    }

    pub fn name(self) -> &'static str {
        match self {
            EmotionLabel::Sadness => "Sadness",
            EmotionLabel::Anger => "Anger",
            EmotionLabel::Stressed => "Stressed",
            EmotionLabel::Calm => "Calm",
            EmotionLabel::Happy => "Happy",
            EmotionLabel::Curious => "Curious",
        }
    }

    /// Lowercase form used in the "You look ..." headline.
    pub fn display_name(self) -> String {
        self.name().to_lowercase()
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names_round_trip() {
        for label in EmotionLabel::ALL {
            assert_eq!(EmotionLabel::parse(label.name()), label);
        }
    }

    #[test]
    fn test_decorated_backend_labels() {
        assert_eq!(EmotionLabel::parse("Happy😊"), EmotionLabel::Happy);
        assert_eq!(EmotionLabel::parse("Sad😢"), EmotionLabel::Sadness);
        assert_eq!(EmotionLabel::parse("Anger😡"), EmotionLabel::Anger);
        assert_eq!(EmotionLabel::parse("Stressed😫"), EmotionLabel::Stressed);
        assert_eq!(EmotionLabel::parse("Curious😕"), EmotionLabel::Curious);
        assert_eq!(EmotionLabel::parse("Calm😌"), EmotionLabel::Calm);
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(EmotionLabel::parse("  happy "), EmotionLabel::Happy);
        assert_eq!(EmotionLabel::parse("CURIOUS"), EmotionLabel::Curious);
    }

    #[test]
    fn test_fine_grained_expressions_fold() {
        assert_eq!(EmotionLabel::parse("Joy"), EmotionLabel::Happy);
        assert_eq!(EmotionLabel::parse("Anxiety"), EmotionLabel::Stressed);
        assert_eq!(EmotionLabel::parse("Surprise (positive)"), EmotionLabel::Curious);
        assert_eq!(EmotionLabel::parse("Empathic Pain"), EmotionLabel::Sadness);
        assert_eq!(EmotionLabel::parse("Contempt"), EmotionLabel::Anger);
    }

    #[test]
    fn test_unknown_falls_back_to_calm() {
        assert_eq!(EmotionLabel::recognize(""), None);
        assert_eq!(EmotionLabel::recognize("Bewildered"), None);
        assert_eq!(EmotionLabel::parse(""), EmotionLabel::Calm);
        assert_eq!(EmotionLabel::parse("😊"), EmotionLabel::Calm);
        assert_eq!(EmotionLabel::parse("Bewildered"), EmotionLabel::Calm);
    }

    #[test]
    fn test_display_name_is_lowercase() {
        assert_eq!(EmotionLabel::Happy.display_name(), "happy");
        assert_eq!(EmotionLabel::default().display_name(), "calm");
    }
}
