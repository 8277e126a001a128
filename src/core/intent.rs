//! Intent Classification
//!
//! Rule-based mapping from free text to a coarse intent and a suggested
//! action. Rules are tested in table order against the lower-cased, trimmed
//! text; the first rule with a matching keyword wins.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence reported for empty input
pub const EMPTY_CONFIDENCE: f32 = 0.1;

/// Confidence reported when no rule matched
pub const NO_MATCH_CONFIDENCE: f32 = 0.5;

/// Coarse category of what the user wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Translation,
    Writing,
    Meeting,
    Content,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Translation => "translation",
            Intent::Writing => "writing",
            Intent::Meeting => "meeting",
            Intent::Content => "content",
            Intent::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier output for a single request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    pub intent: Intent,
    pub action: Option<String>,
    pub confidence: f32,
}

impl IntentResult {
    fn general(confidence: f32) -> Self {
        Self {
            intent: Intent::General,
            action: None,
            confidence,
        }
    }
}

/// One row of the keyword table
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub intent: Intent,
    pub action: &'static str,
    pub confidence: f32,
    pub keywords: &'static [&'static str],
}

impl IntentRule {
    fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|kw| text.contains(kw))
    }
}

/// Keyword rules in priority order (Arabic + English)
pub const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::Translation,
        action: "translate",
        confidence: 0.9,
        keywords: &["ترجم", "ترجمة", "translate", "translation"],
    },
    IntentRule {
        intent: Intent::Writing,
        action: "summarize",
        confidence: 0.9,
        keywords: &["لخص", "تلخيص", "summarize", "summary"],
    },
    IntentRule {
        intent: Intent::Writing,
        action: "rewrite",
        confidence: 0.85,
        keywords: &[
            "أعد صياغة",
            "اعد صياغة",
            "اعادة صياغة",
            "إعادة صياغة",
            "rewrite",
            "paraphrase",
        ],
    },
    IntentRule {
        intent: Intent::Writing,
        action: "improve",
        confidence: 0.8,
        keywords: &["حسّن", "تحسين", "improve", "polish"],
    },
    IntentRule {
        intent: Intent::Meeting,
        action: "meeting_summary",
        confidence: 0.8,
        keywords: &["اجتماع", "meeting", "minutes", "محضر"],
    },
    IntentRule {
        intent: Intent::Content,
        action: "generate",
        confidence: 0.8,
        keywords: &["قصة", "story", "اكتب", "write", "generate content", "content"],
    },
];

/// Table-driven intent classifier
#[derive(Debug, Clone, Copy)]
pub struct IntentClassifier {
    rules: &'static [IntentRule],
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Classifier over the built-in keyword table
    pub fn new() -> Self {
        Self {
            rules: INTENT_RULES,
        }
    }

    /// Classifier over a custom rule table
    pub fn with_rules(rules: &'static [IntentRule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'static [IntentRule] {
        self.rules
    }

    /// Classify text into an intent and suggested action
    pub fn classify(&self, text: &str) -> IntentResult {
        let t = text.trim().to_lowercase();
        if t.is_empty() {
            return IntentResult::general(EMPTY_CONFIDENCE);
        }

        self.rules
            .iter()
            .find(|rule| rule.matches(&t))
            .map(|rule| IntentResult {
                intent: rule.intent,
                action: Some(rule.action.to_string()),
                confidence: rule.confidence,
            })
            .unwrap_or_else(|| IntentResult::general(NO_MATCH_CONFIDENCE))
    }
}

/// Classify with the built-in table
pub fn classify(text: &str) -> IntentResult {
    IntentClassifier::new().classify(text)
}
