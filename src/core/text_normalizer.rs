//! Instruction Normalization
//!
//! Strips a leading instruction phrase ("summarize this text:") so only the
//! payload reaches the action engine.

/// Known instruction prefixes, tested in order
pub const INSTRUCTION_PREFIXES: &[&str] = &[
    "لخص هذا النص:",
    "لخص النص:",
    "ترجم هذا النص إلى العربية:",
    "ترجم هذا النص إلى الإنجليزية:",
    "أعد صياغة هذا النص:",
    "اعادة صياغة هذا النص:",
    "حسّن هذا النص:",
    "summarize this text:",
    "summarize the text:",
    "translate this text to arabic:",
    "translate this text to english:",
    "rewrite this text:",
    "paraphrase this text:",
    "improve this text:",
];

/// Removes known instruction prefixes from user text
#[derive(Debug, Clone)]
pub struct InstructionNormalizer {
    prefixes: Vec<String>,
}

impl Default for InstructionNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl InstructionNormalizer {
    pub fn new() -> Self {
        Self::with_prefixes(INSTRUCTION_PREFIXES.iter().map(|p| p.to_string()))
    }

    pub fn with_prefixes<I>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            prefixes: prefixes.into_iter().collect(),
        }
    }

    /// Trim the text and strip the first matching prefix (no recursion)
    pub fn normalize(&self, text: &str) -> String {
        let t = text.trim();

        for prefix in &self.prefixes {
            // Non-ASCII bytes must match exactly; ASCII letters ignore case
            if let Some(head) = t.get(..prefix.len()) {
                if head.eq_ignore_ascii_case(prefix) {
                    return t[prefix.len()..].trim().to_string();
                }
            }
        }

        t.to_string()
    }
}

/// Normalize with the built-in prefix list
pub fn normalize(text: &str) -> String {
    InstructionNormalizer::new().normalize(text)
}

/// Final output formatting
pub fn format_output(text: &str) -> String {
    text.trim().to_string()
}
