//! Offline extractive engine
//!
//! Heuristic summarize/rewrite for deployments without a model server.

use crate::config::Config;
use crate::core::engine::{is_too_short, ActionEngine, EngineError, EngineOutput};
use crate::core::metadata::RequestMetadata;
use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;

fn sentence_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]\s+").expect("sentence boundary regex is valid"))
}

/// Split after `.`, `!` or `?` followed by whitespace
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in sentence_boundary().find_iter(text) {
        sentences.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences.retain(|s| !s.is_empty());
    sentences
}

/// Fast extractive summary: leading sentences, capped at `max_words`
pub fn quick_summary(text: &str, max_sentences: usize, max_words: usize) -> String {
    let cleaned = text.trim();
    if cleaned.is_empty() {
        return text.to_string();
    }

    let words: Vec<&str> = cleaned.split_whitespace().collect();
    if words.len() <= max_words {
        return cleaned.to_string();
    }

    let sentences = split_sentences(cleaned);
    let summary = if sentences.is_empty() {
        words[..max_words].join(" ")
    } else {
        sentences
            .iter()
            .take(max_sentences)
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    };

    let summary_words: Vec<&str> = summary.split_whitespace().collect();
    let summary = if summary_words.len() > max_words {
        summary_words[..max_words].join(" ")
    } else {
        summary.trim().to_string()
    };

    summary + "..."
}

/// Collapse whitespace and capitalize sentence starts
pub fn tidy_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    split_sentences(&collapsed)
        .into_iter()
        .map(|sentence| {
            let mut chars = sentence.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Action engine that needs no model
#[derive(Debug, Clone)]
pub struct ExtractiveEngine {
    min_chars: usize,
    max_sentences: usize,
    max_words: usize,
}

impl ExtractiveEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            min_chars: config.min_action_chars,
            max_sentences: config.summary_max_sentences,
            max_words: config.summary_max_words,
        }
    }
}

#[async_trait]
impl ActionEngine for ExtractiveEngine {
    async fn run_action(
        &self,
        action: &str,
        text: &str,
        _options: &RequestMetadata,
    ) -> Result<EngineOutput, EngineError> {
        if is_too_short(text, self.min_chars) {
            return Ok(EngineOutput::text(text));
        }

        let output = match action {
            "summarize" | "meeting_summary" => {
                EngineOutput::text(quick_summary(text, self.max_sentences, self.max_words))
            }
            "rewrite" | "improve" => EngineOutput::text(tidy_text(text)),
            _ => EngineOutput::unsupported(),
        };
        Ok(output)
    }

    fn name(&self) -> &str {
        "extractive"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences("One. Two!  Three? Four"),
            vec!["One.", "Two!", "Three?", "Four"]
        );
        assert_eq!(split_sentences("v1.2 is out"), vec!["v1.2 is out"]);
    }

    #[test]
    fn test_quick_summary_short_text_untouched() {
        assert_eq!(quick_summary("  a short note  ", 3, 60), "a short note");
        assert_eq!(quick_summary("   ", 3, 60), "   ");
    }

    #[test]
    fn test_quick_summary_takes_leading_sentences() {
        let text = "First point. Second point. Third point. Fourth point. Fifth point.";
        assert_eq!(
            quick_summary(text, 2, 5),
            "First point. Second point...."
        );
    }

    #[test]
    fn test_quick_summary_caps_words() {
        let text = "one two three four five six seven eight nine ten";
        assert_eq!(quick_summary(text, 3, 4), "one two three four...");
    }

    #[test]
    fn test_tidy_text() {
        assert_eq!(
            tidy_text("  the  report   is late.  we will   fix it.  "),
            "The report is late. We will fix it."
        );
    }

    #[tokio::test]
    async fn test_engine_actions() {
        let engine = ExtractiveEngine::new(&Config {
            summary_max_sentences: 1,
            summary_max_words: 5,
            ..Config::default()
        });
        let meta = RequestMetadata::new();
        let text = "Budget review went well. Hiring is paused until spring. Travel is frozen.";

        let out = engine.run_action("summarize", text, &meta).await.unwrap();
        assert_eq!(out.output.as_deref(), Some("Budget review went well...."));

        let out = engine.run_action("translate", text, &meta).await.unwrap();
        assert!(out.is_unsupported());

        let out = engine.run_action("summarize", "tiny", &meta).await.unwrap();
        assert_eq!(out.output.as_deref(), Some("tiny"));
    }
}
