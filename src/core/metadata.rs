//! Caller-supplied request metadata.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Options accompanying a request. Unknown keys are kept in `extra` and
/// forwarded verbatim to the action engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    #[serde(
        default,
        alias = "target_language",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_lang: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RequestMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_target_lang(mut self, lang: impl Into<String>) -> Self {
        self.target_lang = Some(lang.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Explicit action override, if non-empty after trimming
    pub fn explicit_action(&self) -> Option<&str> {
        self.action
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }

    /// Target language, if non-empty after trimming
    pub fn target_lang(&self) -> Option<&str> {
        self.target_lang
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}
