//! Ollama AI Integration
//!
//! Runs assistant actions through an Ollama text-generation model.

use crate::config::Config;
use crate::core::engine::{is_too_short, ActionEngine, EngineError, EngineOutput};
use crate::core::languages;
use crate::core::metadata::RequestMetadata;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Ollama API response
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

/// Action engine backed by an Ollama server
#[derive(Clone)]
pub struct OllamaEngine {
    url: String,
    model: String,
    min_chars: usize,
    default_target_lang: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OllamaEngine {
    /// Create new Ollama engine from config (no network access)
    pub fn new(config: &Config) -> Self {
        Self {
            url: config.ollama_url.trim_end_matches('/').to_string(),
            model: config.ollama_model.clone(),
            min_chars: config.min_action_chars,
            default_target_lang: config.default_target_lang.clone(),
            timeout: config
                .engine_timeout()
                .unwrap_or_else(|| Duration::from_secs(60)),
            client: reqwest::Client::new(),
        }
    }

    /// Create the engine and verify the server is reachable
    pub async fn connect(config: &Config) -> Result<Self, EngineError> {
        let engine = Self::new(config);
        if !engine.health_check().await {
            return Err(EngineError::Init(format!(
                "Ollama not reachable at {}",
                engine.url
            )));
        }
        Ok(engine)
    }

    /// Health check - verify Ollama is reachable
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/api/tags", self.url))
            .timeout(Duration::from_secs(2))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn target_language(&self, options: &RequestMetadata) -> String {
        let requested = options
            .target_lang()
            .unwrap_or(self.default_target_lang.as_str());
        languages::code_for(requested)
            .and_then(languages::name_for)
            .unwrap_or(requested)
            .to_string()
    }

    /// Prompt for an action, or `None` if the action is unsupported
    pub fn build_prompt(
        &self,
        action: &str,
        text: &str,
        options: &RequestMetadata,
    ) -> Option<String> {
        let prompt = match action {
            "summarize" => format!(
                "Summarize the following text in a few sentences. Keep the language of the original.\n\nText:\n{text}\n\nSummary:"
            ),
            "rewrite" => format!(
                "Paraphrase the following text. Keep its meaning and language, change the wording.\n\nText:\n{text}\n\nParaphrase:"
            ),
            "improve" => format!(
                "Improve the clarity, grammar and style of the following text. Keep its language. Respond with the improved text only.\n\nText:\n{text}\n\nImproved text:"
            ),
            "translate" => {
                let target = self.target_language(options);
                format!(
                    "Translate the following text to {target}. Respond with the translation only.\n\nText:\n{text}\n\nTranslation:"
                )
            }
            "meeting_summary" => format!(
                "These are meeting notes or a transcript. Write concise minutes: key points, decisions and action items.\n\nNotes:\n{text}\n\nMinutes:"
            ),
            "generate" => format!(
                "Write the content requested below.\n\nRequest:\n{text}\n\nContent:"
            ),
            _ => return None,
        };
        Some(prompt)
    }

    async fn generate(&self, prompt: &str) -> Result<EngineOutput, EngineError> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.url))
            .json(&serde_json::json!({
                "model": self.model,
                "prompt": prompt,
                "stream": false,
                "options": {
                    "temperature": 0.3
                }
            }))
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;

        if !status.is_success() {
            warn!("❌ Ollama API Error ({}): {}", status, body_text);
            return Err(EngineError::Request(format!("status {}", status)));
        }

        debug!("🧠 Ollama raw body: {}", body_text);

        let ollama_resp: OllamaResponse = serde_json::from_str(&body_text)
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))?;

        Ok(parse_generation(&ollama_resp.response))
    }
}

/// Trimmed generation, empty when the model produced nothing
fn parse_generation(response: &str) -> EngineOutput {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        EngineOutput::empty()
    } else {
        EngineOutput::text(trimmed)
    }
}

#[async_trait]
impl ActionEngine for OllamaEngine {
    async fn run_action(
        &self,
        action: &str,
        text: &str,
        options: &RequestMetadata,
    ) -> Result<EngineOutput, EngineError> {
        if is_too_short(text, self.min_chars) {
            debug!("Payload shorter than {} chars, returning as-is", self.min_chars);
            return Ok(EngineOutput::text(text));
        }

        match self.build_prompt(action, text, options) {
            Some(prompt) => self.generate(&prompt).await,
            None => {
                debug!("Ollama engine has no prompt for action '{}'", action);
                Ok(EngineOutput::unsupported())
            }
        }
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
