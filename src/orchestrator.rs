//! Request Orchestrator
//!
//! Classifies a request, resolves the action, strips instruction prefixes
//! and dispatches the payload to the action engine.
//!
//! **Dispatch rules:**
//! 1. A confident classification always keeps its own action
//! 2. A `general` classification takes the caller's explicit action, if any
//! 3. Engine unavailable, failing or slow → output is the normalized payload

use crate::config::Config;
use crate::core::engine::{EngineError, EngineHandle, EngineStatus};
use crate::core::intent::{Intent, IntentClassifier};
use crate::core::metadata::RequestMetadata;
use crate::core::text_normalizer::{format_output, InstructionNormalizer};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result of dispatching one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchResult {
    pub intent: Intent,
    pub action: Option<String>,
    pub confidence: f32,
    pub output: String,
}

/// How the output was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPath {
    /// Engine produced the output
    Engine,
    /// No action to run
    Passthrough,
    /// Engine unavailable, failed or timed out
    Degraded,
}

pub struct Orchestrator {
    classifier: IntentClassifier,
    normalizer: InstructionNormalizer,
    engine: Arc<EngineHandle>,
    engine_timeout: Option<Duration>,
}

impl Orchestrator {
    pub fn new(engine: Arc<EngineHandle>) -> Self {
        Self {
            classifier: IntentClassifier::new(),
            normalizer: InstructionNormalizer::new(),
            engine,
            engine_timeout: None,
        }
    }

    /// Orchestrator with the configured engine and timeout
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(EngineHandle::from_config(config)))
            .with_engine_timeout(config.engine_timeout())
    }

    pub fn with_engine_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.engine_timeout = timeout;
        self
    }

    pub fn with_classifier(mut self, classifier: IntentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_normalizer(mut self, normalizer: InstructionNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn engine_status(&self) -> EngineStatus {
        self.engine.status()
    }

    /// Handle a single request. Never fails: degraded conditions yield the
    /// normalized payload as output.
    pub async fn handle(&self, text: &str, meta: &RequestMetadata) -> DispatchResult {
        self.handle_traced(text, meta).await.0
    }

    /// Like [`Orchestrator::handle`], also reporting how the output was produced
    pub async fn handle_traced(
        &self,
        text: &str,
        meta: &RequestMetadata,
    ) -> (DispatchResult, DispatchPath) {
        let mut intent = self.classifier.classify(text);
        debug!(
            "Classified as {} (action={:?}, confidence={})",
            intent.intent, intent.action, intent.confidence
        );

        if intent.intent == Intent::General {
            if let Some(explicit) = meta.explicit_action() {
                debug!("Using explicit action '{}'", explicit);
                intent.action = Some(explicit.to_string());
            }
        }

        let payload = self.normalizer.normalize(text);

        let (output, path) = match intent.action.as_deref() {
            None => (payload, DispatchPath::Passthrough),
            Some(action) => self.run_engine(action, payload, meta).await,
        };

        let result = DispatchResult {
            intent: intent.intent,
            action: intent.action,
            confidence: intent.confidence,
            output: format_output(&output),
        };
        (result, path)
    }

    async fn run_engine(
        &self,
        action: &str,
        payload: String,
        meta: &RequestMetadata,
    ) -> (String, DispatchPath) {
        let Some(engine) = self.engine.resolve().await else {
            debug!("No action engine, echoing payload");
            return (payload, DispatchPath::Degraded);
        };

        let call = engine.run_action(action, &payload, meta);
        let outcome = match self.engine_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(EngineError::Timeout(limit)),
            },
            None => call.await,
        };

        match outcome {
            Ok(out) => match out.output {
                Some(output) => {
                    info!("🎯 '{}' handled by {}", action, engine.name());
                    (output, DispatchPath::Engine)
                }
                None => {
                    debug!("Engine returned no output for '{}'", action);
                    (payload, DispatchPath::Engine)
                }
            },
            Err(e) => {
                warn!("❌ Action '{}' failed on {}: {}", action, engine.name(), e);
                (payload, DispatchPath::Degraded)
            }
        }
    }

    /// Handle several texts with shared metadata. Blank entries are skipped;
    /// results keep the input order.
    pub async fn handle_batch(
        &self,
        texts: &[String],
        meta: &RequestMetadata,
    ) -> Vec<DispatchResult> {
        self.handle_batch_traced(texts, meta)
            .await
            .into_iter()
            .map(|(result, _)| result)
            .collect()
    }

    /// Like `handle_batch`, keeping the path each entry took
    pub async fn handle_batch_traced(
        &self,
        texts: &[String],
        meta: &RequestMetadata,
    ) -> Vec<(DispatchResult, DispatchPath)> {
        let jobs = texts
            .iter()
            .filter(|text| !text.trim().is_empty())
            .map(|text| self.handle_traced(text, meta));
        join_all(jobs).await
    }
}
