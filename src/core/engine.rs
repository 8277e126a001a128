//! Action Engine boundary
//!
//! An engine executes a named action (summarize, rewrite, ...) against
//! normalized text. Engines are created lazily through [`EngineHandle`],
//! which runs initialization at most once and caches a failure.

use crate::config::Config;
use crate::core::metadata::RequestMetadata;
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// Output returned for actions an engine does not implement
pub const UNSUPPORTED_ACTION: &str = "Task not supported yet";

/// Default minimum payload length (in characters) worth sending to an engine
pub const DEFAULT_MIN_ACTION_CHARS: usize = 30;

/// Errors raised at the engine boundary
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    #[error("engine initialization failed: {0}")]
    Init(String),

    #[error("engine request failed: {0}")]
    Request(String),

    #[error("invalid engine response: {0}")]
    InvalidResponse(String),

    #[error("engine timed out after {0:?}")]
    Timeout(Duration),
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EngineError::Request(format!("timeout: {}", err))
        } else {
            EngineError::Request(err.to_string())
        }
    }
}

/// Result of running an action
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineOutput {
    /// Generated text, `None` when the engine produced nothing
    pub output: Option<String>,
}

impl EngineOutput {
    pub fn text(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
        }
    }

    pub fn empty() -> Self {
        Self { output: None }
    }

    pub fn unsupported() -> Self {
        Self::text(UNSUPPORTED_ACTION)
    }

    pub fn is_unsupported(&self) -> bool {
        self.output.as_deref() == Some(UNSUPPORTED_ACTION)
    }
}

/// True when the payload is too short to act on meaningfully
pub fn is_too_short(text: &str, min_chars: usize) -> bool {
    text.trim().chars().count() < min_chars
}

/// Trait for action engines
#[async_trait]
pub trait ActionEngine: Send + Sync {
    /// Run `action` against `text`. Implementations return the input
    /// unchanged when it is shorter than their minimum length and
    /// [`EngineOutput::unsupported`] for unknown actions.
    async fn run_action(
        &self,
        action: &str,
        text: &str,
        options: &RequestMetadata,
    ) -> Result<EngineOutput, EngineError>;

    /// Get the engine name
    fn name(&self) -> &str;
}

type Initializer =
    Box<dyn Fn() -> BoxFuture<'static, Result<Arc<dyn ActionEngine>, EngineError>> + Send + Sync>;

enum EngineState {
    Ready(Arc<dyn ActionEngine>),
    Unavailable(String),
}

/// Observable state of an [`EngineHandle`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    NotInitialized,
    Ready(String),
    Unavailable(String),
}

/// Shared, initialize-once handle to the configured engine
pub struct EngineHandle {
    state: OnceCell<EngineState>,
    initializer: Initializer,
    attempts: AtomicUsize,
}

impl EngineHandle {
    /// Handle that runs `init` on first use
    pub fn new<F, Fut>(init: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Arc<dyn ActionEngine>, EngineError>> + Send + 'static,
    {
        Self {
            state: OnceCell::new(),
            initializer: Box::new(move || init().boxed()),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Handle that builds the engine named in the config on first use
    pub fn from_config(config: &Config) -> Self {
        let config = config.clone();
        Self::new(move || {
            let config = config.clone();
            async move { create_engine(&config).await }
        })
    }

    /// Handle with an already-initialized engine
    pub fn ready(engine: Arc<dyn ActionEngine>) -> Self {
        Self::preset(EngineState::Ready(engine))
    }

    /// Handle whose engine is permanently unavailable
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::preset(EngineState::Unavailable(reason.into()))
    }

    fn preset(state: EngineState) -> Self {
        Self {
            state: OnceCell::new_with(Some(state)),
            initializer: Box::new(|| {
                async {
                    Err::<Arc<dyn ActionEngine>, _>(EngineError::Init(
                        "handle was preset".into(),
                    ))
                }
                .boxed()
            }),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Resolve the engine, initializing it on first call. Concurrent first
    /// callers wait on a single initialization; later calls read the cache.
    pub async fn resolve(&self) -> Option<Arc<dyn ActionEngine>> {
        let state = self
            .state
            .get_or_init(|| async {
                self.attempts.fetch_add(1, Ordering::SeqCst);
                match (self.initializer)().await {
                    Ok(engine) => {
                        info!("✅ Action engine '{}' initialized", engine.name());
                        EngineState::Ready(engine)
                    }
                    Err(e) => {
                        warn!("⚠️ Action engine unavailable: {}", e);
                        EngineState::Unavailable(e.to_string())
                    }
                }
            })
            .await;

        match state {
            EngineState::Ready(engine) => Some(Arc::clone(engine)),
            EngineState::Unavailable(_) => None,
        }
    }

    pub fn status(&self) -> EngineStatus {
        match self.state.get() {
            None => EngineStatus::NotInitialized,
            Some(EngineState::Ready(engine)) => EngineStatus::Ready(engine.name().to_string()),
            Some(EngineState::Unavailable(reason)) => EngineStatus::Unavailable(reason.clone()),
        }
    }

    /// Number of times the initializer has run
    pub fn init_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineHandle")
            .field("status", &self.status())
            .field("attempts", &self.init_attempts())
            .finish()
    }
}

/// Factory to create the configured action engine
pub async fn create_engine(config: &Config) -> Result<Arc<dyn ActionEngine>, EngineError> {
    info!("🛠️ Creating action engine: {}", config.engine);
    let engine: Arc<dyn ActionEngine> = match config.engine.as_str() {
        "ollama" => {
            info!("  - Using Ollama ({} @ {})", config.ollama_model, config.ollama_url);
            Arc::new(super::ollama::OllamaEngine::connect(config).await?)
        }
        "extractive" => {
            info!("  - Using offline extractive engine");
            Arc::new(super::extractive::ExtractiveEngine::new(config))
        }
        "none" | "disabled" => {
            return Err(EngineError::Init("engine disabled by configuration".to_string()));
        }
        other => {
            warn!("  - Unknown engine '{}', falling back to extractive", other);
            Arc::new(super::extractive::ExtractiveEngine::new(config))
        }
    };
    Ok(engine)
}
