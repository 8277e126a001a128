//! Mock Action Engine for Testing
//!
//! Records every call and answers according to a scripted behavior.

use async_trait::async_trait;
use polyassist::core::engine::{is_too_short, ActionEngine, EngineError, EngineOutput};
use polyassist::RequestMetadata;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How the mock answers
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Output "<action>: <text>"
    Echo,
    /// Return an engine error
    Fail,
    /// Return no output
    Empty,
    /// Sleep before answering like `Echo`
    Stall(Duration),
}

/// One recorded engine call
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub action: String,
    pub text: String,
    pub options: RequestMetadata,
}

pub struct MockEngine {
    behavior: Behavior,
    min_chars: usize,
    pub calls: Arc<Mutex<Vec<Call>>>,
}

impl MockEngine {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            min_chars: 0,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Apply the minimum-length guard like real engines do
    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActionEngine for MockEngine {
    async fn run_action(
        &self,
        action: &str,
        text: &str,
        options: &RequestMetadata,
    ) -> Result<EngineOutput, EngineError> {
        self.calls.lock().unwrap().push(Call {
            action: action.to_string(),
            text: text.to_string(),
            options: options.clone(),
        });

        if is_too_short(text, self.min_chars) {
            return Ok(EngineOutput::text(text));
        }

        match &self.behavior {
            Behavior::Echo => Ok(EngineOutput::text(format!("{action}: {text}"))),
            Behavior::Fail => Err(EngineError::Request("mock failure".to_string())),
            Behavior::Empty => Ok(EngineOutput::empty()),
            Behavior::Stall(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(EngineOutput::text(format!("{action}: {text}")))
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
