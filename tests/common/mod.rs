#![allow(dead_code)]

pub mod mock_engine;

use mock_engine::{Behavior, MockEngine};
use polyassist::core::engine::{ActionEngine, EngineHandle};
use polyassist::Orchestrator;
use std::sync::Arc;

/// Orchestrator wired to a fresh mock engine
pub struct TestContext {
    pub engine: Arc<MockEngine>,
    pub orchestrator: Orchestrator,
}

impl TestContext {
    pub fn new(behavior: Behavior) -> Self {
        Self::with_engine(MockEngine::new(behavior))
    }

    pub fn with_engine(engine: MockEngine) -> Self {
        let engine = Arc::new(engine);
        let handle = EngineHandle::ready(Arc::clone(&engine) as Arc<dyn ActionEngine>);
        Self {
            engine,
            orchestrator: Orchestrator::new(Arc::new(handle)),
        }
    }
}

/// Orchestrator whose engine can never be created
pub fn unavailable_orchestrator() -> Orchestrator {
    Orchestrator::new(Arc::new(EngineHandle::unavailable("forced for test")))
}
