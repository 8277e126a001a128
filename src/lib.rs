//! PolyAssist Library
//!
//! Intent routing and action dispatch for a multilingual writing assistant.

pub mod audit;
pub mod config;
pub mod core;
pub mod error;
pub mod ipc;
pub mod orchestrator;

pub use crate::core::engine::{ActionEngine, EngineHandle, EngineOutput};
pub use crate::core::intent::{Intent, IntentResult};
pub use crate::core::metadata::RequestMetadata;
pub use orchestrator::{DispatchResult, Orchestrator};
