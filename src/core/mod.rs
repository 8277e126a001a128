//! Core processing modules
//!
//! Intent classification, instruction normalization and the action
//! engine boundary with its backends.

pub mod engine;
pub mod extractive;
pub mod intent;
pub mod languages;
pub mod metadata;
pub mod ollama;
pub mod text_normalizer;
