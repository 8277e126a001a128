//! IPC Message Types
//!
//! JSON-serializable messages for client ↔ daemon communication.

use crate::core::intent::Intent;
use crate::core::metadata::RequestMetadata;
use crate::error::{AssistError, AssistResult};
use crate::orchestrator::DispatchResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request types sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum IpcRequest {
    /// Classify and run a single text
    #[serde(rename = "assist_request")]
    AssistRequest {
        seq_id: u64,
        #[serde(default)]
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        input_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_lang: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<Value>,
    },

    /// Run several texts with shared options
    #[serde(rename = "batch_request")]
    BatchRequest {
        seq_id: u64,
        #[serde(default)]
        texts: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_lang: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<Value>,
    },

    /// Request status of the daemon
    #[serde(rename = "status_request")]
    StatusRequest { seq_id: u64 },
}

impl IpcRequest {
    pub fn seq_id(&self) -> u64 {
        match self {
            IpcRequest::AssistRequest { seq_id, .. }
            | IpcRequest::BatchRequest { seq_id, .. }
            | IpcRequest::StatusRequest { seq_id } => *seq_id,
        }
    }
}

/// Response types sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum IpcResponse {
    #[serde(rename = "assist_response")]
    AssistResponse {
        seq_id: u64,
        input_type: String,
        intent: Intent,
        result: DispatchResult,
    },

    #[serde(rename = "batch_response")]
    BatchResponse {
        seq_id: u64,
        count: usize,
        results: Vec<DispatchResult>,
    },

    #[serde(rename = "status_response")]
    StatusResponse {
        seq_id: u64,
        version: String,
        engine: String,
        engine_ready: bool,
    },

    /// Request rejected before dispatch
    #[serde(rename = "error")]
    Error { seq_id: u64, message: String },
}

impl IpcResponse {
    pub fn seq_id(&self) -> u64 {
        match self {
            IpcResponse::AssistResponse { seq_id, .. }
            | IpcResponse::BatchResponse { seq_id, .. }
            | IpcResponse::StatusResponse { seq_id, .. }
            | IpcResponse::Error { seq_id, .. } => *seq_id,
        }
    }
}

/// Check input type and content; returns the trimmed content
pub fn validate_content(content: &str, input_type: Option<&str>) -> AssistResult<String> {
    let input_type = input_type
        .map(|t| t.trim().to_lowercase())
        .unwrap_or_else(|| "text".to_string());

    match input_type.as_str() {
        "text" => {}
        "voice" => {
            return Err(AssistError::Validation(
                "voice input is not supported over this channel".to_string(),
            ))
        }
        _ => {
            return Err(AssistError::Validation(
                "input_type must be text or voice".to_string(),
            ))
        }
    }

    let content = content.trim();
    if content.is_empty() {
        return Err(AssistError::Validation("content is required".to_string()));
    }
    Ok(content.to_string())
}

/// Merge nested `meta` with the top-level options. Top-level `action` and
/// `target_lang` win over nested keys; a non-object `meta` is ignored.
pub fn build_metadata(
    action: Option<&str>,
    target_lang: Option<&str>,
    meta: Option<&Value>,
    default_target_lang: &str,
) -> AssistResult<RequestMetadata> {
    let mut merged = match meta {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };

    let action = action
        .map(|a| a.trim().to_lowercase())
        .filter(|a| !a.is_empty());
    match action {
        Some(action) => {
            merged.insert("action".to_string(), Value::String(action));
        }
        None => {
            merged.remove("action");
        }
    }

    let target_lang = target_lang
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(default_target_lang);
    merged.remove("target_language");
    merged.insert(
        "target_lang".to_string(),
        Value::String(target_lang.to_string()),
    );

    serde_json::from_value(Value::Object(merged))
        .map_err(|e| AssistError::Validation(format!("invalid meta: {}", e)))
}
