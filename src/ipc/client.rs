//! IPC Client
//!
//! Blocking Unix socket client for talking to a running daemon.

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

use super::{IpcRequest, IpcResponse};
use crate::error::{AssistError, AssistResult};

static NEXT_SEQ_ID: AtomicU64 = AtomicU64::new(1);

fn next_seq_id() -> u64 {
    NEXT_SEQ_ID.fetch_add(1, Ordering::SeqCst)
}

/// IPC Client for the assistant daemon
#[derive(Debug, Clone)]
pub struct IpcClient {
    path: PathBuf,
    timeout: Duration,
}

impl IpcClient {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the daemon is running
    pub fn is_daemon_running(&self) -> bool {
        self.path.exists() && UnixStream::connect(&self.path).is_ok()
    }

    /// Send one request and wait for its response
    pub fn send(&self, request: &IpcRequest) -> AssistResult<IpcResponse> {
        let mut stream = UnixStream::connect(&self.path)
            .map_err(|e| AssistError::Ipc(format!("cannot connect to {:?}: {}", self.path, e)))?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(Duration::from_secs(5)))?;

        let request_json = serde_json::to_string(request)? + "\n";
        stream.write_all(request_json.as_bytes())?;

        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        reader.read_line(&mut line)?;

        if line.trim().is_empty() {
            return Err(AssistError::Ipc("daemon closed the connection".to_string()));
        }

        let response: IpcResponse = serde_json::from_str(line.trim())?;
        debug!("📨 IPC response: {:?}", response);

        // Malformed-request errors carry seq_id 0
        if response.seq_id() != request.seq_id() && response.seq_id() != 0 {
            return Err(AssistError::Ipc(format!(
                "sequence ID mismatch: expected {}, got {}",
                request.seq_id(),
                response.seq_id()
            )));
        }
        Ok(response)
    }

    /// Send text to the assistant
    pub fn assist(
        &self,
        content: &str,
        action: Option<&str>,
        target_lang: Option<&str>,
    ) -> AssistResult<IpcResponse> {
        self.send(&IpcRequest::AssistRequest {
            seq_id: next_seq_id(),
            content: content.to_string(),
            input_type: Some("text".to_string()),
            action: action.map(str::to_string),
            target_lang: target_lang.map(str::to_string),
            meta: None,
        })
    }

    /// Request daemon status
    pub fn status(&self) -> AssistResult<IpcResponse> {
        self.send(&IpcRequest::StatusRequest {
            seq_id: next_seq_id(),
        })
    }
}
