//! IPC Server
//!
//! Unix socket server exposing the orchestrator to local clients.
//! One newline-terminated JSON request per connection.

use anyhow::Result;
use std::fs;
use std::future::Future;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, info, warn};

use super::messages::{build_metadata, validate_content};
use super::{IpcRequest, IpcResponse};
use crate::config::Config;
use crate::core::engine::EngineStatus;
use crate::error::AssistResult;
use crate::orchestrator::Orchestrator;

/// Per-server settings shared with client handlers
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub socket_path: PathBuf,
    pub default_target_lang: String,
    pub max_request_bytes: u64,
    pub audit_log: Option<PathBuf>,
}

impl ServerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            socket_path: super::socket_path(config),
            default_target_lang: config.default_target_lang.clone(),
            max_request_bytes: config.max_request_bytes,
            audit_log: config.audit_enabled.then(crate::audit::log_path),
        }
    }
}

struct ServerContext {
    orchestrator: Arc<Orchestrator>,
    settings: ServerSettings,
}

/// IPC Server for the assistant daemon
pub struct IpcServer {
    ctx: Arc<ServerContext>,
}

impl IpcServer {
    pub fn new(orchestrator: Arc<Orchestrator>, settings: ServerSettings) -> Self {
        Self {
            ctx: Arc::new(ServerContext {
                orchestrator,
                settings,
            }),
        }
    }

    pub fn socket_path(&self) -> &PathBuf {
        &self.ctx.settings.socket_path
    }

    /// Bind the socket with user-only permissions
    pub fn bind(&self) -> Result<UnixListener> {
        let path = self.socket_path();

        // Clean up stale socket
        if path.exists() {
            let _ = fs::remove_file(path);
        }

        let listener = UnixListener::bind(path)?;

        if let Ok(metadata) = fs::metadata(path) {
            let mut perms = metadata.permissions();
            perms.set_mode(0o600);
            if let Err(e) = fs::set_permissions(path, perms) {
                warn!("⚠️ Failed to set strict IPC socket permissions: {}", e);
            } else {
                debug!("🔒 IPC socket permissions set to 0600");
            }
        }

        info!("🔌 IPC server listening on {:?}", path);
        Ok(listener)
    }

    /// Accept clients until `shutdown` resolves
    pub async fn serve<S>(&self, listener: UnixListener, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, _)) => {
                        let ctx = Arc::clone(&self.ctx);
                        tokio::spawn(async move {
                            if let Err(e) = handle_client(stream, ctx).await {
                                warn!("IPC client error: {}", e);
                            }
                        });
                    }
                    Err(e) => {
                        warn!("IPC accept error: {}", e);
                    }
                },
            }
        }

        let _ = fs::remove_file(self.socket_path());
        info!("🔌 IPC server stopped");
        Ok(())
    }

    /// Bind and serve
    pub async fn run<S>(&self, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        let listener = self.bind()?;
        self.serve(listener, shutdown).await
    }

    /// Handle one request without a socket
    pub async fn process(&self, request: IpcRequest) -> IpcResponse {
        process_request(request, &self.ctx).await
    }
}

/// Handle a single client connection
async fn handle_client(stream: UnixStream, ctx: Arc<ServerContext>) -> Result<()> {
    let (read_half, mut write_half) = stream.into_split();

    // Oversized requests are cut off and fail to parse
    let mut reader = BufReader::new(read_half.take(ctx.settings.max_request_bytes));
    let mut line = String::new();
    reader.read_line(&mut line).await?;

    if line.trim().is_empty() {
        return Ok(());
    }

    let response = match serde_json::from_str::<IpcRequest>(line.trim()) {
        Ok(request) => {
            debug!("📨 IPC request: seq_id={}", request.seq_id());
            process_request(request, &ctx).await
        }
        Err(e) => {
            warn!("⚠️ Malformed IPC request: {}", e);
            IpcResponse::Error {
                seq_id: 0,
                message: format!("malformed request: {}", e),
            }
        }
    };

    let response_json = serde_json::to_string(&response)? + "\n";
    write_half.write_all(response_json.as_bytes()).await?;
    write_half.shutdown().await?;

    Ok(())
}

async fn process_request(request: IpcRequest, ctx: &ServerContext) -> IpcResponse {
    let seq_id = request.seq_id();
    match dispatch(request, ctx).await {
        Ok(response) => response,
        Err(e) => {
            debug!("Rejected request {}: {}", seq_id, e);
            IpcResponse::Error {
                seq_id,
                message: e.to_string(),
            }
        }
    }
}

async fn dispatch(request: IpcRequest, ctx: &ServerContext) -> AssistResult<IpcResponse> {
    let settings = &ctx.settings;

    match request {
        IpcRequest::AssistRequest {
            seq_id,
            content,
            input_type,
            action,
            target_lang,
            meta,
        } => {
            let content = validate_content(&content, input_type.as_deref())?;
            let meta = build_metadata(
                action.as_deref(),
                target_lang.as_deref(),
                meta.as_ref(),
                &settings.default_target_lang,
            )?;

            let (result, path) = ctx.orchestrator.handle_traced(&content, &meta).await;
            if let Some(log) = &settings.audit_log {
                if let Err(e) = crate::audit::log_dispatch_to(log, &result, path) {
                    warn!("Failed to write dispatch log: {}", e);
                }
            }

            Ok(IpcResponse::AssistResponse {
                seq_id,
                input_type: "text".to_string(),
                intent: result.intent,
                result,
            })
        }
        IpcRequest::BatchRequest {
            seq_id,
            texts,
            action,
            target_lang,
            meta,
        } => {
            if texts.iter().all(|t| t.trim().is_empty()) {
                return Err(crate::error::AssistError::Validation(
                    "texts must contain at least one non-empty entry".to_string(),
                ));
            }
            let meta = build_metadata(
                action.as_deref(),
                target_lang.as_deref(),
                meta.as_ref(),
                &settings.default_target_lang,
            )?;

            let traced = ctx.orchestrator.handle_batch_traced(&texts, &meta).await;
            let mut results = Vec::with_capacity(traced.len());
            for (result, path) in traced {
                if let Some(log) = &settings.audit_log {
                    if let Err(e) = crate::audit::log_dispatch_to(log, &result, path) {
                        warn!("Failed to write dispatch log: {}", e);
                    }
                }
                results.push(result);
            }
            Ok(IpcResponse::BatchResponse {
                seq_id,
                count: results.len(),
                results,
            })
        }
        IpcRequest::StatusRequest { seq_id } => {
            let (engine, engine_ready) = match ctx.orchestrator.engine_status() {
                EngineStatus::NotInitialized => ("not initialized".to_string(), false),
                EngineStatus::Ready(name) => (name, true),
                EngineStatus::Unavailable(reason) => (format!("unavailable: {}", reason), false),
            };
            Ok(IpcResponse::StatusResponse {
                seq_id,
                version: env!("CARGO_PKG_VERSION").to_string(),
                engine,
                engine_ready,
            })
        }
    }
}
