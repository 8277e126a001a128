use crate::orchestrator::{DispatchPath, DispatchResult};
use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default dispatch log location
pub fn log_path() -> PathBuf {
    crate::config::config_dir().join("dispatch.log")
}

/// One log line for a dispatched request
pub fn format_entry(result: &DispatchResult, path: DispatchPath) -> String {
    format!(
        "intent={} action={} confidence={:.2} path={:?} output_chars={}",
        result.intent,
        result.action.as_deref().unwrap_or("-"),
        result.confidence,
        path,
        result.output.chars().count()
    )
}

/// Append a dispatch record to the log at `log_path`
pub fn log_dispatch_to(log_path: &Path, result: &DispatchResult, path: DispatchPath) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        format_entry(result, path)
    )?;
    Ok(())
}
