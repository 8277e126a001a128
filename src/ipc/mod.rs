//! IPC (Inter-Process Communication) Module
//!
//! Unix socket access to the assistant daemon.
//! Protocol: JSON over newline-delimited messages.

pub mod client;
pub mod messages;
pub mod server;

pub use client::IpcClient;
pub use messages::*;
pub use server::{IpcServer, ServerSettings};

use crate::config::Config;
use std::path::PathBuf;

/// Get the Unix socket path for IPC
pub fn socket_path(config: &Config) -> PathBuf {
    if let Some(path) = config.socket_path.as_deref().filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    let user = std::env::var("USER").unwrap_or_else(|_| "polyassist".to_string());
    PathBuf::from(format!("/tmp/polyassist-{}.sock", user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_socket_path_wins() {
        let config = Config {
            socket_path: Some("/run/user/1000/assist.sock".to_string()),
            ..Config::default()
        };
        assert_eq!(socket_path(&config), PathBuf::from("/run/user/1000/assist.sock"));
    }

    #[test]
    fn test_default_socket_path_in_tmp() {
        let path = socket_path(&Config::default());
        assert!(path.starts_with("/tmp"));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("sock"));
    }
}
