//! PolyAssist - multilingual writing assistant daemon and CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use polyassist::config::Config;
use polyassist::ipc::{self, IpcClient, IpcServer, ServerSettings};
use polyassist::orchestrator::Orchestrator;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the IPC socket path
    #[arg(long, global = true)]
    socket: Option<String>,

    /// Override the action engine (ollama, extractive, none)
    #[arg(long, global = true)]
    engine: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the assistant daemon on a Unix socket
    Serve,

    /// Handle one request in-process and print the result as JSON
    Ask {
        text: String,
        #[arg(short, long)]
        action: Option<String>,
        #[arg(short, long)]
        target_lang: Option<String>,
    },

    /// Send one request to a running daemon
    Send {
        text: String,
        #[arg(short, long)]
        action: Option<String>,
        #[arg(short, long)]
        target_lang: Option<String>,
    },

    /// Query daemon status
    Status,
}

/// Load the config with a temporary stderr subscriber so load-time
/// warnings are not lost before logging is configured
fn load_config<W>(make_writer: W) -> Result<Config>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let bootstrap = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new("warn"))
        .with_writer(make_writer)
        .finish();
    tracing::subscriber::with_default(bootstrap, Config::load)
}

fn init_logging(verbose: bool, config: &Config) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config(std::io::stderr)?;
    if let Some(socket) = args.socket {
        config.socket_path = Some(socket);
    }
    if let Some(engine) = args.engine {
        config.engine = engine.to_lowercase();
    }

    config.validate()?;
    init_logging(args.verbose, &config);

    match args.command {
        Command::Serve => serve(config).await,
        Command::Ask {
            text,
            action,
            target_lang,
        } => ask(&config, &text, action.as_deref(), target_lang.as_deref()).await,
        Command::Send {
            text,
            action,
            target_lang,
        } => {
            let client = IpcClient::new(ipc::socket_path(&config));
            let response = client.assist(&text, action.as_deref(), target_lang.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Command::Status => {
            let client = IpcClient::new(ipc::socket_path(&config));
            let response = client.status()?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    info!("🌐 PolyAssist v{} starting...", env!("CARGO_PKG_VERSION"));

    let orchestrator = Arc::new(Orchestrator::from_config(&config));
    let server = IpcServer::new(orchestrator, ServerSettings::from_config(&config));

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
        info!("🛑 Shutdown requested");
    };

    info!("✅ PolyAssist ready");
    server.run(shutdown).await
}

async fn ask(
    config: &Config,
    text: &str,
    action: Option<&str>,
    target_lang: Option<&str>,
) -> Result<()> {
    let content = ipc::validate_content(text, None)?;
    let meta = ipc::build_metadata(action, target_lang, None, &config.default_target_lang)?;

    let orchestrator = Orchestrator::from_config(config);
    let result = orchestrator.handle(&content, &meta).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_corrupt_config_warning_is_emitted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ broken").unwrap();
        std::env::set_var("POLYASSIST_CONFIG", &path);
        std::env::remove_var("POLYASSIST_ENGINE");

        let captured = Captured::default();
        let config = load_config(captured.clone()).unwrap();
        std::env::remove_var("POLYASSIST_CONFIG");

        assert_eq!(config.engine, "ollama");
        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Config file corrupted"), "got: {}", output);
    }
}
