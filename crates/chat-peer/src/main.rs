//! chat-peer: two-party terminal chat over a single TCP connection.
//!
//! One process listens, the other dials.  Once connected, each side types
//! lines that appear on the other side as `Peer: <text>`.  Typing `exit` or
//! `quit` (any case) ends the chat for both.
//!
//! # Usage
//!
//! ```text
//! chat-peer --listen 0.0.0.0:9000
//! chat-peer --connect 192.168.1.20:9000
//! chat-peer --ci                      # liveness endpoint only
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable           | Flag            | Description                     |
//! |--------------------|-----------------|---------------------------------|
//! | `CHAT_LISTEN`      | `--listen`      | Address to accept one peer on   |
//! | `CHAT_CONNECT`     | `--connect`     | Peer address to dial            |
//! | `CHAT_HEALTH_ADDR` | `--health-addr` | Liveness bind address (CI mode) |
//! | `CHAT_CONFIG`      | `--config`      | Optional TOML config file       |
//!
//! # Exit codes
//!
//! `0` after any chat session, however it ended, and after a CI-mode
//! shutdown.  `1` when the mode is missing or ambiguous, the config file is
//! unusable, or the connection could not be established.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use chat_peer::application::{run_session, ChatDisplay};
use chat_peer::domain::{ChatConfig, Mode};
use chat_peer::infrastructure::console::{ChannelInput, StdoutDisplay};
use chat_peer::infrastructure::health::{bind_health, serve_health};
use chat_peer::infrastructure::network::{active_dial, passive_listen, PeerConnection};
use chat_peer::infrastructure::storage::config::load_config;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Peer-to-peer terminal chat.
#[derive(Debug, Parser)]
#[command(
    name = "chat-peer",
    about = "Two-party line chat over one TCP connection",
    version
)]
struct Cli {
    /// Accept exactly one peer on this address (e.g. `0.0.0.0:9000`).
    #[arg(long, env = "CHAT_LISTEN")]
    listen: Option<String>,

    /// Dial the peer at this address (e.g. `192.168.1.20:9000`).
    #[arg(long, env = "CHAT_CONNECT")]
    connect: Option<String>,

    /// Non-interactive mode: serve `GET /health` until Ctrl+C, no chat.
    #[arg(long)]
    ci: bool,

    /// Bind address of the liveness endpoint; overrides the config file.
    #[arg(long, env = "CHAT_HEALTH_ADDR")]
    health_addr: Option<SocketAddr>,

    /// Optional TOML config file.
    #[arg(long, env = "CHAT_CONFIG")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Builds the effective [`ChatConfig`]: defaults, then the file, then
    /// CLI overrides.
    fn resolve_config(&self) -> anyhow::Result<ChatConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => ChatConfig::default(),
        };

        if let Some(addr) = self.health_addr {
            config.health_addr = addr;
        }

        Ok(config)
    }
}

/// Installs the stderr log subscriber.  `RUST_LOG` wins over the config.
fn init_logging(config: &ChatConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", failure_line(&e));
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config);

    let mode = match Mode::resolve(cli.listen, cli.connect, cli.ci) {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(mode, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", failure_line(&e));
            ExitCode::FAILURE
        }
    }
}

/// The single stderr line reported for a fatal error.
///
/// Walks the cause chain but skips a cause whose text the previous message
/// already ends with, since most error types here embed their source.
fn failure_line(e: &anyhow::Error) -> String {
    let mut line = String::from("Error:");
    let mut previous = String::new();
    for cause in e.chain() {
        let message = cause.to_string();
        if !previous.ends_with(&message) {
            line.push(' ');
            line.push_str(&message);
            line.push(':');
        }
        previous = message;
    }
    line.pop();
    line
}

/// Runs the selected mode to completion.
async fn run(mode: Mode, config: ChatConfig) -> anyhow::Result<()> {
    let display: Arc<dyn ChatDisplay> = Arc::new(StdoutDisplay);

    match mode {
        Mode::Listen(address) => {
            let conn = passive_listen(&address, display.as_ref()).await?;
            chat(conn, display).await
        }
        Mode::Connect(address) => {
            let conn = active_dial(&address, display.as_ref()).await?;
            chat(conn, display).await
        }
        Mode::Ci => serve_until_interrupted(config.health_addr).await,
    }
}

/// Chats over `conn` until either side ends the session.
async fn chat(conn: PeerConnection, display: Arc<dyn ChatDisplay>) -> anyhow::Result<()> {
    let input = ChannelInput::stdin().context("failed to start console input")?;
    let report = run_session(conn, input, display).await;
    info!(
        "session {} closed ({}) after {}",
        report.session_id, report.state, report.cause
    );
    Ok(())
}

/// CI mode: serves the liveness endpoint until Ctrl+C.
async fn serve_until_interrupted(addr: SocketAddr) -> anyhow::Result<()> {
    println!("Starting in CI Mode (Non-Interactive)...");

    let listener = bind_health(addr).await?;
    serve_health(listener, async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C; stopping health endpoint"),
            Err(e) => {
                error!("failed to listen for Ctrl+C signal: {e}");
                std::future::pending::<()>().await;
            }
        }
    })
    .await?;

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
