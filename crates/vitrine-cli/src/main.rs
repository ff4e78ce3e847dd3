//! Vitrine - terminal storefront page
//!
//! Drives the vitrine-core coordination layer with real terminal input:
//! - A quick actions reel that forces the page into reel mode while shown
//! - A product list whose scrolling hides and shows the bottom navigation
//! - Responsive pagination: page numbers on wide terminals, load more on narrow

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use vitrine_core::{
    paths, Capabilities, FileSessionStorage, SessionStorage, UnavailableStorage, VitrineConfig,
};

mod tui;

/// Vitrine - Terminal Storefront
#[derive(Parser)]
#[command(name = "vitrine")]
#[command(about = "Terminal storefront driven by the Vitrine scroll layer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to ~/.vitrine/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Session id for hint flags (defaults to a fresh session)
    #[arg(short, long)]
    session: Option<String>,

    /// Pretend the viewport is this many pixels wide
    #[arg(long)]
    viewport_width: Option<f64>,

    /// Run without session storage, as in private browsing
    #[arg(long)]
    private: bool,

    /// Run without intersection observation
    #[arg(long)]
    no_observer: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the storefront page
    Browse,

    /// Print the effective configuration
    Config,

    /// Forget hint dismissals for a session
    ResetHints {
        /// Session id
        session: String,
    },
}

/// Restore terminal state - called on panic or unexpected exit
fn restore_terminal() {
    use crossterm::{
        event::DisableMouseCapture,
        execute,
        terminal::{disable_raw_mode, LeaveAlternateScreen},
    };
    let _ = disable_raw_mode();
    let _ = execute!(std::io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

/// Log to a file, never to the terminal the TUI owns
fn init_logging() {
    let log_dir = paths::logs_dir();
    std::fs::create_dir_all(&log_dir).ok();

    let writer = match std::fs::File::create(log_dir.join("vitrine.log")) {
        Ok(file) => BoxMakeWriter::new(std::sync::Mutex::new(file)),
        Err(_) => BoxMakeWriter::new(std::io::sink),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<VitrineConfig> {
    let config = match path {
        Some(path) => VitrineConfig::load(path),
        None => VitrineConfig::load_default(),
    };
    config.context("Failed to load configuration")
}

/// Session storage for hint flags, degrading to none when it cannot be opened
fn open_session_storage(cli: &Cli) -> Arc<dyn SessionStorage> {
    if cli.private {
        return Arc::new(UnavailableStorage);
    }

    let session_id = cli
        .session
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    match FileSessionStorage::open(&paths::sessions_dir(), &session_id) {
        Ok(storage) => {
            tracing::info!(session = %session_id, "Session storage ready");
            Arc::new(storage)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session storage unavailable, hints will always show");
            Arc::new(UnavailableStorage)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Config) => {
            let config = load_config(cli.config.as_ref())?;
            print!("{}", toml::to_string_pretty(&config)?);
            return Ok(());
        }
        Some(Commands::ResetHints { session }) => {
            FileSessionStorage::open(&paths::sessions_dir(), session)?.end_session()?;
            println!("Hints reset for session {}", session);
            return Ok(());
        }
        Some(Commands::Browse) | None => {}
    }

    // Set up panic hook to restore terminal state
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    init_logging();

    let config = load_config(cli.config.as_ref())?;
    let capabilities = Capabilities {
        intersection_observer: !cli.no_observer,
        ..Capabilities::default()
    };
    let storage = open_session_storage(&cli);

    let mut app = tui::App::new(config, capabilities, storage, cli.viewport_width);
    app.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[pagination]\npage_increment = 25\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.pagination.page_increment, 25);
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[pagination]\nmax_page_buttons = 2\n").unwrap();

        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_private_mode_has_no_storage() {
        let cli = Cli::try_parse_from(["vitrine", "--private"]).unwrap();
        let storage = open_session_storage(&cli);
        assert!(storage.set("reelHintShown-scroll-quickActions", "true").is_err());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "vitrine",
            "--viewport-width",
            "375",
            "--no-observer",
            "reset-hints",
            "abc",
        ])
        .unwrap();
        assert_eq!(cli.viewport_width, Some(375.0));
        assert!(cli.no_observer);
        assert!(matches!(cli.command, Some(Commands::ResetHints { session }) if session == "abc"));
    }
}
