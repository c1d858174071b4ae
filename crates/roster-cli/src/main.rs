//! `roster`: terminal admin panel for the employee directory.
//!
//! # Usage
//!
//! ```
//! roster --url http://localhost:5280
//! roster --config ~/.config/roster/config.toml --log-file /tmp/roster.log
//! ```

mod app;
mod client;
mod ui;

use std::{fs::File, io, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use client::{ApiConfig, HttpStore};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use roster_core::{EmployeeRepository, repository::DEFAULT_COLLECTION};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, filter::Builder};

const DEFAULT_URL: &str = "http://localhost:5280";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "roster", about = "Terminal admin panel for the employee directory")]
struct Args {
  /// Path to a TOML config file (url, collection).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the roster server (default: http://localhost:5280).
  #[arg(long, env = "ROSTER_URL")]
  url: Option<String>,

  /// Collection holding employee records (default: employees).
  #[arg(long, env = "ROSTER_COLLECTION")]
  collection: Option<String>,

  /// Write logs to this file. The terminal is owned by the UI, so logging
  /// is off unless this is set.
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:        String,
  #[serde(default)]
  collection: String,
}

// ─── Logging ──────────────────────────────────────────────────────────────────

/// `RUST_LOG` wins; INFO when it names no level.
fn log_filter() -> Builder { EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()) }

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(path) = &args.log_file {
    let file = File::create(path)
      .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
      .with_env_filter(log_filter().from_env_lossy())
      .with_ansi(false)
      .with_writer(Arc::new(file))
      .init();
  }

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
  };
  let collection = args
    .collection
    .or_else(|| (!file_cfg.collection.is_empty()).then(|| file_cfg.collection.clone()))
    .unwrap_or_else(|| DEFAULT_COLLECTION.to_string());

  tracing::info!(url = %api_config.base_url, %collection, "starting roster");

  let store = HttpStore::new(api_config)?;
  let repo = EmployeeRepository::with_collection(Arc::new(store), collection);
  let mut app = App::new(repo);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Load initial data. Failure shows as a notice, not an exit.
  app.load().await;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<HttpStore>,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event {
      if !app.handle_key(key).await {
        break;
      }
    }
  }

  Ok(())
}
