use std::{fs::OpenOptions, path::PathBuf, sync::Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::Console;
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod config;
mod controller;
mod headless;
mod ui;

use backend_bridge::runtime::{launch, BackendConfig};
use config::{load_settings, PacingMode};

const COMMAND_QUEUE_DEPTH: usize = 32;

/// Terminal-styled search client for the exam paper archive.
#[derive(Parser, Debug)]
#[command(name = "terminal-archives")]
struct Args {
    /// Archive server base URL.
    #[arg(long)]
    server_url: Option<String>,
    /// Skip the scripted delays.
    #[arg(long)]
    instant: bool,
    /// Read queries from stdin and print plain text instead of drawing a TUI.
    #[arg(long)]
    headless: bool,
    /// Print the admin panel URL instead of opening a browser.
    #[arg(long)]
    no_browser: bool,
    /// Where the TUI writes its logs.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Settings file to use instead of the per-user one.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.headless {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .init();
    } else {
        let path = args
            .log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("terminal-archives.log"));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open log file '{}'", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let mut settings = load_settings(args.config.clone());
    if let Some(url) = args.server_url {
        settings.server_url = url;
    }
    if args.instant {
        settings.pacing = PacingMode::Instant;
    }
    let use_browser = !args.no_browser;
    tracing::info!(server_url = %settings.server_url, pacing = ?settings.pacing, "starting terminal");

    if args.headless {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to build tokio runtime")?;
        return runtime.block_on(headless::run(
            &settings.server_url,
            settings.pacing.pacing(),
            use_browser,
        ));
    }

    let (console, console_rx) = Console::channel();
    let (cmd_tx, cmd_rx) = crossbeam_channel::bounded(COMMAND_QUEUE_DEPTH);
    // The worker is left to die with the process; it may be mid-delay.
    let _worker = launch(
        cmd_rx,
        console,
        BackendConfig {
            server_url: settings.server_url,
            pacing: settings.pacing.pacing(),
        },
    );
    ui::run(cmd_tx, console_rx, use_browser)
}
