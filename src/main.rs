// ABOUTME: Main entry point for the DocKit panels driver
// Reads panel commands from stdin and applies them to the session

use anyhow::Result;
use clap::Parser;
use dockit_panels::app::{App, EventHandler};
use dockit_panels::config::AppConfig;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Debug, Parser)]
#[command(name = "dockit-panels", version, about = "Manage DocKit search panels from the terminal")]
struct Cli {
    /// Config file (defaults to <config dir>/dockit/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Workspace directory panel files resolve against
    #[arg(short, long)]
    workspace: Option<PathBuf>,

    /// Session state file
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Start with only the home panel instead of restoring the last session
    #[arg(long)]
    fresh: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    if let Some(workspace) = cli.workspace {
        config.workspace_root = workspace;
    }
    if let Some(state_file) = cli.state_file {
        config.state_file = state_file;
    }

    let mut app = App::from_config(&config)?;
    if cli.fresh {
        app.init_fresh();
    } else {
        app.init().await;
    }

    run_repl(&mut app).await?;

    app.shutdown();
    Ok(())
}

async fn run_repl(app: &mut App) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout.write_all(app.state.render_panels().as_bytes()).await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let output = match EventHandler::handle_line(&line) {
            Ok(Some(event)) => EventHandler::process_event(event, &mut app.state).await,
            Ok(None) => String::new(),
            Err(e) => format!("{e}\n"),
        };
        stdout.write_all(output.as_bytes()).await?;

        if app.state.should_quit {
            break;
        }
    }

    Ok(())
}

fn setup_logging() {
    use std::fs::OpenOptions;
    use tracing_subscriber::prelude::*;

    let log_dir = AppConfig::data_dir().join("logs");
    let _ = std::fs::create_dir_all(&log_dir);

    let log_file = log_dir.join(format!(
        "dockit-panels-{}.log",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dockit_panels=info".into());

    match OpenOptions::new().create(true).append(true).open(&log_file) {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(std::sync::Mutex::new(file))
                        .with_ansi(false), // No ANSI colors in log file
                )
                .with(filter)
                .init();
        }
        Err(e) => {
            // Stdout belongs to the REPL, fall back to stderr
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
            tracing::warn!("Could not open log file {}: {}", log_file.display(), e);
        }
    }
}
