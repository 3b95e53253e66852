//! # Main Entry Point
//!
//! Loads configuration, sets up logging and runs either the HTTP planner
//! (`serve`, the default) or a single plan from the command line (`plan`).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use voxplan::domain::config::{AppConfig, LoggingConfig, PlanningMode};
use voxplan::infrastructure::http;
use voxplan::infrastructure::llm::Client as LlmClient;
use voxplan::strings::logs;
use voxplan::{PlanRequest, Planner, PlannerConfig};

const DEFAULT_FILTER: &str = "info,hyper=warn,reqwest=warn";

#[derive(Debug, Parser)]
#[command(name = "voxplan", version, about = "Voice transcript to input-automation planner")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, global = true, default_value = "data/config.yaml")]
    config: PathBuf,

    /// Override the planning mode from the configuration
    #[arg(long, global = true, value_enum)]
    mode: Option<PlanningMode>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP planner
    Serve {
        /// Address to bind, e.g. 127.0.0.1:5005
        #[arg(long)]
        bind: Option<String>,
    },
    /// Plan a single transcript and print the plan as JSON
    Plan {
        transcript: String,
        /// Name of the foreground process
        #[arg(long)]
        process: Option<String>,
        /// Title of the foreground window
        #[arg(long)]
        window: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load Configuration
    let mut config = AppConfig::load(&cli.config)?;
    if let Some(mode) = cli.mode {
        config.planner.mode = mode;
    }

    // 2. Logging Setup
    // `plan` prints JSON on stdout, so its logs go to stderr
    let to_stderr = matches!(cli.command, Some(Command::Plan { .. }));
    let _guard = init_logging(&config.logging, to_stderr)?;
    tracing::info!("{}", logs::config_loaded(&cli.config.display().to_string()));

    // 3. Backend + Planner
    let client = LlmClient::new(&config.backend).context("Failed to configure backend")?;
    tracing::info!(
        "{}",
        logs::backend_ready(client.provider().as_str(), client.model(), client.endpoint())
    );
    let planner = Arc::new(Planner::new(Arc::new(client), PlannerConfig::from(&config)));
    tracing::info!("Planning mode: {:?}", planner.mode());

    // 4. Run
    match cli.command {
        Some(Command::Plan {
            transcript,
            process,
            window,
        }) => {
            let request = PlanRequest {
                active_process_name: process,
                active_window_title: window,
                ..PlanRequest::new(transcript)
            };
            let plan = planner.plan(&request).await;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Some(Command::Serve { bind }) => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            http::serve(planner, &bind).await?;
        }
        None => {
            http::serve(planner, &config.server.bind).await?;
        }
    }

    Ok(())
}

/// Install the global subscriber. The returned guard flushes the file writer on drop.
fn init_logging(
    config: &LoggingConfig,
    to_stderr: bool,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(config.filter.as_deref().unwrap_or(DEFAULT_FILTER))
    });

    // Layer for file (only when configured)
    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let path = Path::new(path);
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let file_name = path
                .file_name()
                .with_context(|| format!("Log path {} has no file name", path.display()))?;

            let file_appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let stdout_layer = (!to_stderr).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stdout));
    let stderr_layer = to_stderr.then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .with(stderr_layer)
        .init();

    Ok(guard)
}
