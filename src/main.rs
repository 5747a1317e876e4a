//! # Main Entry Point
//!
//! Wires the console together:
//! - Domain: configuration, catalog, roster and types
//! - Infrastructure: LLM providers, virtual filesystem, persistence
//! - Application: state, router, tasks, planner, executor, scheduler
//! - Interface: command handlers and the terminal console
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};

use crate::application::router::CommandRouter;
use crate::application::scheduler;
use crate::application::state::{AppContext, AppState, ConsoleLog, welcome};
use crate::application::tasks::TaskRegistry;
use crate::domain::config::{AppConfig, expand_path};
use crate::domain::traits::{ContainerProvider, Store};
use crate::infrastructure::llm::providers::ProviderConfig;
use crate::infrastructure::llm::{GeminiGateway, OpenAiService, Provider};
use crate::infrastructure::store::{JsonStore, MemoryStore};
use crate::interface::console::{self, StdinPrompter};

#[derive(Parser, Debug)]
#[command(name = "cassa-console", about = "Multi-agent AI command console")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(long, default_value = "data/config.yaml")]
    config: PathBuf,

    /// Overrides `system.data_dir`
    #[arg(long)]
    data_dir: Option<String>,

    /// Use the in-memory filesystem regardless of configuration
    #[arg(long)]
    memory_fs: bool,

    /// Keep nothing between sessions
    #[arg(long)]
    ephemeral: bool,

    /// Mirror log output to stderr
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load Configuration
    let mut config = AppConfig::load(&args.config)?;
    if let Some(dir) = &args.data_dir {
        config.system.data_dir = dir.clone();
    }
    let data_dir = expand_path(&config.system.data_dir);

    // 2. Logging Setup
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    // Clear previous session log
    let log_path = data_dir.join("session.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(&data_dir, "session.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,hyper=warn,reqwest=warn"));

    // Layer for file (Always active)
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);

    use tracing_subscriber::fmt::writer::MakeWriterExt;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    // stdout belongs to the console, logs go to stderr
    let stderr_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr.with_max_level(stderr_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::info!("Starting CASSA VEGAS console...");

    // 3. Initialize Infrastructure
    let llm = Arc::new(GeminiGateway::new(config.providers.gemini.clone()));
    let openai = Arc::new(OpenAiService::new(config.providers.openai.clone()));
    let fs = infrastructure::fs::boot(&config.system, args.memory_fs).await;
    let store: Arc<dyn Store> = if args.ephemeral {
        tracing::info!("Ephemeral session, nothing will be persisted");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(JsonStore::new(&data_dir).await?)
    };

    let registry = TaskRegistry::with_defaults();
    registry.validate()?;

    // 4. Initialize Application Components
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let printer = console::spawn_printer(event_rx);
    let prompter = StdinPrompter::new();
    let mock_fs = fs.is_mock();

    let ctx = AppContext {
        state: Arc::new(Mutex::new(AppState::new(&config, ConsoleLog::with_listener(event_tx)))),
        llm,
        openai: openai.clone(),
        fs,
        store,
        prompter: Arc::new(prompter.clone()),
        config: Arc::new(config),
        registry: Arc::new(registry),
    };
    ctx.hydrate().await;
    welcome(&mut *ctx.state.lock().await, mock_fs);

    // Saved key first, then whatever the config provides.
    let saved_key = ctx.state.lock().await.settings.openai_api_key.clone();
    let startup_key = saved_key.or_else(|| {
        ProviderConfig::from_settings(Provider::OpenAI, &ctx.config.providers.openai)
            .ok()
            .map(|c| c.api_key)
    });
    if let Some(key) = startup_key {
        tokio::spawn(async move {
            if !openai.initialize(&key).await {
                tracing::warn!("Startup OpenAI key was rejected");
            }
        });
    }

    // 5. Run
    let (command_tx, mut command_rx) = mpsc::unbounded_channel::<String>();
    let _reader = console::spawn_reader(prompter, command_tx);
    let ticker = scheduler::spawn(ctx.clone());
    let router = CommandRouter::new(ctx);

    while let Some(line) = command_rx.recv().await {
        if let Err(e) = router.route(&line, false).await {
            tracing::error!("Command '{}' failed: {:#}", line, e);
            router.context().system(format!("Error: {}", e)).await;
        }
    }

    tracing::info!("Shutting down");
    ticker.abort();
    drop(router);
    // Let the printer flush what is already queued.
    let _ = tokio::time::timeout(Duration::from_millis(200), printer).await;
    Ok(())
}
