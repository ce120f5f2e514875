//! RepCoach application binary - composition root.
//!
//! 1. Parse CLI args and load configuration from TOML
//! 2. Initialize tracing
//! 3. Run the selected command: interactive chat, one-shot ask, or the
//!    catalog/image service

mod cli;
mod repl;

use std::sync::Arc;

use clap::Parser;
use tokio::io::BufReader;

use repcoach_api::AppState;
use repcoach_chat::{HttpCatalogClient, HttpMediaClient, OpenAiRecommender, Orchestrator};
use repcoach_core::config::RepcoachConfig;

use cli::{CliArgs, Command};

/// Load the catalog and wire up the HTTP-backed collaborators.
async fn start_session(config: &RepcoachConfig) -> Result<Orchestrator, Box<dyn std::error::Error>> {
    let recommender = OpenAiRecommender::from_env(&config.generation)?;
    if std::env::var(&config.generation.api_key_env).is_err() {
        tracing::warn!(
            env = %config.generation.api_key_env,
            "No API key set; generation requests will be unauthenticated"
        );
    }
    tracing::info!(model = recommender.model(), "Generation client ready");

    let catalog_source = HttpCatalogClient::new(&config.catalog)?;
    let orchestrator = Orchestrator::start(
        config,
        &catalog_source,
        Arc::new(recommender),
        Arc::new(HttpMediaClient::new()),
    )
    .await?;
    Ok(orchestrator)
}

/// Start a session or exit non-zero; no question is accepted without a catalog.
async fn start_session_or_exit(config: &RepcoachConfig) -> Orchestrator {
    match start_session(config).await {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start chat session");
            eprintln!("Cannot start chat session: {}", e);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config first so its log level can seed the filter.
    let config_file = args.resolve_config_path();
    let (mut config, load_error) = if config_file.exists() {
        match RepcoachConfig::load(&config_file) {
            Ok(config) => (config, None),
            Err(e) => (RepcoachConfig::default(), Some(e)),
        }
    } else {
        (RepcoachConfig::default(), None)
    };
    args.apply_overrides(&mut config);

    // Tracing. Logs go to stderr so they never interleave with chat output.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting RepCoach v{}", env!("CARGO_PKG_VERSION"));
    match load_error {
        Some(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Failed to load config, using defaults"
        ),
        None => tracing::info!(path = %config_file.display(), "Configuration resolved"),
    }
    config.validate()?;

    match args.command() {
        Command::Chat => {
            let mut orchestrator = start_session_or_exit(&config).await;
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            repl::run(&mut orchestrator, stdin, &mut stdout).await?;
        }
        Command::Ask { question } => {
            let mut orchestrator = start_session_or_exit(&config).await;
            let outcome = orchestrator.handle_turn(&question.join(" ")).await?;
            repl::print_outcome(&mut std::io::stdout(), &outcome)?;
        }
        Command::Serve { .. } => {
            let state = AppState::from_config(&config.server);
            repcoach_api::start_server(&config.server, state).await?;
        }
    }

    Ok(())
}
