mod config;
mod encoding;
mod engine;
mod errors;
mod extraction;
mod features;
mod models;
mod routes;
mod scoring;
mod sources;
mod state;
mod taxonomy;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::engine::{train_engine, PredictionEngine, TrainingTable};
use crate::extraction::document::DocumentExtractor;
use crate::extraction::handlers::AssessmentResponse;
use crate::extraction::profile::ProfileExtractor;
use crate::extraction::questions::QuestionBank;
use crate::extraction::quiz::{run_assessment, ConsoleAnswers, RngSampler};
use crate::routes::build_router;
use crate::sources::{GithubClient, PdfTextExtractor};
use crate::state::AppState;
use crate::taxonomy::default_taxonomy;
use crate::taxonomy::patterns::PatternTable;

#[derive(Parser)]
#[command(name = "careerpath")]
#[command(about = "Career readiness feature extraction and role prediction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve,
    /// Take the skills assessment in the terminal and print the result as JSON
    Assess,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Initialize structured logging. Logs go to stderr so `assess` output stays clean JSON.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Assess => assess(),
    }
}

/// Runs an interactive assessment over stdin/stdout.
fn assess() -> Result<()> {
    let bank = QuestionBank::standard();
    let mut sampler = RngSampler::new(rand::thread_rng());
    let stdin = std::io::stdin();
    let mut answers = ConsoleAnswers::new(stdin.lock(), std::io::stdout());

    let result = run_assessment(&bank, &mut sampler, &mut answers)?;
    let response = AssessmentResponse {
        features: result.features(),
        result,
    };
    println!("\n{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting careerpath v{}", env!("CARGO_PKG_VERSION"));

    let taxonomy = Arc::new(default_taxonomy());
    info!("Keyword taxonomy loaded ({} categories)", taxonomy.categories().len());
    let patterns = Arc::new(PatternTable::resume()?);

    let profile_source = Arc::new(GithubClient::new(
        config.github_api_url.clone(),
        config.github_token.clone(),
    ));
    info!(
        "Profile source: {} ({})",
        config.github_api_url,
        if config.github_token.is_some() { "authenticated" } else { "anonymous" }
    );

    let engine = load_engine(&config).await?;

    let state = AppState {
        profile_source,
        text_extractor: Arc::new(PdfTextExtractor),
        profile_extractor: Arc::new(ProfileExtractor::new(taxonomy.clone())),
        taxonomy,
        document_extractor: Arc::new(DocumentExtractor::new(patterns)),
        question_bank: Arc::new(QuestionBank::standard()),
        engine,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Loads the training table and fits the configured engine on the blocking pool.
/// Without `TRAINING_DATA_PATH` the service runs untrained.
async fn load_engine(config: &Config) -> Result<Option<Arc<dyn PredictionEngine>>> {
    let Some(path) = config.training_data_path.clone() else {
        warn!("TRAINING_DATA_PATH not set; /api/v1/predict will return 503");
        return Ok(None);
    };
    let kind = config.model_engine;

    let engine = tokio::task::spawn_blocking(move || {
        let table = TrainingTable::from_path(&path)?;
        train_engine(kind, &table)
    })
    .await
    .map_err(|e| anyhow!("spawn_blocking failed in engine training: {e}"))??;

    Ok(Some(engine))
}
