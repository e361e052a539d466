use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use podcast_studio::app::App;
use podcast_studio::{
    create_router, AppState, AudioBackendConfig, AudioBackendFactory, AudioSource, Config,
    JsonFileStore, OpenAiScriptGenerator, ScriptGenerator, Studio,
};

#[derive(Debug, Parser)]
#[command(name = "podcast-studio", about = "Guided podcast creation studio")]
struct Cli {
    /// Configuration file (without extension)
    #[arg(long, default_value = "config/podcast-studio")]
    config: String,

    /// Directory where exported recordings are written
    #[arg(long, default_value = "exports")]
    export_dir: PathBuf,

    /// Use the synthetic audio backend instead of the microphone
    #[arg(long)]
    synthetic_audio: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;
    info!("{} starting", cfg.service.name);

    let generator: Arc<dyn ScriptGenerator> = Arc::new(OpenAiScriptGenerator::new(
        &cfg.generation.api_base,
        &cfg.generation.api_key,
        &cfg.generation.model,
    ));

    // Script-generation endpoint
    let router = create_router(AppState::new(generator.clone()));
    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("script generation endpoint listening on {}", addr);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!("HTTP server error: {}", e);
        }
    });

    let store = JsonFileStore::open(&cfg.storage.state_path)?;
    let audio = AudioBackendConfig {
        sample_rate: cfg.audio.sample_rate,
        channels: cfg.audio.channels,
        buffer_duration_ms: cfg.audio.buffer_duration_ms,
    };
    let source = if cli.synthetic_audio {
        AudioSource::Synthetic
    } else {
        AudioSource::Microphone
    };
    let backend = AudioBackendFactory::create(source, audio.clone());
    let studio = Studio::new(store, backend, audio)?;
    let app = App::new(studio, generator, cli.export_dir);

    // cpal streams are !Send, so the interactive session runs on a LocalSet
    let local = tokio::task::LocalSet::new();
    local.run_until(app.run()).await
}
