//! Scripted walk through a full guided session, no hardware or network
//! required: in-memory persistence, synthetic audio, canned script generation.
//!
//! Run with: cargo run --example guided_session

use anyhow::Result;
use podcast_studio::{
    AudioBackendConfig, GenerationError, MemoryStore, ScriptGenerator, Studio, SyntheticBackend,
};

struct CannedGenerator;

#[async_trait::async_trait]
impl ScriptGenerator for CannedGenerator {
    async fn generate(&self, topic: &str, key_points: &str) -> Result<String, GenerationError> {
        Ok(format!(
            "[INTRO] Welcome! Today we take a hard look at {topic}. \
             [DEVELOPMENT] We will cover: {key_points}. \
             [OUTRO] What will you question next?"
        ))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let audio = AudioBackendConfig::default();
    let backend = Box::new(SyntheticBackend::new(audio.clone()));
    let mut studio = Studio::new(MemoryStore::new(), backend, audio)?;

    println!("step: {}", studio.step());
    studio.advance()?;

    studio.update_draft(|d| {
        d.topic = "Social media and politics".to_string();
        d.key_points = "algorithms; echo chambers; misinformation risks".to_string();
    })?;
    println!("step: {} (topic set)", studio.step());
    studio.advance()?;

    studio.generate_script(&CannedGenerator).await?;
    println!(
        "step: {} (script: {} chars)",
        studio.step(),
        studio.draft().script.len()
    );
    studio.advance()?;

    studio.capture_mut().start().await?;
    println!("capture: {}", studio.capture().state());
    studio.capture_mut().stop().await?;
    println!("capture: {}", studio.capture().state());
    studio.advance()?;
    println!("step: {}", studio.step());

    if let Some(artifact) = studio.export() {
        let path = artifact.write_to_dir(std::env::temp_dir().as_path())?;
        println!("exported {} ({} bytes)", path.display(), artifact.handle.wav_bytes().len());
    }

    studio.restart(true).await?;
    println!(
        "restarted: step {} / capture {} / outstanding handles {}",
        studio.step(),
        studio.capture().state(),
        studio.capture().outstanding_handles()
    );

    Ok(())
}
