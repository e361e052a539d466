// End-to-end tests for the composed session
//
// Studio couples the workflow controller with the capture session manager,
// so these exercise the full guided path: topic, script, recording, export,
// restart. The generator is stubbed; no network or audio hardware involved.

use std::io::Cursor;
use std::sync::Arc;

use anyhow::Result;
use podcast_studio::{
    AudioBackendConfig, CaptureState, GenerationError, MemoryStore, ScriptGenerator, StateStore,
    Studio, SyntheticBackend, WorkflowStep,
};
use tempfile::TempDir;

struct CannedGenerator(String);

#[async_trait::async_trait]
impl ScriptGenerator for CannedGenerator {
    async fn generate(&self, _topic: &str, _key_points: &str) -> Result<String, GenerationError> {
        Ok(self.0.clone())
    }
}

struct FailingGenerator;

#[async_trait::async_trait]
impl ScriptGenerator for FailingGenerator {
    async fn generate(&self, _topic: &str, _key_points: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Upstream(
            "the service had a bad day".to_string(),
        ))
    }
}

fn studio_with(store: MemoryStore) -> Result<Studio<MemoryStore>> {
    let config = AudioBackendConfig::default();
    let backend = SyntheticBackend::with_frames(config.clone(), 10);
    Studio::new(store, Box::new(backend), config)
}

#[tokio::test]
async fn test_full_guided_path() -> Result<()> {
    let mut studio = studio_with(MemoryStore::new())?;
    assert_eq!(studio.step(), WorkflowStep::Introduction);

    // Introduction -> Topic is unconditional
    assert!(studio.advance()?);

    studio.update_draft(|d| {
        d.topic = "Social media and politics".to_string();
        d.key_points = "algorithms; misinformation risks".to_string();
    })?;
    assert!(studio.advance()?);
    assert_eq!(studio.step(), WorkflowStep::Script);

    let sixty_chars = "a".repeat(60);
    studio.update_draft(|d| d.script = sixty_chars)?;
    assert!(studio.advance()?);
    assert_eq!(studio.step(), WorkflowStep::Recording);

    // Cannot finish before a recording exists
    assert!(!studio.advance()?);

    studio.capture_mut().start().await?;
    studio.capture_mut().stop().await?;
    assert_eq!(studio.capture().state(), CaptureState::Recorded);

    assert!(studio.advance()?);
    assert_eq!(studio.step(), WorkflowStep::Completed);

    let artifact = studio.export().expect("a finished recording exists");
    assert_eq!(artifact.file_name, "social_media_and_politics.wav");
    assert!(!artifact.handle.wav_bytes().is_empty());

    // Restart erases everything and frees the recording exactly once
    assert!(studio.restart(true).await?);
    assert_eq!(studio.step(), WorkflowStep::Introduction);
    assert!(studio.draft().is_empty());
    assert!(studio.export().is_none());
    assert_eq!(studio.capture().outstanding_handles(), 0);
    Ok(())
}

#[tokio::test]
async fn test_short_topic_keeps_step() -> Result<()> {
    let mut studio = studio_with(MemoryStore::new())?;
    studio.advance()?;
    studio.update_draft(|d| {
        d.topic = "ab".to_string();
        d.key_points = "plenty of key points here".to_string();
    })?;

    assert!(!studio.advance()?);
    assert_eq!(studio.step(), WorkflowStep::Topic);
    Ok(())
}

#[tokio::test]
async fn test_unconfirmed_restart_changes_nothing() -> Result<()> {
    let mut studio = studio_with(MemoryStore::new())?;
    studio.advance()?;
    studio.update_draft(|d| d.topic = "Keep me around".to_string())?;

    assert!(!studio.restart(false).await?);
    assert_eq!(studio.step(), WorkflowStep::Topic);
    assert_eq!(studio.draft().topic, "Keep me around");
    Ok(())
}

#[tokio::test]
async fn test_restart_from_recording_releases_the_take() -> Result<()> {
    let mut studio = studio_with(MemoryStore::new())?;
    studio.advance()?;
    studio.update_draft(|d| {
        d.topic = "A fine topic".to_string();
        d.key_points = "some; key; points".to_string();
    })?;
    studio.advance()?;
    studio.update_draft(|d| d.script = "s".repeat(50))?;
    studio.advance()?;

    studio.capture_mut().start().await?;
    studio.capture_mut().stop().await?;
    assert_eq!(studio.capture().outstanding_handles(), 1);

    assert!(studio.restart(true).await?);
    assert_eq!(studio.capture().outstanding_handles(), 0);
    assert_eq!(studio.capture().state(), CaptureState::Idle);
    Ok(())
}

#[tokio::test]
async fn test_generated_script_lands_in_draft() -> Result<()> {
    let mut studio = studio_with(MemoryStore::new())?;
    studio.advance()?;
    studio.update_draft(|d| {
        d.topic = "Social media and politics".to_string();
        d.key_points = "algorithms; misinformation risks".to_string();
    })?;
    studio.advance()?;

    let generator = Arc::new(CannedGenerator("[INTRO] Welcome to the show.".to_string()));
    studio.generate_script(generator.as_ref()).await?;
    assert_eq!(studio.draft().script, "[INTRO] Welcome to the show.");
    Ok(())
}

#[tokio::test]
async fn test_failed_generation_leaves_draft_untouched() -> Result<()> {
    let store = MemoryStore::new();
    let mut studio = studio_with(store.clone())?;
    studio.advance()?;
    studio.update_draft(|d| {
        d.topic = "Social media and politics".to_string();
        d.key_points = "algorithms; misinformation risks".to_string();
    })?;
    studio.advance()?;
    studio.update_draft(|d| d.script = "my own words".to_string())?;

    let err = studio
        .generate_script(&FailingGenerator)
        .await
        .expect_err("generation should fail");
    assert!(matches!(err, GenerationError::Upstream(_)));

    // The draft and step are exactly as before
    assert_eq!(studio.draft().script, "my own words");
    assert_eq!(studio.step(), WorkflowStep::Script);

    // And nothing unexpected was persisted
    let stored = store.get("podcast-data")?.expect("draft is stored");
    assert!(stored.contains("my own words"));
    Ok(())
}

#[tokio::test]
async fn test_export_writes_a_readable_wav_file() -> Result<()> {
    let mut studio = studio_with(MemoryStore::new())?;
    studio.advance()?;
    studio.update_draft(|d| {
        d.topic = "Critical Thinking 101".to_string();
        d.key_points = "what it is; why it matters".to_string();
    })?;
    studio.advance()?;
    studio.update_draft(|d| d.script = "s".repeat(50))?;
    studio.advance()?;
    studio.capture_mut().start().await?;
    studio.capture_mut().stop().await?;
    studio.advance()?;

    let dir = TempDir::new()?;
    let path = {
        let artifact = studio.export().expect("recording exists");
        artifact.write_to_dir(dir.path())?
    };
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("critical_thinking_101.wav")
    );

    let bytes = std::fs::read(&path)?;
    let reader = hound::WavReader::new(Cursor::new(&bytes[..]))?;
    assert!(reader.len() > 0);
    Ok(())
}

#[tokio::test]
async fn test_reload_never_resumes_inside_a_recording() -> Result<()> {
    let store = MemoryStore::new();
    {
        let mut studio = studio_with(store.clone())?;
        studio.advance()?;
        studio.update_draft(|d| {
            d.topic = "A fine topic".to_string();
            d.key_points = "some; key; points".to_string();
        })?;
        studio.advance()?;
        studio.update_draft(|d| d.script = "s".repeat(50))?;
        studio.advance()?;
        studio.capture_mut().start().await?;
        // Simulate the process going away mid-recording: studio dropped here
    }

    let studio = studio_with(store)?;
    // The step cursor survived, the capture state did not
    assert_eq!(studio.step(), WorkflowStep::Recording);
    assert_eq!(studio.capture().state(), CaptureState::Idle);
    assert_eq!(studio.capture().outstanding_handles(), 0);
    Ok(())
}
