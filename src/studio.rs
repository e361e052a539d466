//! Composition root: workflow + capture
//!
//! `Studio` is the injectable session-state object the rest of the program
//! works against. It couples the two state machines at exactly two points:
//! the Recording→Completed gate reads the capture state, and a confirmed
//! restart discards the capture session along with the draft.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::capture::{
    export_file_name, AudioBackend, AudioBackendConfig, CaptureSessionManager, RecordingHandle,
};
use crate::generation::{GenerationError, ScriptGenerator};
use crate::store::StateStore;
use crate::workflow::{PodcastDraft, WorkflowController, WorkflowStep};

/// One user's guided session: the persisted workflow plus the transient
/// capture session.
pub struct Studio<S: StateStore> {
    workflow: WorkflowController<S>,
    capture: CaptureSessionManager,
}

impl<S: StateStore> Studio<S> {
    /// Restore the workflow from the store and pair it with a fresh capture
    /// session. Recording state is never persisted, so every load starts Idle.
    pub fn new(
        store: S,
        backend: Box<dyn AudioBackend>,
        audio: AudioBackendConfig,
    ) -> Result<Self> {
        Ok(Self {
            workflow: WorkflowController::load(store)?,
            capture: CaptureSessionManager::new(backend, audio),
        })
    }

    pub fn step(&self) -> WorkflowStep {
        self.workflow.step()
    }

    pub fn draft(&self) -> &PodcastDraft {
        self.workflow.draft()
    }

    pub fn capture(&self) -> &CaptureSessionManager {
        &self.capture
    }

    pub fn capture_mut(&mut self) -> &mut CaptureSessionManager {
        &mut self.capture
    }

    /// Whether the forward transition out of the current step is permitted.
    pub fn can_advance(&self) -> bool {
        self.workflow.can_advance(self.capture.is_recorded())
    }

    /// Move forward one step; a failed gate is a no-op returning false.
    pub fn advance(&mut self) -> Result<bool> {
        self.workflow.advance(self.capture.is_recorded())
    }

    /// Move back one step where backward navigation is offered. The finished
    /// recording, if any, is kept; going back does not discard a take.
    pub fn retreat(&mut self) -> Result<bool> {
        self.workflow.retreat()
    }

    pub fn update_draft(&mut self, mutate: impl FnOnce(&mut PodcastDraft)) -> Result<()> {
        self.workflow.update_draft(mutate)
    }

    /// Start over, gated on explicit confirmation.
    ///
    /// Releases any held recording (exactly once), resets the draft to empty
    /// and returns to Introduction. Without confirmation nothing changes.
    pub async fn restart(&mut self, confirmed: bool) -> Result<bool> {
        if !confirmed {
            info!("restart not confirmed, keeping session");
            return Ok(false);
        }
        self.capture.reset().await;
        self.workflow.restart()?;
        Ok(true)
    }

    /// Fetch a script from the generation boundary and store it in the draft.
    ///
    /// One request, no retry; on failure the draft script is left unchanged
    /// and the error is returned for the caller to present.
    pub async fn generate_script(
        &mut self,
        generator: &dyn ScriptGenerator,
    ) -> Result<(), GenerationError> {
        let draft = self.workflow.draft();
        let script = generator
            .generate(&draft.topic, &draft.key_points)
            .await?;
        self.workflow
            .update_draft(|d| d.script = script)
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;
        Ok(())
    }

    /// The finished recording as a downloadable artifact, if one exists.
    pub fn export(&self) -> Option<ExportArtifact<'_>> {
        let handle = self.capture.export()?;
        Some(ExportArtifact {
            file_name: format!("{}.wav", export_file_name(&self.workflow.draft().topic)),
            handle,
        })
    }
}

/// Borrowed view of the finished recording, ready to be written out.
///
/// Lifetime is bounded by the owning capture session, so an artifact can never
/// outlive a `reset()`.
pub struct ExportArtifact<'a> {
    pub file_name: String,
    pub handle: &'a RecordingHandle,
}

impl ExportArtifact<'_> {
    /// Write the WAV bytes under `dir` using the suggested file name.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).with_context(|| format!("creating export dir {:?}", dir))?;
        let path = dir.join(&self.file_name);
        fs::write(&path, self.handle.wav_bytes())
            .with_context(|| format!("writing export {:?}", path))?;
        info!("exported recording to {:?}", path);
        Ok(path)
    }
}
