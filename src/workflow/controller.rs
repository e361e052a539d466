use anyhow::{Context, Result};
use tracing::{info, warn};

use super::draft::PodcastDraft;
use super::gates;
use super::step::WorkflowStep;
use crate::store::StateStore;

/// Store key holding the serialized current step.
pub const STEP_KEY: &str = "podcast-step";
/// Store key holding the serialized draft.
pub const DRAFT_KEY: &str = "podcast-data";

/// Owns the current step and the accumulated draft, and enforces step
/// ordering and advancement gating.
///
/// Every mutation is persisted through the store before it returns, so the
/// step cursor and the draft survive a reload together. The capture session is
/// deliberately not persisted; a fresh load always starts with no recording.
pub struct WorkflowController<S: StateStore> {
    step: WorkflowStep,
    draft: PodcastDraft,
    store: S,
}

impl<S: StateStore> WorkflowController<S> {
    /// Restore workflow state from the store.
    ///
    /// Storage anomalies are recovered locally: an unknown persisted step falls
    /// back to Introduction, and a legacy draft shape is normalized and
    /// rewritten. Neither is surfaced as an error.
    pub fn load(mut store: S) -> Result<Self> {
        let step = match store.get(STEP_KEY)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|_| {
                warn!("persisted step {:?} not recognized, falling back to introduction", raw);
                WorkflowStep::Introduction
            }),
            None => WorkflowStep::Introduction,
        };

        let draft = match store.get(DRAFT_KEY)? {
            Some(raw) => {
                let (draft, rewrite) = PodcastDraft::from_stored(&raw);
                if rewrite {
                    store.set(
                        DRAFT_KEY,
                        &serde_json::to_string(&draft).context("serializing draft")?,
                    )?;
                }
                draft
            }
            None => PodcastDraft::default(),
        };

        info!("workflow restored at step {}", step);
        Ok(Self { step, draft, store })
    }

    pub fn step(&self) -> WorkflowStep {
        self.step
    }

    pub fn draft(&self) -> &PodcastDraft {
        &self.draft
    }

    /// Whether `advance()` would move forward right now.
    pub fn can_advance(&self, recording_ready: bool) -> bool {
        self.step.next().is_some() && gates::can_leave(self.step, &self.draft, recording_ready)
    }

    /// Move to the next step if the gate of the step being left holds.
    ///
    /// Returns whether a transition happened; a failed gate is a no-op.
    pub fn advance(&mut self, recording_ready: bool) -> Result<bool> {
        if !self.can_advance(recording_ready) {
            return Ok(false);
        }
        // can_advance already proved next() is Some
        let next = match self.step.next() {
            Some(next) => next,
            None => return Ok(false),
        };
        self.transition(next)?;
        Ok(true)
    }

    /// Move to the previous step. Unconditional, but only offered from Script
    /// and Recording.
    pub fn retreat(&mut self) -> Result<bool> {
        if !self.step.offers_retreat() {
            return Ok(false);
        }
        let previous = match self.step.previous() {
            Some(previous) => previous,
            None => return Ok(false),
        };
        self.transition(previous)?;
        Ok(true)
    }

    /// Apply a field-level update to the draft and persist it.
    pub fn update_draft(&mut self, mutate: impl FnOnce(&mut PodcastDraft)) -> Result<()> {
        mutate(&mut self.draft);
        self.persist_draft()
    }

    /// Reset the draft to all-empty fields and return to Introduction.
    ///
    /// The confirmation gate and the discard of any capture session live in
    /// the composition root; this only resets what the controller owns.
    pub fn restart(&mut self) -> Result<()> {
        info!("restarting workflow from step {}", self.step);
        self.draft = PodcastDraft::default();
        self.persist_draft()?;
        self.transition(WorkflowStep::Introduction)
    }

    fn transition(&mut self, to: WorkflowStep) -> Result<()> {
        info!("workflow step {} -> {}", self.step, to);
        self.step = to;
        self.store.set(
            STEP_KEY,
            &serde_json::to_string(&self.step).context("serializing step")?,
        )
    }

    fn persist_draft(&mut self) -> Result<()> {
        self.store.set(
            DRAFT_KEY,
            &serde_json::to_string(&self.draft).context("serializing draft")?,
        )
    }
}
