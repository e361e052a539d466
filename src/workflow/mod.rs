//! Step workflow state machine
//!
//! This module owns the guided five-step workflow:
//! - `WorkflowStep`: the ordered step enumeration
//! - `PodcastDraft`: the persisted topic / key points / script record
//! - `gates`: explicit, UI-independent forward-transition preconditions
//! - `WorkflowController`: step cursor + draft, persisted through a store

mod controller;
mod draft;
pub mod gates;
mod step;

pub use controller::{WorkflowController, DRAFT_KEY, STEP_KEY};
pub use draft::PodcastDraft;
pub use step::WorkflowStep;
