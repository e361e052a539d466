//! Forward-transition preconditions.
//!
//! Gates are pure functions over the draft (plus the capture state for the
//! recording step) so they can be evaluated and tested without any interaction
//! surface. A failed gate disables the transition; it is never an error.

use super::draft::PodcastDraft;
use super::step::WorkflowStep;

/// Minimum trimmed topic length is one more than this.
const TOPIC_THRESHOLD: usize = 5;
/// Minimum trimmed key-points length is one more than this.
const KEY_POINTS_THRESHOLD: usize = 10;
/// Minimum trimmed script length.
const SCRIPT_MIN_CHARS: usize = 50;

/// Gate for leaving the Topic step: both the topic and the key points must
/// have enough substance to generate a script from.
pub fn topic_ready(draft: &PodcastDraft) -> bool {
    draft.topic.trim().chars().count() > TOPIC_THRESHOLD
        && draft.key_points.trim().chars().count() > KEY_POINTS_THRESHOLD
}

/// Gate for leaving the Script step: the script must be long enough to be
/// worth recording.
pub fn script_ready(draft: &PodcastDraft) -> bool {
    draft.script.trim().chars().count() >= SCRIPT_MIN_CHARS
}

/// Whether a forward transition out of `step` is permitted.
///
/// `recording_ready` is the capture session's contribution: true iff a
/// finalized recording exists.
pub fn can_leave(step: WorkflowStep, draft: &PodcastDraft, recording_ready: bool) -> bool {
    match step {
        WorkflowStep::Introduction => true,
        WorkflowStep::Topic => topic_ready(draft),
        WorkflowStep::Script => script_ready(draft),
        WorkflowStep::Recording => recording_ready,
        WorkflowStep::Completed => false,
    }
}
