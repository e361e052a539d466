use serde::{Deserialize, Serialize};

/// One stage of the fixed five-stage workflow.
///
/// The declaration order is the navigation order: forward movement goes to
/// `next()`, backward movement to `previous()`. There is no skipping; the only
/// non-adjacent transition in the system is a confirmed restart, which jumps
/// back to `Introduction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStep {
    Introduction,
    Topic,
    Script,
    Recording,
    Completed,
}

impl WorkflowStep {
    /// The step after this one, or `None` from `Completed`.
    pub fn next(self) -> Option<WorkflowStep> {
        match self {
            WorkflowStep::Introduction => Some(WorkflowStep::Topic),
            WorkflowStep::Topic => Some(WorkflowStep::Script),
            WorkflowStep::Script => Some(WorkflowStep::Recording),
            WorkflowStep::Recording => Some(WorkflowStep::Completed),
            WorkflowStep::Completed => None,
        }
    }

    /// The step before this one, or `None` from `Introduction`.
    pub fn previous(self) -> Option<WorkflowStep> {
        match self {
            WorkflowStep::Introduction => None,
            WorkflowStep::Topic => Some(WorkflowStep::Introduction),
            WorkflowStep::Script => Some(WorkflowStep::Topic),
            WorkflowStep::Recording => Some(WorkflowStep::Script),
            WorkflowStep::Completed => Some(WorkflowStep::Recording),
        }
    }

    /// Whether backward navigation is offered from this step.
    ///
    /// Introduction has nothing before it, Topic goes back to a purely
    /// informational page, and from Completed a restart is the only way back.
    pub fn offers_retreat(self) -> bool {
        matches!(self, WorkflowStep::Script | WorkflowStep::Recording)
    }

    /// Human-readable title used by the interactive session.
    pub fn title(self) -> &'static str {
        match self {
            WorkflowStep::Introduction => "Welcome",
            WorkflowStep::Topic => "Step 1: Define your topic",
            WorkflowStep::Script => "Step 2: Prepare your script",
            WorkflowStep::Recording => "Step 3: Record",
            WorkflowStep::Completed => "Done: your podcast is ready",
        }
    }
}

impl std::fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WorkflowStep::Introduction => "introduction",
            WorkflowStep::Topic => "topic",
            WorkflowStep::Script => "script",
            WorkflowStep::Recording => "recording",
            WorkflowStep::Completed => "completed",
        };
        f.write_str(name)
    }
}
