//! Script generation boundary
//!
//! The core treats script generation as a single opaque async operation: one
//! request, one response, no automatic retry. On failure the draft script is
//! left untouched so the user can retry or type the script by hand.

mod openai;

use thiserror::Error;

pub use openai::OpenAiScriptGenerator;

/// Errors surfaced by the script-generation boundary.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("the script service API key is not configured on the server")]
    MissingCredentials,
    #[error("topic and key points are required")]
    InvalidInput,
    #[error("the script service returned an empty response")]
    EmptyResponse,
    #[error("script generation failed: {0}")]
    Upstream(String),
}

/// Upstream model that writes a podcast script from a topic and key points.
#[async_trait::async_trait]
pub trait ScriptGenerator: Send + Sync {
    async fn generate(&self, topic: &str, key_points: &str) -> Result<String, GenerationError>;
}
