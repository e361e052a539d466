//! HTTP surface for the script-generation boundary
//!
//! - POST /api/generate-script - {topic, keyPoints} in, {script} out
//! - GET /health - Health check
//!
//! Failures answer with a JSON `{error}` body: 400 for missing input, 405 for
//! a wrong verb, 500 for upstream failures including missing credentials.

mod handlers;
mod routes;
mod state;

pub use handlers::{ErrorResponse, GenerateScriptRequest, GenerateScriptResponse};
pub use routes::create_router;
pub use state::AppState;
