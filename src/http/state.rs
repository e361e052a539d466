use std::sync::Arc;

use crate::generation::ScriptGenerator;

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upstream script-generation boundary
    pub generator: Arc<dyn ScriptGenerator>,
}

impl AppState {
    pub fn new(generator: Arc<dyn ScriptGenerator>) -> Self {
        Self { generator }
    }
}
