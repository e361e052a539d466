pub mod app;
pub mod capture;
pub mod config;
pub mod generation;
pub mod http;
pub mod store;
pub mod studio;
pub mod workflow;

pub use capture::{
    export_file_name, AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioFrame,
    AudioSource, CaptureError, CaptureSessionManager, CaptureState, RecordingHandle,
    SyntheticBackend,
};
pub use config::Config;
pub use generation::{GenerationError, OpenAiScriptGenerator, ScriptGenerator};
pub use http::{create_router, AppState};
pub use store::{JsonFileStore, MemoryStore, StateStore};
pub use studio::{ExportArtifact, Studio};
pub use workflow::{PodcastDraft, WorkflowController, WorkflowStep};
