//! Audio capture session lifecycle
//!
//! A single recording attempt moves Idle → Recording → Recorded. The backend
//! trait abstracts the device (cpal microphone in production, a synthetic
//! generator in tests); the session manager owns the state machine and the
//! finalized recording handle, and is responsible for releasing it exactly
//! once.

mod backend;
mod handle;
mod microphone;
mod session;
mod synthetic;

pub use backend::{
    AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioFrame, AudioSource, CaptureError,
};
pub use handle::{export_file_name, RecordingHandle};
pub use microphone::MicrophoneBackend;
pub use session::{CaptureSessionManager, CaptureState};
pub use synthetic::SyntheticBackend;
