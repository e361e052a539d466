use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use super::backend::{AudioBackend, AudioBackendConfig, AudioFrame, CaptureError};
use super::handle::RecordingHandle;

/// Observable capture session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Recording,
    Recorded,
}

impl std::fmt::Display for CaptureState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CaptureState::Idle => "idle",
            CaptureState::Recording => "recording",
            CaptureState::Recorded => "recorded",
        };
        f.write_str(name)
    }
}

enum Session {
    Idle,
    Recording { frames: mpsc::Receiver<AudioFrame> },
    Recorded(RecordingHandle),
}

/// Owns the lifecycle of a single audio-recording attempt.
///
/// State machine: Idle → (start) → Recording → (stop) → Recorded → (reset) →
/// Idle. Invalid overlaps are rejected with typed errors, never queued. The
/// manager is the sole owner of the recording handle produced by `stop()`;
/// completion surfaces only borrow it, so a borrow can never outlive `reset()`.
pub struct CaptureSessionManager {
    backend: Box<dyn AudioBackend>,
    config: AudioBackendConfig,
    session: Session,
    outstanding: Arc<AtomicUsize>,
}

impl CaptureSessionManager {
    pub fn new(backend: Box<dyn AudioBackend>, config: AudioBackendConfig) -> Self {
        Self {
            backend,
            config,
            session: Session::Idle,
            outstanding: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn state(&self) -> CaptureState {
        match self.session {
            Session::Idle => CaptureState::Idle,
            Session::Recording { .. } => CaptureState::Recording,
            Session::Recorded(_) => CaptureState::Recorded,
        }
    }

    /// Whether a finalized recording exists (the Recording→Completed gate).
    pub fn is_recorded(&self) -> bool {
        matches!(self.session, Session::Recorded(_))
    }

    /// Number of recording handles created but not yet released.
    ///
    /// 0 or 1 in normal operation; the test suite asserts it returns to 0
    /// across repeated start/stop/reset cycles.
    pub fn outstanding_handles(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Request the input device and begin buffering audio.
    ///
    /// Only valid from Idle. On denial or device error the session stays Idle
    /// and the error is returned for the caller to present; the caller may
    /// retry manually.
    pub async fn start(&mut self) -> Result<(), CaptureError> {
        match self.session {
            Session::Idle => {}
            Session::Recording { .. } => return Err(CaptureError::AlreadyRecording),
            Session::Recorded(_) => return Err(CaptureError::AlreadyRecorded),
        }

        let frames = self.backend.start().await?;
        self.session = Session::Recording { frames };
        info!("capture session recording via {}", self.backend.name());
        Ok(())
    }

    /// Finalize the buffered audio into a recording handle.
    ///
    /// Releases the device first, so the hardware lock (and any OS capture
    /// indicator) is freed before the bytes are encoded.
    pub async fn stop(&mut self) -> Result<(), CaptureError> {
        let mut frames = match std::mem::replace(&mut self.session, Session::Idle) {
            Session::Recording { frames } => frames,
            other => {
                self.session = other;
                return Err(CaptureError::NotRecording);
            }
        };

        self.backend.stop().await?;

        let mut samples = Vec::new();
        let mut sample_rate = self.config.sample_rate;
        let mut channels = self.config.channels;
        while let Some(frame) = frames.recv().await {
            sample_rate = frame.sample_rate;
            channels = frame.channels;
            samples.extend_from_slice(&frame.samples);
        }

        let handle = RecordingHandle::from_samples(
            sample_rate,
            channels,
            samples,
            self.outstanding.clone(),
        )?;
        info!(
            "capture finalized: recording {} ({:.1}s)",
            handle.id(),
            handle.duration_secs()
        );
        self.session = Session::Recorded(handle);
        Ok(())
    }

    /// Discard the current attempt and return to Idle.
    ///
    /// From Recorded this releases the handle; from Recording it stops the
    /// device and discards the partial buffer; from Idle it is a no-op.
    /// Idempotent: the release happens at most once per handle.
    pub async fn reset(&mut self) {
        match std::mem::replace(&mut self.session, Session::Idle) {
            Session::Recorded(handle) => {
                info!("discarding recording {}", handle.id());
                handle.release();
            }
            Session::Recording { frames } => {
                warn!("reset during capture, discarding partial buffer");
                drop(frames);
                if let Err(e) = self.backend.stop().await {
                    warn!("failed to stop backend during reset: {}", e);
                }
            }
            Session::Idle => {}
        }
    }

    /// Borrow the finalized recording for playback or download.
    /// Constant-time; no state change. `None` unless Recorded.
    pub fn export(&self) -> Option<&RecordingHandle> {
        match &self.session {
            Session::Recorded(handle) => Some(handle),
            _ => None,
        }
    }
}
