use tokio::sync::mpsc;
use tracing::info;

use super::backend::{AudioBackend, AudioBackendConfig, AudioFrame, CaptureError};

/// Deterministic backend for tests and demos.
///
/// Emits a fixed number of 100ms sine-wave frames and closes the channel, so a
/// session can run start/stop without hardware. Can be primed with a one-shot
/// denial to exercise the device-error paths; a later `start()` then succeeds,
/// mirroring a user granting access on manual retry.
pub struct SyntheticBackend {
    config: AudioBackendConfig,
    frames: usize,
    deny_next: Option<CaptureError>,
    capturing: bool,
}

impl SyntheticBackend {
    pub fn new(config: AudioBackendConfig) -> Self {
        Self::with_frames(config, 10)
    }

    pub fn with_frames(config: AudioBackendConfig, frames: usize) -> Self {
        Self {
            config,
            frames,
            deny_next: None,
            capturing: false,
        }
    }

    /// Make the next `start()` fail with `error`.
    pub fn deny_next_start(mut self, error: CaptureError) -> Self {
        self.deny_next = Some(error);
        self
    }

    fn frame(&self, index: usize) -> AudioFrame {
        let samples_per_frame =
            (self.config.sample_rate as usize * self.config.channels as usize) / 10;
        let samples: Vec<i16> = (0..samples_per_frame)
            .map(|i| {
                let t = (index * samples_per_frame + i) as f32 / self.config.sample_rate as f32;
                ((t * 440.0 * 2.0 * std::f32::consts::PI).sin() * 8000.0) as i16
            })
            .collect();
        AudioFrame {
            samples,
            sample_rate: self.config.sample_rate,
            channels: self.config.channels,
            timestamp_ms: (index as u64) * 100,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl AudioBackend for SyntheticBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        if self.capturing {
            return Err(CaptureError::AlreadyRecording);
        }
        if let Some(error) = self.deny_next.take() {
            return Err(error);
        }

        // Buffer every frame up front; the sender is dropped here so the
        // receiver observes a closed channel after the last frame.
        let (tx, rx) = mpsc::channel(self.frames.max(1));
        for index in 0..self.frames {
            let _ = tx.try_send(self.frame(index));
        }

        self.capturing = true;
        info!("synthetic capture started ({} frames)", self.frames);
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        if !self.capturing {
            return Err(CaptureError::NotRecording);
        }
        self.capturing = false;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}
