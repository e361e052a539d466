use thiserror::Error;
use tokio::sync::mpsc;

use super::microphone::MicrophoneBackend;
use super::synthetic::SyntheticBackend;

/// Errors reported at the capture device boundary.
///
/// All of these are recoverable: the caller surfaces them as a notice and may
/// retry `start()` manually. Nothing here is retried automatically.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no audio input device is available")]
    DeviceUnavailable,
    #[error("microphone access was denied: {0}")]
    PermissionDenied(String),
    #[error("a capture is already in progress")]
    AlreadyRecording,
    #[error("a finished recording already exists; discard it before starting a new take")]
    AlreadyRecorded,
    #[error("no capture is in progress")]
    NotRecording,
    #[error("audio device error: {0}")]
    Device(String),
    #[error("failed to encode recording: {0}")]
    Encoding(String),
}

/// Audio sample data (16-bit PCM, interleaved).
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Configuration for an audio backend.
#[derive(Debug, Clone)]
pub struct AudioBackendConfig {
    /// Capture sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,
    /// Buffer size in milliseconds (affects latency)
    pub buffer_duration_ms: u64,
}

impl Default for AudioBackendConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000, // Spoken word does not need more
            channels: 1,        // Mono
            buffer_duration_ms: 100,
        }
    }
}

/// Audio capture backend trait.
///
/// `start` requests exclusive access to the input device and returns a channel
/// of frames in arrival order; the channel closes once `stop` has released the
/// device and the last buffered frame has been delivered.
///
/// Not `Send`: the cpal implementation holds a `cpal::Stream`, so backends
/// live on a `LocalSet` in the binary.
#[async_trait::async_trait(?Send)]
pub trait AudioBackend {
    /// Start capturing audio. On denial or device error the backend stays
    /// inactive and the error is returned to the caller.
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError>;

    /// Stop capturing and release the device immediately.
    async fn stop(&mut self) -> Result<(), CaptureError>;

    /// Whether the backend currently holds the device.
    fn is_capturing(&self) -> bool;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

/// Which capture implementation to use.
#[derive(Debug, Clone)]
pub enum AudioSource {
    /// Default host microphone via cpal
    Microphone,
    /// Deterministic generated audio (tests, demos)
    Synthetic,
}

/// Audio backend factory.
pub struct AudioBackendFactory;

impl AudioBackendFactory {
    pub fn create(source: AudioSource, config: AudioBackendConfig) -> Box<dyn AudioBackend> {
        match source {
            AudioSource::Microphone => Box::new(MicrophoneBackend::new(config)),
            AudioSource::Synthetic => Box::new(SyntheticBackend::new(config)),
        }
    }
}
