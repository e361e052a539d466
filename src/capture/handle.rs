use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::trace;
use uuid::Uuid;

use super::backend::CaptureError;

/// Exclusively-owned handle to one finalized recording.
///
/// Created by the session manager when a capture is stopped; the WAV bytes are
/// freed exactly once, either by an explicit `release()` or on drop. The
/// shared outstanding counter lets the owner (and the test suite) verify that
/// no handle is leaked and none is released twice.
pub struct RecordingHandle {
    id: Uuid,
    recorded_at: DateTime<Utc>,
    duration_secs: f64,
    wav: Option<Vec<u8>>,
    outstanding: Arc<AtomicUsize>,
}

impl RecordingHandle {
    /// Encode the buffered samples into one ordered WAV byte sequence and
    /// register the handle with the outstanding counter.
    pub(crate) fn from_samples(
        sample_rate: u32,
        channels: u16,
        samples: Vec<i16>,
        outstanding: Arc<AtomicUsize>,
    ) -> Result<Self, CaptureError> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut wav = Vec::new();
        {
            let cursor = Cursor::new(&mut wav);
            let mut writer = hound::WavWriter::new(cursor, spec)
                .map_err(|e| CaptureError::Encoding(e.to_string()))?;
            for sample in &samples {
                writer
                    .write_sample(*sample)
                    .map_err(|e| CaptureError::Encoding(e.to_string()))?;
            }
            writer
                .finalize()
                .map_err(|e| CaptureError::Encoding(e.to_string()))?;
        }

        let duration_secs = samples.len() as f64 / (sample_rate as f64 * channels as f64);
        outstanding.fetch_add(1, Ordering::SeqCst);

        Ok(Self {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            duration_secs,
            wav: Some(wav),
            outstanding,
        })
    }

    /// Locally-unique reference to this recording for the session's lifetime.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// The finalized WAV bytes, ready for playback or download.
    pub fn wav_bytes(&self) -> &[u8] {
        self.wav.as_deref().unwrap_or_default()
    }

    /// Free the backing storage. Consumes the handle, so a second release
    /// cannot be expressed; dropping an unreleased handle releases it too.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if self.wav.take().is_some() {
            self.outstanding.fetch_sub(1, Ordering::SeqCst);
            trace!("released recording {}", self.id);
        }
    }
}

impl Drop for RecordingHandle {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl std::fmt::Debug for RecordingHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingHandle")
            .field("id", &self.id)
            .field("recorded_at", &self.recorded_at)
            .field("duration_secs", &self.duration_secs)
            .field("bytes", &self.wav.as_ref().map(Vec::len))
            .finish()
    }
}

/// Suggested download file name (without extension) derived from the topic:
/// every non-alphanumeric character becomes `_` and letters are lower-cased.
/// An empty topic falls back to a generic name.
pub fn export_file_name(topic: &str) -> String {
    if topic.is_empty() {
        return "podcast".to_string();
    }
    topic
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
