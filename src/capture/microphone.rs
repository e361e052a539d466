use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleRate, StreamConfig};
use ringbuf::{traits::*, HeapRb};
use tokio::sync::{mpsc, Notify};
use tracing::{info, warn};

use super::backend::{AudioBackend, AudioBackendConfig, AudioFrame, CaptureError};

/// Microphone capture through the default cpal host.
///
/// The cpal callback pushes samples into a lock-free ring buffer; a bridge
/// task drains the ring into `AudioFrame`s on the async side. Dropping the
/// stream releases the device (and the OS capture indicator) immediately.
pub struct MicrophoneBackend {
    config: AudioBackendConfig,
    stream: Option<cpal::Stream>,
    stopping: Arc<AtomicBool>,
    wakeup: Arc<Notify>,
}

impl MicrophoneBackend {
    pub fn new(config: AudioBackendConfig) -> Self {
        Self {
            config,
            stream: None,
            stopping: Arc::new(AtomicBool::new(false)),
            wakeup: Arc::new(Notify::new()),
        }
    }

    fn samples_per_chunk(&self) -> usize {
        let per_second = self.config.sample_rate as u64 * self.config.channels as u64;
        (per_second * self.config.buffer_duration_ms / 1000).max(1) as usize
    }

    async fn bridge_task(
        mut consumer: impl Consumer<Item = f32>,
        tx: mpsc::Sender<AudioFrame>,
        chunk_size: usize,
        wakeup: Arc<Notify>,
        stopping: Arc<AtomicBool>,
        sample_rate: u32,
        channels: u16,
    ) {
        let mut sent_samples: u64 = 0;
        loop {
            wakeup.notified().await;
            let draining = stopping.load(Ordering::SeqCst);

            // Forward full chunks; on shutdown flush whatever is left.
            while consumer.occupied_len() >= chunk_size
                || (draining && consumer.occupied_len() > 0)
            {
                let want = consumer.occupied_len().min(chunk_size);
                let mut raw = vec![0.0f32; want];
                let n = consumer.pop_slice(&mut raw);
                raw.truncate(n);

                let samples: Vec<i16> = raw
                    .iter()
                    .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
                    .collect();

                let timestamp_ms =
                    sent_samples * 1000 / (sample_rate as u64 * channels as u64);
                sent_samples += samples.len() as u64;

                let frame = AudioFrame {
                    samples,
                    sample_rate,
                    channels,
                    timestamp_ms,
                };
                if tx.send(frame).await.is_err() {
                    return;
                }
            }

            if draining {
                return;
            }
        }
    }

    fn map_build_error(err: cpal::BuildStreamError) -> CaptureError {
        match err {
            cpal::BuildStreamError::DeviceNotAvailable => CaptureError::DeviceUnavailable,
            other => {
                let message = other.to_string();
                if message.to_ascii_lowercase().contains("permission") {
                    CaptureError::PermissionDenied(message)
                } else {
                    CaptureError::Device(message)
                }
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl AudioBackend for MicrophoneBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        if self.stream.is_some() {
            return Err(CaptureError::AlreadyRecording);
        }

        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(CaptureError::DeviceUnavailable)?;

        let stream_config = StreamConfig {
            channels: self.config.channels,
            sample_rate: SampleRate(self.config.sample_rate),
            buffer_size: BufferSize::Default,
        };

        // Hold up to 60s of audio between the callback and the bridge task.
        let capacity = self.config.sample_rate as usize * self.config.channels as usize * 60;
        let ring = HeapRb::<f32>::new(capacity);
        let (mut producer, consumer) = ring.split();

        self.stopping.store(false, Ordering::SeqCst);
        let wakeup = self.wakeup.clone();
        let wakeup_callback = wakeup.clone();

        let stream = device
            .build_input_stream(
                &stream_config,
                move |data: &[f32], _info: &cpal::InputCallbackInfo| {
                    producer.push_slice(data);
                    wakeup_callback.notify_one();
                },
                move |err| {
                    warn!("audio stream error: {}", err);
                },
                None,
            )
            .map_err(Self::map_build_error)?;

        stream
            .play()
            .map_err(|e| CaptureError::Device(e.to_string()))?;

        let (tx, rx) = mpsc::channel(100);
        tokio::task::spawn_local(Self::bridge_task(
            consumer,
            tx,
            self.samples_per_chunk(),
            wakeup,
            self.stopping.clone(),
            self.config.sample_rate,
            self.config.channels,
        ));

        self.stream = Some(stream);
        info!("microphone capture started ({} Hz)", self.config.sample_rate);
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        if self.stream.take().is_none() {
            return Err(CaptureError::NotRecording);
        }

        // Stream is dropped, device released. Wake the bridge so it flushes
        // the ring and closes the frame channel.
        self.stopping.store(true, Ordering::SeqCst);
        self.wakeup.notify_one();

        info!("microphone capture stopped, device released");
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.stream.is_some()
    }

    fn name(&self) -> &str {
        "microphone"
    }
}
