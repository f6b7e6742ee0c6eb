//! Microphone capture using cpal.
//!
//! Captures at the device's native sample rate and downsamples to mono at
//! the configured rate (default 16kHz) for the recognition service.

use crate::config::VoiceConfig;
use crate::error::{GoalError, Result};
use crate::voice::vad::{PhraseConfig, PhraseDetector};
use cpal::StreamConfig;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// How often the capture loop wakes up to check its deadlines.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Microphone handle.
///
/// Holds only the device selection; the device and stream are opened per
/// phrase so the handle can move freely between threads.
#[derive(Debug, Clone)]
pub struct MicrophoneCapture {
    device_name: Option<String>,
    /// The sample rate handed to the recogniser.
    target_sample_rate: u32,
}

impl MicrophoneCapture {
    pub fn new(config: &VoiceConfig) -> Self {
        Self {
            device_name: config.input_device.clone(),
            target_sample_rate: config.input_sample_rate,
        }
    }

    /// Sample rate of the recorded phrases.
    pub fn sample_rate(&self) -> u32 {
        self.target_sample_rate
    }

    /// Check that the input device exists and report its name.
    ///
    /// # Errors
    ///
    /// Returns an error if no matching input device is available.
    pub fn probe(&self) -> Result<String> {
        let (device, _) = self.open_device()?;
        Ok(device_name(&device))
    }

    /// Record one phrase, blocking the calling thread.
    ///
    /// Waits up to `listen_timeout` for speech to start. Returns `Ok(None)`
    /// if none does.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio stream cannot be created or stops
    /// delivering audio.
    pub fn record_phrase(
        &self,
        phrase: &PhraseConfig,
        listen_timeout: Duration,
    ) -> Result<Option<Vec<f32>>> {
        let (device, stream_config) = self.open_device()?;
        let native_rate = stream_config.sample_rate;
        let native_channels = stream_config.channels;
        let target_rate = self.target_sample_rate;

        let (tx, rx) = crossbeam_channel::bounded::<Vec<f32>>(256);

        let stream = device
            .build_input_stream(
                &stream_config,
                move |data: &[f32], _info: &cpal::InputCallbackInfo| {
                    let mono = if native_channels > 1 {
                        to_mono(data, native_channels)
                    } else {
                        data.to_vec()
                    };

                    let samples = if native_rate != target_rate {
                        downsample(&mono, native_rate, target_rate)
                    } else {
                        mono
                    };

                    // Never block the audio thread.
                    if tx.try_send(samples).is_err() {
                        debug!("capture channel full, dropping chunk");
                    }
                },
                move |err| {
                    error!("audio input stream error: {err}");
                },
                None,
            )
            .map_err(|e| GoalError::Audio(format!("failed to build input stream: {e}")))?;

        stream
            .play()
            .map_err(|e| GoalError::Audio(format!("failed to start input stream: {e}")))?;

        info!("listening (timeout {}s)", listen_timeout.as_secs());

        let mut detector = PhraseDetector::new(phrase, target_rate);
        let started = Instant::now();
        // Backstop in case the device stalls mid-phrase.
        let hard_deadline =
            listen_timeout + Duration::from_secs(phrase.phrase_time_limit_secs) + POLL_INTERVAL;

        let result = loop {
            if !detector.in_speech() && started.elapsed() >= listen_timeout {
                info!("no speech before timeout");
                break Ok(None);
            }
            if started.elapsed() >= hard_deadline {
                break Ok(detector.finish());
            }

            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(chunk) => {
                    if let Some(samples) = detector.push(&chunk) {
                        break Ok(Some(samples));
                    }
                }
                Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
                Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                    break Err(GoalError::Audio("input stream closed".into()));
                }
            }
        };

        drop(stream);
        if let Ok(Some(samples)) = &result {
            info!(
                "captured {:.1}s phrase",
                samples.len() as f32 / target_rate as f32
            );
        }
        result
    }

    /// List available input devices.
    ///
    /// # Errors
    ///
    /// Returns an error if devices cannot be enumerated.
    pub fn list_input_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();
        let devices = host
            .input_devices()
            .map_err(|e| GoalError::Audio(format!("cannot enumerate devices: {e}")))?;

        let mut names = Vec::new();
        for device in devices {
            if let Ok(desc) = device.description() {
                names.push(desc.name().to_owned());
            }
        }
        Ok(names)
    }

    fn open_device(&self) -> Result<(cpal::Device, StreamConfig)> {
        let host = cpal::default_host();

        let device = if let Some(ref name) = self.device_name {
            host.input_devices()
                .map_err(|e| GoalError::Audio(format!("cannot enumerate devices: {e}")))?
                .find(|d| {
                    d.description()
                        .ok()
                        .map(|desc| desc.name() == name)
                        .unwrap_or(false)
                })
                .ok_or_else(|| GoalError::Audio(format!("input device '{name}' not found")))?
        } else {
            host.default_input_device()
                .ok_or_else(|| GoalError::Audio("no default input device".into()))?
        };

        let default_config = device
            .default_input_config()
            .map_err(|e| GoalError::Audio(format!("no default input config: {e}")))?;

        let stream_config = StreamConfig {
            channels: default_config.channels(),
            sample_rate: default_config.sample_rate(),
            buffer_size: cpal::BufferSize::Default,
        };

        debug!(
            "input {}: {}Hz, {} channels",
            device_name(&device),
            stream_config.sample_rate,
            stream_config.channels
        );

        Ok((device, stream_config))
    }
}

fn device_name(device: &cpal::Device) -> String {
    device
        .description()
        .map(|d| d.name().to_owned())
        .unwrap_or_else(|_| "<unknown>".into())
}

/// Convert interleaved multi-channel audio to mono by averaging channels.
fn to_mono(data: &[f32], channels: u16) -> Vec<f32> {
    let ch = channels as usize;
    data.chunks_exact(ch)
        .map(|frame| frame.iter().sum::<f32>() / ch as f32)
        .collect()
}

/// Linear-interpolation resampler.
///
/// Speech energy sits below 8kHz, so 48kHz → 16kHz needs no anti-alias filter.
fn downsample(samples: &[f32], src_rate: u32, dst_rate: u32) -> Vec<f32> {
    if src_rate == dst_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = src_rate as f64 / dst_rate as f64;
    let out_len = (samples.len() as f64 / ratio) as usize;
    let mut output = Vec::with_capacity(out_len);

    for i in 0..out_len {
        let src_pos = i as f64 * ratio;
        let idx = src_pos as usize;
        let frac = src_pos - idx as f64;

        let sample = if idx + 1 < samples.len() {
            samples[idx] as f64 * (1.0 - frac) + samples[idx + 1] as f64 * frac
        } else {
            samples[idx.min(samples.len() - 1)] as f64
        };

        output.push(sample as f32);
    }

    output
}
