//! Phrase endpointing using energy-based voice activity detection.
//!
//! A phrase starts at the first chunk whose RMS energy exceeds the
//! threshold and ends after a configured stretch of quiet. Phrases shorter
//! than the minimum are treated as clicks and dropped.

use crate::config::VoiceConfig;
use tracing::debug;

/// Endpointing thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhraseConfig {
    /// RMS energy above which a chunk counts as speech.
    pub energy_threshold: f32,
    /// Trailing silence that ends a phrase, in milliseconds.
    pub pause_ms: u32,
    /// Minimum voiced length, in milliseconds.
    pub min_phrase_ms: u32,
    /// Hard cap on phrase length, in seconds.
    pub phrase_time_limit_secs: u64,
}

impl PhraseConfig {
    pub fn from_voice_config(config: &VoiceConfig) -> Self {
        Self {
            energy_threshold: config.energy_threshold,
            pause_ms: config.pause_ms,
            min_phrase_ms: config.min_phrase_ms,
            phrase_time_limit_secs: config.phrase_time_limit_secs,
        }
    }
}

/// Accumulates captured audio and reports complete phrases.
pub struct PhraseDetector {
    threshold: f32,
    pause_samples: usize,
    min_phrase_samples: usize,
    max_phrase_samples: usize,
    buffer: Vec<f32>,
    in_speech: bool,
    trailing_silence: usize,
}

impl PhraseDetector {
    /// Create a detector for audio at `sample_rate`.
    pub fn new(config: &PhraseConfig, sample_rate: u32) -> Self {
        let per_ms = sample_rate as usize / 1000;
        Self {
            threshold: config.energy_threshold,
            pause_samples: config.pause_ms as usize * per_ms,
            min_phrase_samples: config.min_phrase_ms as usize * per_ms,
            max_phrase_samples: (config.phrase_time_limit_secs as usize)
                .saturating_mul(sample_rate as usize)
                .max(1),
            buffer: Vec::new(),
            in_speech: false,
            trailing_silence: 0,
        }
    }

    /// Whether a phrase is currently being recorded.
    pub fn in_speech(&self) -> bool {
        self.in_speech
    }

    /// Feed one chunk of mono samples.
    ///
    /// Returns the phrase when it ends, either by trailing silence or by
    /// reaching the length cap.
    pub fn push(&mut self, samples: &[f32]) -> Option<Vec<f32>> {
        if samples.is_empty() {
            return None;
        }

        let loud = compute_rms_energy(samples) > self.threshold;

        if loud {
            if !self.in_speech {
                debug!("speech onset");
                self.in_speech = true;
                self.buffer.clear();
            }
            self.trailing_silence = 0;
            self.buffer.extend_from_slice(samples);
        } else if self.in_speech {
            self.trailing_silence += samples.len();
            self.buffer.extend_from_slice(samples);

            if self.trailing_silence >= self.pause_samples {
                let voiced = self.buffer.len().saturating_sub(self.trailing_silence);
                self.in_speech = false;
                self.trailing_silence = 0;

                if voiced >= self.min_phrase_samples {
                    return Some(std::mem::take(&mut self.buffer));
                }
                debug!("discarding {voiced}-sample blip");
                self.buffer.clear();
            }
        }

        if self.in_speech && self.buffer.len() >= self.max_phrase_samples {
            debug!("phrase hit length cap");
            return self.finish();
        }

        None
    }

    /// End the current phrase early and return whatever was recorded.
    pub fn finish(&mut self) -> Option<Vec<f32>> {
        if !self.in_speech {
            return None;
        }
        self.in_speech = false;
        self.trailing_silence = 0;
        Some(std::mem::take(&mut self.buffer))
    }
}

/// Compute RMS energy of audio samples.
fn compute_rms_energy(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    const RATE: u32 = 16_000;
    const CHUNK: usize = 512; // 32ms

    fn config() -> PhraseConfig {
        PhraseConfig {
            energy_threshold: 0.01,
            pause_ms: 320,
            min_phrase_ms: 100,
            phrase_time_limit_secs: 2,
        }
    }

    fn loud() -> Vec<f32> {
        (0..CHUNK)
            .map(|i| if i % 2 == 0 { 0.3 } else { -0.3 })
            .collect()
    }

    fn quiet() -> Vec<f32> {
        vec![0.0; CHUNK]
    }

    #[test]
    fn rms_energy() {
        assert_eq!(compute_rms_energy(&[]), 0.0);
        assert!((compute_rms_energy(&[0.5, -0.5]) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn silence_never_produces_a_phrase() {
        let mut det = PhraseDetector::new(&config(), RATE);
        for _ in 0..100 {
            assert!(det.push(&quiet()).is_none());
        }
        assert!(!det.in_speech());
    }

    #[test]
    fn speech_followed_by_pause_yields_phrase() {
        let mut det = PhraseDetector::new(&config(), RATE);
        for _ in 0..10 {
            assert!(det.push(&loud()).is_none());
        }
        assert!(det.in_speech());

        // 320ms pause = 10 chunks of 32ms
        let mut phrase = None;
        for _ in 0..10 {
            phrase = det.push(&quiet());
        }
        let phrase = phrase.expect("phrase should end after pause");
        assert_eq!(phrase.len(), 20 * CHUNK);
        assert!(!det.in_speech());
    }

    #[test]
    fn short_blip_is_discarded() {
        let mut det = PhraseDetector::new(&config(), RATE);
        // One 32ms chunk is below the 100ms minimum.
        assert!(det.push(&loud()).is_none());
        for _ in 0..10 {
            assert!(det.push(&quiet()).is_none());
        }
        assert!(!det.in_speech());
    }

    #[test]
    fn long_speech_is_capped() {
        let mut det = PhraseDetector::new(&config(), RATE);
        // 2s cap = 32000 samples = 62.5 chunks
        let mut phrase = None;
        for _ in 0..63 {
            if let Some(p) = det.push(&loud()) {
                phrase = Some(p);
                break;
            }
        }
        let phrase = phrase.expect("cap should end the phrase");
        assert!(phrase.len() >= 2 * RATE as usize);
        assert!(!det.in_speech());
    }

    #[test]
    fn finish_flushes_partial_phrase() {
        let mut det = PhraseDetector::new(&config(), RATE);
        assert!(det.finish().is_none());
        det.push(&loud());
        det.push(&loud());
        assert_eq!(det.finish().map(|p| p.len()), Some(2 * CHUNK));
    }
}
