use async_trait::async_trait;

use crate::domain::{EngineError, ModelSpec, PcmAudio, Segment};

/// Tuning options for one transcription pass.
#[derive(Debug, Clone)]
pub struct TranscribeOptions {
    /// Target language (ISO 639-1 code), or None for auto-detection.
    pub language: Option<String>,
    /// Throughput knob with no correctness effect; larger on GPU-class
    /// devices.
    pub batch_size: u32,
}

impl Default for TranscribeOptions {
    fn default() -> Self {
        Self {
            language: None,
            batch_size: 4,
        }
    }
}

/// Raw engine output before pipeline post-processing.
#[derive(Debug, Clone)]
pub struct RawTranscript {
    /// Timestamped segments in chronological order.
    pub segments: Vec<Segment>,
    /// Language the engine detected, when it reports one.
    pub language: Option<String>,
}

/// A loaded speech-recognition model, ready for inference.
///
/// Dropping the handle releases whatever memory the backend holds for it;
/// the model cache relies on this to bound accelerator usage.
#[async_trait]
pub trait SpeechModel: Send + Sync {
    /// Transcribe decoded audio into timestamped segments.
    async fn transcribe(
        &self,
        audio: &PcmAudio,
        options: &TranscribeOptions,
    ) -> Result<RawTranscript, EngineError>;
}

/// Port for speech-recognition backends.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Backend name for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Load the model described by the spec.
    async fn load(&self, spec: &ModelSpec) -> Result<Box<dyn SpeechModel>, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcribe_options_default() {
        let options = TranscribeOptions::default();
        assert!(options.language.is_none());
        assert_eq!(options.batch_size, 4);
    }
}
