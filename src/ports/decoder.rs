use async_trait::async_trait;

use crate::domain::{AudioSource, EngineError, PcmAudio};

/// Port for audio decoding.
///
/// Implementations turn any allow-listed container format into the mono
/// 16 kHz float PCM every downstream engine consumes.
#[async_trait]
pub trait AudioDecoder: Send + Sync {
    /// Decode the source file into PCM samples.
    async fn decode(&self, source: &AudioSource) -> Result<PcmAudio, EngineError>;
}
