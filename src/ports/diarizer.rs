use async_trait::async_trait;

use crate::domain::{Device, EngineError, PcmAudio, SpeakerTurn};

/// Port for speaker-diarization backends.
///
/// Diarization is an independent pass over the audio that yields
/// speaker-labeled time intervals; the pipeline joins them onto transcript
/// segments. Failures here are degraded, never fatal.
#[async_trait]
pub trait Diarizer: Send + Sync {
    /// Produce speaker turns in chronological order.
    ///
    /// The credential token authenticates access to gated diarization
    /// models; backends whose models are already local may ignore it.
    async fn diarize(
        &self,
        audio: &PcmAudio,
        token: &str,
        device: Device,
    ) -> Result<Vec<SpeakerTurn>, EngineError>;
}
