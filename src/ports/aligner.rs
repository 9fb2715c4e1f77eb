use async_trait::async_trait;

use crate::domain::{Device, EngineError, PcmAudio, Segment};

/// Port for forced-alignment backends.
///
/// Alignment refines transcribe-stage timestamps to tighter word/segment
/// boundaries. It must not reorder segments or change their count; the
/// pipeline discards refinements that break either rule.
#[async_trait]
pub trait Aligner: Send + Sync {
    /// Refine segment timestamps for the given language.
    async fn align(
        &self,
        segments: &[Segment],
        language: &str,
        audio: &PcmAudio,
        device: Device,
    ) -> Result<Vec<Segment>, EngineError>;
}
