pub mod audio;
pub mod compute;
pub mod config;
pub mod error;
pub mod model;
pub mod transcript;

pub use audio::{AudioSource, PcmAudio, SUPPORTED_EXTENSIONS};
pub use compute::{ComputeProfile, Device, Precision};
pub use config::AppConfig;
pub use error::{EngineError, FailureKind, RunError};
pub use model::{ModelSize, ModelSpec};
pub use transcript::{
    assign_speakers, is_chronological, Segment, SpeakerTurn, StageOutcome, TranscriptionResult,
};
