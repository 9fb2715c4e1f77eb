pub mod aligner;
pub mod config;
pub mod decoder;
pub mod diarizer;
pub mod probe;
pub mod speech;
pub mod token;

pub use aligner::Aligner;
pub use config::ConfigStore;
pub use decoder::AudioDecoder;
pub use diarizer::Diarizer;
pub use probe::ComputeProbe;
pub use speech::{RawTranscript, SpeechEngine, SpeechModel, TranscribeOptions};
pub use token::{Secret, TokenStore};
