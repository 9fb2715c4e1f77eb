pub mod compute_probe;
pub mod config_store;
pub mod ffmpeg;
pub mod sherpa;
pub mod token_file;
pub mod whisper_cli;
#[cfg(feature = "whisper-rs")]
pub mod whisper_rs;

mod wav;

pub use compute_probe::HostComputeProbe;
pub use config_store::TomlConfigStore;
pub use ffmpeg::FfmpegDecoder;
pub use sherpa::SherpaDiarizer;
pub use token_file::TokenFile;
pub use whisper_cli::WhisperCliEngine;
#[cfg(feature = "whisper-rs")]
pub use whisper_rs::WhisperRsEngine;
