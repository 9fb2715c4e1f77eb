use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::model::ModelSize;

/// Transcription configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// Default model size when a request does not name one.
    pub model: ModelSize,
    /// Language code (e.g. "en", "fr") or "auto" for detection.
    pub language: String,
    /// Render speaker-block output instead of per-line timestamps.
    pub speaker_blocks: bool,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: ModelSize::Tiny,
            language: "auto".to_string(),
            speaker_blocks: false,
        }
    }
}

impl TranscriptionConfig {
    /// The configured language as an explicit code, or None for auto.
    pub fn language_code(&self) -> Option<String> {
        let code = self.language.trim();
        if code.is_empty() || code.eq_ignore_ascii_case("auto") {
            None
        } else {
            Some(code.to_string())
        }
    }
}

/// Speech engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Override for the whisper binary (default: "whisper-cli" on PATH).
    pub whisper_binary: Option<PathBuf>,
    /// Override for the directory holding ggml model files.
    pub models_dir: Option<PathBuf>,
}

/// Speaker diarization configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiarizationConfig {
    /// Override for the diarization binary
    /// (default: "sherpa-onnx-offline-speaker-diarization" on PATH).
    pub binary: Option<PathBuf>,
    /// Path to the segmentation model.
    pub segmentation_model: Option<PathBuf>,
    /// Path to the speaker embedding model.
    pub embedding_model: Option<PathBuf>,
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Override for the transcript directory (default: the platform
    /// downloads directory).
    pub directory: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Enable file logging with rotation.
    pub file_logging: bool,
    /// Maximum number of log files to keep.
    pub max_files: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: true,
            max_files: 7,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub transcription: TranscriptionConfig,
    pub engine: EngineConfig,
    pub diarization: DiarizationConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Create a new AppConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::new();
        assert_eq!(config.transcription.model, ModelSize::Tiny);
        assert_eq!(config.transcription.language, "auto");
        assert!(!config.transcription.speaker_blocks);
        assert_eq!(config.logging.level, "info");
        assert!(config.output.directory.is_none());
    }

    #[test]
    fn test_language_code_auto_means_none() {
        let mut config = TranscriptionConfig::default();
        assert_eq!(config.language_code(), None);
        config.language = "AUTO".into();
        assert_eq!(config.language_code(), None);
        config.language = " en ".into();
        assert_eq!(config.language_code(), Some("en".to_string()));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [transcription]
            model = "small"
            "#,
        )
        .unwrap();
        assert_eq!(config.transcription.model, ModelSize::Small);
        assert_eq!(config.transcription.language, "auto");
        assert_eq!(config.logging.max_files, 7);
    }
}
