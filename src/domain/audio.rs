use std::path::{Path, PathBuf};

use zeroize::Zeroize;

use crate::domain::error::RunError;

/// File extensions accepted as transcription input.
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["mp3", "wav", "m4a", "aac", "flac", "ogg", "wma"];

/// A validated input file: the path plus its derived stem name.
/// Immutable once accepted by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSource {
    path: PathBuf,
    stem: String,
    file_name: String,
}

impl AudioSource {
    /// Validate a path as transcription input.
    ///
    /// Missing files and extensions outside the allow-list are rejected
    /// here, before any pipeline resources are allocated.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, RunError> {
        let path = path.into();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext) => {}
            _ => {
                return Err(RunError::InvalidInput(format!(
                    "unsupported file format '{}' (supported: {})",
                    path.display(),
                    SUPPORTED_EXTENSIONS.join(", ")
                )));
            }
        }
        if !path.is_file() {
            return Err(RunError::InvalidInput(format!(
                "audio file not found: {}",
                path.display()
            )));
        }
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("audio")
            .to_string();
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("audio")
            .to_string();
        Ok(Self {
            path,
            stem,
            file_name,
        })
    }

    /// Path to the input file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without its extension, used for output naming.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// File name including its extension, used in the output header.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// Decoded audio: mono samples at 16 kHz, 32-bit float in [-1, 1].
/// Samples are securely zeroed on drop; decoded audio stays in memory except
/// for explicit handoff to a local engine process.
#[derive(Debug, Zeroize)]
#[zeroize(drop)]
pub struct PcmAudio {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl PcmAudio {
    /// Sample rate every engine consumes.
    pub const SAMPLE_RATE: u32 = 16_000;

    /// Wrap already-decoded samples at the pipeline sample rate.
    pub fn new(samples: Vec<f32>) -> Self {
        Self {
            samples,
            sample_rate: Self::SAMPLE_RATE,
        }
    }

    /// Convert 16-bit PCM into normalized float samples.
    pub fn from_i16(samples: &[i16]) -> Self {
        Self::new(samples.iter().map(|&s| s as f32 / 32768.0).collect())
    }

    /// Get the samples as a slice.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Get the sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn test_accepts_allow_listed_extensions() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.mp3", "b.wav", "c.m4a", "d.aac", "e.flac", "f.ogg", "g.wma"] {
            let path = touch(dir.path(), name);
            assert!(AudioSource::new(path).is_ok(), "{name} should be accepted");
        }
    }

    #[test]
    fn test_extension_check_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = touch(dir.path(), "meeting.WAV");
        assert!(AudioSource::new(path).is_ok());
    }

    #[test]
    fn test_rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = touch(dir.path(), "notes.txt");
        let err = AudioSource::new(path).unwrap_err();
        assert!(matches!(err, RunError::InvalidInput(_)));
        assert!(err.to_string().contains("unsupported file format"));
    }

    #[test]
    fn test_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AudioSource::new(dir.path().join("ghost.wav")).unwrap_err();
        assert!(matches!(err, RunError::InvalidInput(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_stem_and_file_name_derivation() {
        let dir = tempfile::tempdir().unwrap();
        let path = touch(dir.path(), "interview.mp3");
        let source = AudioSource::new(path).unwrap();
        assert_eq!(source.stem(), "interview");
        assert_eq!(source.file_name(), "interview.mp3");
    }

    #[test]
    fn test_pcm_duration() {
        // 16000 samples = 1 second at 16kHz
        let audio = PcmAudio::new(vec![0.0; 16_000]);
        assert!((audio.duration_secs() - 1.0).abs() < 1e-9);
        assert_eq!(audio.sample_rate(), PcmAudio::SAMPLE_RATE);
    }

    #[test]
    fn test_pcm_from_i16_normalizes() {
        let audio = PcmAudio::from_i16(&[0, 16384, -32768]);
        let samples = audio.samples();
        assert!((samples[0] - 0.0).abs() < 1e-6);
        assert!((samples[1] - 0.5).abs() < 1e-6);
        assert!((samples[2] + 1.0).abs() < 1e-6);
    }
}
