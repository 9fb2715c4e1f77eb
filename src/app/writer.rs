use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use tracing::info;

use crate::app::assemble::RenderedTranscript;
use crate::domain::{EngineError, ModelSize};

const SEPARATOR_WIDTH: usize = 60;

/// Header fields for one saved transcript.
#[derive(Debug, Clone)]
pub struct ArtifactMeta {
    /// Input file name with extension, e.g. "meeting.mp3".
    pub file_name: String,
    /// Input file stem, e.g. "meeting".
    pub stem: String,
    /// Model size the transcript was produced with.
    pub model: ModelSize,
    /// Detected language code.
    pub language: String,
}

/// Writes transcript artifacts to the output directory.
pub struct TranscriptWriter {
    directory: Option<PathBuf>,
}

impl TranscriptWriter {
    /// A writer targeting the given directory, or the platform downloads
    /// directory when none is given.
    pub fn new(directory: Option<PathBuf>) -> Self {
        Self { directory }
    }

    /// Directory this writer saves into.
    pub fn output_dir(&self) -> Result<PathBuf, EngineError> {
        if let Some(dir) = &self.directory {
            return Ok(dir.clone());
        }
        dirs::download_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
            .ok_or_else(|| {
                EngineError::Config("could not determine the downloads directory".to_string())
            })
    }

    /// Write one transcript artifact and return its path.
    ///
    /// The file name carries a second-granular timestamp taken at run start,
    /// so repeated runs never overwrite an earlier artifact.
    pub fn write(
        &self,
        meta: &ArtifactMeta,
        rendered: &RenderedTranscript,
        at: DateTime<Local>,
    ) -> Result<PathBuf, EngineError> {
        let dir = self.output_dir()?;
        fs::create_dir_all(&dir)?;

        let file_name = format!(
            "{}_transcript_{}.txt",
            meta.stem,
            at.format("%Y%m%d_%H%M%S")
        );
        let path = dir.join(file_name);

        let separator = "=".repeat(SEPARATOR_WIDTH);
        let artifact = format!(
            "AudioScribe Transcript\n\
             File: {file}\n\
             Date: {date}\n\
             Model: {model}\n\
             Language: {language}\n\
             {separator}\n\
             \n\
             {body}\n\
             \n\
             {separator}\n\
             Full Text:\n\
             \n\
             {full_text}",
            file = meta.file_name,
            date = at.format("%Y-%m-%d %H:%M:%S"),
            model = meta.model,
            language = meta.language,
            body = rendered.body,
            full_text = rendered.full_text,
        );

        fs::write(&path, &artifact)?;
        info!(path = ?path, bytes = artifact.len(), "Transcript saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 14, 30, 5).unwrap()
    }

    fn meta() -> ArtifactMeta {
        ArtifactMeta {
            file_name: "clip.wav".to_string(),
            stem: "clip".to_string(),
            model: ModelSize::Tiny,
            language: "en".to_string(),
        }
    }

    fn rendered() -> RenderedTranscript {
        RenderedTranscript {
            body: "[00:00 - 00:02]: hello".to_string(),
            full_text: "hello".to_string(),
        }
    }

    #[test]
    fn test_write_builds_timestamped_name() {
        let dir = tempfile::tempdir().unwrap();
        let writer = TranscriptWriter::new(Some(dir.path().to_path_buf()));

        let path = writer.write(&meta(), &rendered(), fixed_time()).unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "clip_transcript_20240301_143005.txt"
        );
        assert!(path.exists());
    }

    #[test]
    fn test_artifact_layout() {
        let dir = tempfile::tempdir().unwrap();
        let writer = TranscriptWriter::new(Some(dir.path().to_path_buf()));

        let path = writer.write(&meta(), &rendered(), fixed_time()).unwrap();
        let content = fs::read_to_string(path).unwrap();

        let separator = "=".repeat(60);
        let expected = format!(
            "AudioScribe Transcript\nFile: clip.wav\nDate: 2024-03-01 14:30:05\n\
             Model: tiny\nLanguage: en\n{separator}\n\n[00:00 - 00:02]: hello\n\n\
             {separator}\nFull Text:\n\nhello"
        );
        assert_eq!(content, expected);
    }

    #[test]
    fn test_write_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("transcripts").join("2024");
        let writer = TranscriptWriter::new(Some(nested.clone()));

        let path = writer.write(&meta(), &rendered(), fixed_time()).unwrap();

        assert!(nested.is_dir());
        assert!(path.starts_with(&nested));
    }

    #[test]
    fn test_output_dir_prefers_configured_directory() {
        let writer = TranscriptWriter::new(Some(PathBuf::from("/tmp/transcripts")));
        assert_eq!(
            writer.output_dir().unwrap(),
            PathBuf::from("/tmp/transcripts")
        );
    }

    #[test]
    fn test_output_dir_falls_back_to_downloads() {
        let writer = TranscriptWriter::new(None);
        let expected = dirs::download_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
            .unwrap();
        assert_eq!(writer.output_dir().unwrap(), expected);
    }

    #[test]
    fn test_distinct_timestamps_never_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let writer = TranscriptWriter::new(Some(dir.path().to_path_buf()));

        let first = writer.write(&meta(), &rendered(), fixed_time()).unwrap();
        let later = Local.with_ymd_and_hms(2024, 3, 1, 14, 30, 6).unwrap();
        let second = writer.write(&meta(), &rendered(), later).unwrap();

        assert_ne!(first, second);
        assert!(first.exists());
        assert!(second.exists());
    }
}
