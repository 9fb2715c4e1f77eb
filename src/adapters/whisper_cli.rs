use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info};

use crate::adapters::wav::write_wav;
use crate::domain::{EngineError, ModelSpec, PcmAudio, Segment};
use crate::ports::{RawTranscript, SpeechEngine, SpeechModel, TranscribeOptions};

/// Speech engine backed by the whisper.cpp CLI.
///
/// Each transcription hands the decoded PCM to the sidecar as a temporary
/// 16 kHz WAV (deleted when the call returns) and parses the JSON the CLI
/// writes back. Model weights live as ggml files under `models_dir`.
pub struct WhisperCliEngine {
    binary: PathBuf,
    models_dir: PathBuf,
    threads: u32,
}

impl WhisperCliEngine {
    /// Create an engine using `whisper-cli` from PATH.
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self::with_binary("whisper-cli", models_dir)
    }

    /// Create an engine using a specific binary.
    pub fn with_binary(binary: impl Into<PathBuf>, models_dir: impl Into<PathBuf>) -> Self {
        let threads = std::thread::available_parallelism()
            .map(|p| std::cmp::max(1, p.get() as u32 - 1))
            .unwrap_or(1);
        Self {
            binary: binary.into(),
            models_dir: models_dir.into(),
            threads,
        }
    }
}

#[async_trait]
impl SpeechEngine for WhisperCliEngine {
    fn name(&self) -> &'static str {
        "whisper-cli"
    }

    async fn load(&self, spec: &ModelSpec) -> Result<Box<dyn SpeechModel>, EngineError> {
        let model_path = self.models_dir.join(spec.size.ggml_file_name());
        if !model_path.is_file() {
            return Err(EngineError::ModelMissing {
                name: spec.size.ggml_file_name(),
                path: model_path,
            });
        }

        info!(model = %spec.size, path = ?model_path, "Resolved whisper model");

        Ok(Box::new(CliSpeechModel {
            binary: self.binary.clone(),
            model_path,
            threads: self.threads,
        }))
    }
}

/// One resolved model for the CLI backend. The sidecar loads the weights on
/// every invocation, so the handle is just the validated paths.
struct CliSpeechModel {
    binary: PathBuf,
    model_path: PathBuf,
    threads: u32,
}

#[async_trait]
impl SpeechModel for CliSpeechModel {
    async fn transcribe(
        &self,
        audio: &PcmAudio,
        options: &TranscribeOptions,
    ) -> Result<RawTranscript, EngineError> {
        let workdir = tempfile::tempdir()?;
        let wav_path = workdir.path().join("input.wav");
        let out_prefix = workdir.path().join("transcript");

        // Blocking file write off the async threads.
        let samples: Vec<f32> = audio.samples().to_vec();
        let wav_target = wav_path.clone();
        tokio::task::spawn_blocking(move || write_wav(&wav_target, &samples))
            .await
            .map_err(|e| EngineError::Backend(format!("task join error: {e}")))??;

        let language = options.language.as_deref().unwrap_or("auto");
        // The CLI has no batching control; options.batch_size only affects
        // in-process backends.
        debug!(
            language = language,
            threads = self.threads,
            batch_size = options.batch_size,
            "Starting whisper-cli transcription"
        );

        let output = Command::new(&self.binary)
            .arg("-m")
            .arg(&self.model_path)
            .arg("-f")
            .arg(&wav_path)
            .args(["-l", language])
            .args(["-t", &self.threads.to_string()])
            .arg("-oj")
            .arg("-of")
            .arg(&out_prefix)
            .arg("-np")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => EngineError::ToolMissing {
                    tool: "whisper-cli".to_string(),
                },
                _ => EngineError::Io(e.to_string()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("whisper-cli failed with no diagnostic output")
                .to_string();
            if detail.to_lowercase().contains("out of memory") {
                return Err(EngineError::OutOfMemory(detail));
            }
            return Err(EngineError::Backend(detail));
        }

        let json_path = out_prefix.with_extension("json");
        let json = std::fs::read_to_string(&json_path).map_err(|e| {
            EngineError::Backend(format!(
                "whisper-cli wrote no JSON output at {}: {e}",
                json_path.display()
            ))
        })?;
        let transcript = parse_cli_output(&json)?;

        info!(
            segments = transcript.segments.len(),
            detected_language = ?transcript.language,
            "whisper-cli transcription complete"
        );
        Ok(transcript)
    }
}

#[derive(Debug, Deserialize)]
struct CliOutput {
    result: Option<CliResult>,
    #[serde(default)]
    transcription: Vec<CliSegment>,
}

#[derive(Debug, Deserialize)]
struct CliResult {
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CliSegment {
    offsets: CliOffsets,
    text: String,
}

/// whisper.cpp reports offsets in milliseconds.
#[derive(Debug, Deserialize)]
struct CliOffsets {
    from: i64,
    to: i64,
}

fn parse_cli_output(json: &str) -> Result<RawTranscript, EngineError> {
    let output: CliOutput = serde_json::from_str(json)?;
    let segments = output
        .transcription
        .into_iter()
        .map(|s| {
            Segment::new(
                s.offsets.from as f64 / 1000.0,
                s.offsets.to as f64 / 1000.0,
                s.text.trim(),
            )
        })
        .collect();
    Ok(RawTranscript {
        segments,
        language: output.result.and_then(|r| r.language),
    })
}
