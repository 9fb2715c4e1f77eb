use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::adapters::wav::write_wav;
use crate::domain::config::DiarizationConfig;
use crate::domain::{Device, EngineError, PcmAudio, SpeakerTurn};
use crate::ports::Diarizer;

const DEFAULT_BINARY: &str = "sherpa-onnx-offline-speaker-diarization";

/// Speaker diarizer backed by the sherpa-onnx offline diarization CLI.
///
/// Runs segmentation + embedding models against a temporary WAV and parses
/// the `start -- end speaker_NN` lines the tool prints. The models are
/// plain local files; the gated upstream weights they are converted from
/// are fetched out-of-band with the credential token, so the token is not
/// forwarded here.
pub struct SherpaDiarizer {
    binary: PathBuf,
    segmentation_model: PathBuf,
    embedding_model: PathBuf,
}

impl SherpaDiarizer {
    pub fn new(
        binary: impl Into<PathBuf>,
        segmentation_model: impl Into<PathBuf>,
        embedding_model: impl Into<PathBuf>,
    ) -> Self {
        Self {
            binary: binary.into(),
            segmentation_model: segmentation_model.into(),
            embedding_model: embedding_model.into(),
        }
    }

    /// Build from configuration. Returns None when the model paths are not
    /// configured, in which case the pipeline records diarization as
    /// skipped.
    pub fn from_config(config: &DiarizationConfig) -> Option<Self> {
        let segmentation = config.segmentation_model.clone()?;
        let embedding = config.embedding_model.clone()?;
        let binary = config
            .binary
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BINARY));
        Some(Self::new(binary, segmentation, embedding))
    }
}

#[async_trait]
impl Diarizer for SherpaDiarizer {
    async fn diarize(
        &self,
        audio: &PcmAudio,
        _token: &str,
        device: Device,
    ) -> Result<Vec<SpeakerTurn>, EngineError> {
        for (model, label) in [
            (&self.segmentation_model, "segmentation"),
            (&self.embedding_model, "embedding"),
        ] {
            if !model.is_file() {
                return Err(EngineError::ModelMissing {
                    name: format!("{label} model"),
                    path: model.clone(),
                });
            }
        }

        let workdir = tempfile::tempdir()?;
        let wav_path = workdir.path().join("input.wav");
        let samples: Vec<f32> = audio.samples().to_vec();
        let wav_target = wav_path.clone();
        tokio::task::spawn_blocking(move || write_wav(&wav_target, &samples))
            .await
            .map_err(|e| EngineError::Backend(format!("task join error: {e}")))??;

        debug!(device = %device, "Starting speaker diarization");

        let output = Command::new(&self.binary)
            .arg(format!(
                "--segmentation.pyannote-model={}",
                self.segmentation_model.display()
            ))
            .arg(format!(
                "--embedding.model={}",
                self.embedding_model.display()
            ))
            .arg(&wav_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => EngineError::ToolMissing {
                    tool: DEFAULT_BINARY.to_string(),
                },
                _ => EngineError::Io(e.to_string()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("diarization failed with no diagnostic output")
                .to_string();
            return Err(EngineError::Backend(detail));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let turns = parse_diarization_output(&stdout);
        info!(turns = turns.len(), "Speaker diarization complete");
        Ok(turns)
    }
}

/// Parse `start -- end speaker_NN` lines, ignoring anything else the tool
/// prints (progress, timing stats). Labels are normalized to `SPEAKER_NN`
/// and turns sorted chronologically.
fn parse_diarization_output(stdout: &str) -> Vec<SpeakerTurn> {
    let mut turns: Vec<SpeakerTurn> = stdout.lines().filter_map(parse_turn_line).collect();
    turns.sort_by(|a, b| a.start.total_cmp(&b.start));
    turns
}

fn parse_turn_line(line: &str) -> Option<SpeakerTurn> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(start), Some("--"), Some(end), Some(label)) => {
            let start: f64 = start.parse().ok()?;
            let end: f64 = end.parse().ok()?;
            Some(SpeakerTurn::new(start, end, label.to_uppercase()))
        }
        _ => None,
    }
}
