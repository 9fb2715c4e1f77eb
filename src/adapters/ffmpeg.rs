use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::domain::{AudioSource, EngineError, PcmAudio};
use crate::ports::AudioDecoder;

/// Audio decoder backed by an FFmpeg subprocess.
///
/// FFmpeg handles every allow-listed container format and resamples to the
/// mono 16 kHz PCM the engines consume. Samples stream back over stdout;
/// nothing is written to disk.
pub struct FfmpegDecoder {
    binary: PathBuf,
}

impl FfmpegDecoder {
    /// Create a decoder using `ffmpeg` from PATH.
    pub fn new() -> Self {
        Self::with_binary("ffmpeg")
    }

    /// Create a decoder using a specific binary.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfmpegDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioDecoder for FfmpegDecoder {
    async fn decode(&self, source: &AudioSource) -> Result<PcmAudio, EngineError> {
        debug!(path = ?source.path(), "Decoding audio");

        let output = Command::new(&self.binary)
            .arg("-nostdin")
            .args(["-threads", "0"])
            .arg("-i")
            .arg(source.path())
            .args(["-f", "s16le", "-ac", "1", "-acodec", "pcm_s16le", "-ar", "16000", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => EngineError::ToolMissing {
                    tool: "ffmpeg".to_string(),
                },
                _ => EngineError::Io(e.to_string()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::DecodeFailed(stderr_tail(&stderr)));
        }

        let audio = PcmAudio::from_i16(&bytes_to_i16(&output.stdout));
        if audio.is_empty() {
            return Err(EngineError::DecodeFailed(
                "no audio samples produced".to_string(),
            ));
        }

        info!(
            duration_secs = audio.duration_secs(),
            samples = audio.len(),
            "Audio decoded"
        );
        Ok(audio)
    }
}

/// Reassemble little-endian byte pairs into 16-bit samples.
fn bytes_to_i16(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// FFmpeg prints a long banner before the actual error; the last non-empty
/// stderr line is the useful one.
fn stderr_tail(stderr: &str) -> String {
    stderr
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("ffmpeg produced no diagnostic output")
        .to_string()
}
