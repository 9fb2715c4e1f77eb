use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::domain::{EngineError, ModelSpec, PcmAudio, Segment};
use crate::ports::{RawTranscript, SpeechEngine, SpeechModel, TranscribeOptions};

/// In-process speech engine using whisper.cpp via whisper-rs.
///
/// Loads the ggml weights into a `WhisperContext` once per model handle and
/// runs inference on the blocking pool. Dropping the handle frees the
/// context and whatever memory the backend holds.
pub struct WhisperRsEngine {
    models_dir: PathBuf,
    threads: u32,
}

impl WhisperRsEngine {
    /// Create an engine loading ggml files from `models_dir`.
    ///
    /// Threads are auto-detected (cores - 1).
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        let threads = std::thread::available_parallelism()
            .map(|p| std::cmp::max(1, p.get() as u32 - 1))
            .unwrap_or(1);
        Self {
            models_dir: models_dir.into(),
            threads,
        }
    }
}

#[async_trait]
impl SpeechEngine for WhisperRsEngine {
    fn name(&self) -> &'static str {
        "whisper-rs"
    }

    async fn load(&self, spec: &ModelSpec) -> Result<Box<dyn SpeechModel>, EngineError> {
        let model_path = self.models_dir.join(spec.size.ggml_file_name());
        if !model_path.is_file() {
            return Err(EngineError::ModelMissing {
                name: spec.size.ggml_file_name(),
                path: model_path,
            });
        }

        info!(model = %spec.size, path = ?model_path, "Loading whisper model");

        let path_str = model_path.to_string_lossy().to_string();
        let context = tokio::task::spawn_blocking(move || {
            WhisperContext::new_with_params(&path_str, WhisperContextParameters::default())
                .map_err(map_whisper_error)
        })
        .await
        .map_err(|e| EngineError::Backend(format!("task join error: {e}")))??;

        info!(model = %spec.size, "Whisper model loaded");

        Ok(Box::new(RsSpeechModel {
            context: Arc::new(context),
            threads: self.threads,
        }))
    }
}

struct RsSpeechModel {
    context: Arc<WhisperContext>,
    threads: u32,
}

#[async_trait]
impl SpeechModel for RsSpeechModel {
    async fn transcribe(
        &self,
        audio: &PcmAudio,
        options: &TranscribeOptions,
    ) -> Result<RawTranscript, EngineError> {
        if audio.is_empty() {
            return Ok(RawTranscript {
                segments: Vec::new(),
                language: None,
            });
        }

        debug!(
            samples = audio.len(),
            duration_secs = audio.duration_secs(),
            threads = self.threads,
            batch_size = options.batch_size,
            "Starting whisper-rs transcription"
        );

        let context = self.context.clone();
        let samples = audio.samples().to_vec();
        let language = options.language.clone();
        let threads = self.threads;

        // Inference is CPU-bound; run it on the blocking pool.
        let transcript = tokio::task::spawn_blocking(move || {
            let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
            params.set_n_threads(threads as i32);
            params.set_print_progress(false);
            params.set_print_realtime(false);
            params.set_print_timestamps(false);
            if let Some(ref lang) = language {
                params.set_language(Some(lang));
            }

            let mut state = context.create_state().map_err(map_whisper_error)?;
            state.full(params, &samples).map_err(map_whisper_error)?;

            let num_segments = state.full_n_segments().map_err(map_whisper_error)?;
            let mut segments = Vec::with_capacity(num_segments as usize);
            for i in 0..num_segments {
                let text = state.full_get_segment_text(i).map_err(map_whisper_error)?;
                // Timestamps arrive in centiseconds.
                let start = state.full_get_segment_t0(i).map_err(map_whisper_error)?;
                let end = state.full_get_segment_t1(i).map_err(map_whisper_error)?;
                segments.push(Segment::new(
                    start as f64 / 100.0,
                    end as f64 / 100.0,
                    text.trim(),
                ));
            }

            let detected = state
                .full_lang_id_from_state()
                .ok()
                .and_then(|id| whisper_rs::get_lang_str(id).map(|s| s.to_string()));

            Ok::<RawTranscript, EngineError>(RawTranscript {
                segments,
                language: detected,
            })
        })
        .await
        .map_err(|e| EngineError::Backend(format!("task join error: {e}")))??;

        info!(
            segments = transcript.segments.len(),
            detected_language = ?transcript.language,
            "whisper-rs transcription complete"
        );
        Ok(transcript)
    }
}

fn map_whisper_error(err: whisper_rs::WhisperError) -> EngineError {
    let detail = err.to_string();
    if detail.to_lowercase().contains("out of memory") {
        EngineError::OutOfMemory(detail)
    } else {
        EngineError::Backend(detail)
    }
}
