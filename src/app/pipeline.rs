use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use tracing::{debug, info, warn};

use crate::app::assemble::{assemble, RenderMode};
use crate::app::cache::ModelCache;
use crate::app::classify::{classify, Stage, PROGRESS_COMPLETE};
use crate::app::writer::{ArtifactMeta, TranscriptWriter};
use crate::domain::{
    assign_speakers, is_chronological, AudioSource, Device, FailureKind, ModelSize, ModelSpec,
    PcmAudio, RunError, Segment, StageOutcome, TranscriptionResult,
};
use crate::ports::{
    Aligner, AudioDecoder, ComputeProbe, Diarizer, Secret, SpeechEngine, TokenStore,
    TranscribeOptions,
};

/// Stage-boundary progress callback: `(fraction in [0,1], label)`.
pub type ProgressFn = dyn Fn(f32, &str) + Send + Sync;

/// The engine set one pipeline runs against.
///
/// Alignment and diarization are optional; a missing engine makes its
/// stage record a skip instead of failing the run.
pub struct Engines {
    pub probe: Arc<dyn ComputeProbe>,
    pub decoder: Arc<dyn AudioDecoder>,
    pub speech: Arc<dyn SpeechEngine>,
    pub aligner: Option<Arc<dyn Aligner>>,
    pub diarizer: Option<Arc<dyn Diarizer>>,
    pub tokens: Arc<dyn TokenStore>,
}

/// One transcription request.
#[derive(Debug, Clone)]
pub struct TranscribeRequest {
    /// Path to the input audio file.
    pub input: PathBuf,
    /// Model size to transcribe with.
    pub model: ModelSize,
    /// Explicit language code, or None for auto-detection.
    pub language: Option<String>,
    /// Attempt speaker identification.
    pub diarize: bool,
    /// Credential token for gated diarization models; takes precedence
    /// over the persisted token.
    pub token: Option<String>,
    /// How transcript lines are rendered.
    pub render_mode: RenderMode,
    /// Where the artifact is written; None means the downloads directory.
    pub output_dir: Option<PathBuf>,
}

impl TranscribeRequest {
    /// A request with default settings for the given input file.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            model: ModelSize::default(),
            language: None,
            diarize: false,
            token: None,
            render_mode: RenderMode::default(),
            output_dir: None,
        }
    }
}

/// What a completed run hands back to the host.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Rendered transcript body.
    pub transcript: String,
    /// Space-joined segment texts.
    pub full_text: String,
    /// Where the artifact was saved.
    pub output_path: PathBuf,
    /// Detected language after fallback.
    pub language: String,
    /// Whether alignment refined the timestamps.
    pub alignment: StageOutcome,
    /// Whether diarization attributed speakers.
    pub diarization: StageOutcome,
}

/// The transcription pipeline: decode, transcribe, refine, assemble, save.
///
/// Runs one request at a time; `run` takes `&mut self` so a second request
/// cannot start while one is in flight. The model cache is the only state
/// carried across runs.
pub struct Pipeline {
    engines: Engines,
    cache: ModelCache,
}

impl Pipeline {
    pub fn new(engines: Engines) -> Self {
        Self {
            engines,
            cache: ModelCache::new(),
        }
    }

    /// Whether a model is currently resident.
    pub fn model_loaded(&self) -> bool {
        self.cache.is_loaded()
    }

    /// Drop the cached model without waiting for the next run.
    pub fn release_model(&mut self) {
        self.cache.release();
    }

    /// Run one transcription request to completion.
    ///
    /// Fatal failures come back as classified errors; alignment and
    /// diarization degrade to skips recorded in the output instead.
    pub async fn run(
        &mut self,
        request: &TranscribeRequest,
        progress: Option<&ProgressFn>,
    ) -> Result<RunOutput, RunError> {
        let started_at = Local::now();

        // Input validation happens before any resource is touched.
        let source = AudioSource::new(&request.input)?;

        let profile = self.engines.probe.resolve();
        let spec = ModelSpec::new(request.model, profile, request.language.clone());

        info!(
            file = %source.file_name(),
            model = %request.model,
            device = %profile.device,
            diarize = request.diarize,
            "Transcription started"
        );

        report(progress, Stage::LoadModel);
        let speech = self.engines.speech.clone();
        let model = self
            .cache
            .acquire(speech.as_ref(), &spec)
            .await
            .map_err(|err| classify(Stage::LoadModel, err))?;

        report(progress, Stage::DecodeAudio);
        let audio = self
            .engines
            .decoder
            .decode(&source)
            .await
            .map_err(|err| classify(Stage::DecodeAudio, err))?;
        debug!(
            duration_secs = audio.duration_secs(),
            samples = audio.len(),
            "Audio decoded"
        );

        report(progress, Stage::Transcribe);
        let options = TranscribeOptions {
            language: request.language.clone(),
            batch_size: profile.batch_size(),
        };
        let raw = match model.transcribe(&audio, &options).await {
            Ok(raw) => raw,
            Err(err) => {
                let classified = classify(Stage::Transcribe, err);
                // Exhausted accelerator memory is handed back before the
                // error surfaces, so a retry with a smaller model can fit.
                if classified.kind() == FailureKind::ResourceExhausted {
                    self.cache.release();
                }
                return Err(classified);
            }
        };

        let language = raw
            .language
            .clone()
            .or_else(|| request.language.clone())
            .unwrap_or_else(|| "en".to_string());
        info!(language = %language, segments = raw.segments.len(), "Transcription finished");

        let mut result = TranscriptionResult {
            segments: raw.segments,
            language,
        };

        let alignment = self
            .align_segments(
                &mut result.segments,
                &result.language,
                &audio,
                profile.device,
                progress,
            )
            .await;

        let diarization = self
            .identify_speakers(&mut result.segments, &audio, profile.device, request, progress)
            .await;

        report(progress, Stage::Assemble);
        let rendered = assemble(&result.segments, request.render_mode);

        debug!(stage = Stage::Persist.name(), "Saving transcript");
        let writer = TranscriptWriter::new(request.output_dir.clone());
        let meta = ArtifactMeta {
            file_name: source.file_name().to_string(),
            stem: source.stem().to_string(),
            model: request.model,
            language: result.language.clone(),
        };
        let output_path = writer
            .write(&meta, &rendered, started_at)
            .map_err(|err| classify(Stage::Persist, err))?;

        if let Some(callback) = progress {
            let (fraction, label) = PROGRESS_COMPLETE;
            callback(fraction, label);
        }
        info!(path = ?output_path, "Transcription complete");

        Ok(RunOutput {
            transcript: rendered.body,
            full_text: rendered.full_text,
            output_path,
            language: result.language,
            alignment,
            diarization,
        })
    }

    /// Best-effort timestamp refinement. Any failure keeps the engine
    /// timestamps; a refinement that reorders segments or changes their
    /// count is discarded.
    async fn align_segments(
        &self,
        segments: &mut Vec<Segment>,
        language: &str,
        audio: &PcmAudio,
        device: Device,
        progress: Option<&ProgressFn>,
    ) -> StageOutcome {
        let Some(aligner) = &self.engines.aligner else {
            debug!("No aligner configured, keeping engine timestamps");
            return StageOutcome::skipped("no aligner configured");
        };

        report(progress, Stage::Align);
        match aligner.align(segments, language, audio, device).await {
            Ok(refined) => {
                if refined.len() != segments.len() || !is_chronological(&refined) {
                    warn!(
                        before = segments.len(),
                        after = refined.len(),
                        "Alignment broke segment ordering, keeping engine timestamps"
                    );
                    return StageOutcome::skipped("alignment output failed ordering checks");
                }
                *segments = refined;
                debug!("Alignment applied");
                StageOutcome::Applied
            }
            Err(err) => {
                warn!(error = %err, "Alignment failed, keeping engine timestamps");
                StageOutcome::skipped(format!("alignment failed: {err}"))
            }
        }
    }

    /// Best-effort speaker attribution, gated on the request flag and a
    /// credential token. Any failure leaves segments unattributed.
    async fn identify_speakers(
        &self,
        segments: &mut [Segment],
        audio: &PcmAudio,
        device: Device,
        request: &TranscribeRequest,
        progress: Option<&ProgressFn>,
    ) -> StageOutcome {
        if !request.diarize {
            debug!("Speaker identification disabled");
            return StageOutcome::skipped("speaker identification disabled");
        }

        let Some(diarizer) = &self.engines.diarizer else {
            info!("Speaker identification requested but no diarizer is configured");
            return StageOutcome::skipped("no diarizer configured");
        };

        let Some(token) = self.resolve_token(request) else {
            info!("Speaker identification skipped: no credential token provided");
            return StageOutcome::skipped("no credential token provided");
        };

        report(progress, Stage::Diarize);
        match diarizer.diarize(audio, token.expose(), device).await {
            Ok(turns) => {
                assign_speakers(segments, &turns);
                info!(turns = turns.len(), "Speaker identification complete");
                StageOutcome::Applied
            }
            Err(err) => {
                warn!(error = %err, "Speaker identification failed, continuing without speakers");
                StageOutcome::skipped(format!("diarization failed: {err}"))
            }
        }
    }

    /// Request-supplied token first, then the persisted one.
    fn resolve_token(&self, request: &TranscribeRequest) -> Option<Secret> {
        if let Some(token) = &request.token {
            let token = token.trim();
            if !token.is_empty() {
                return Some(Secret::new(token));
            }
        }
        match self.engines.tokens.load() {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "Could not read the credential token file");
                None
            }
        }
    }
}

fn report(progress: Option<&ProgressFn>, stage: Stage) {
    if let Some((fraction, label)) = stage.milestone() {
        debug!(stage = stage.name(), fraction = fraction, "Stage started");
        if let Some(callback) = progress {
            callback(fraction, label);
        }
    }
}
