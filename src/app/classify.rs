use std::path::Path;

use crate::domain::{EngineError, RunError};

/// Pipeline stages, in execution order.
///
/// Used for progress milestones and to pick stage-specific remediation
/// hints when a stage fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadModel,
    DecodeAudio,
    Transcribe,
    Align,
    Diarize,
    Assemble,
    Persist,
}

/// Progress report emitted once every stage has finished.
pub const PROGRESS_COMPLETE: (f32, &str) = (1.0, "Complete!");

impl Stage {
    /// Short name for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::LoadModel => "load_model",
            Stage::DecodeAudio => "decode_audio",
            Stage::Transcribe => "transcribe",
            Stage::Align => "align",
            Stage::Diarize => "diarize",
            Stage::Assemble => "assemble",
            Stage::Persist => "persist",
        }
    }

    /// Progress milestone emitted when the stage begins. Persisting is
    /// folded into the formatting milestone and reports nothing of its own.
    pub fn milestone(&self) -> Option<(f32, &'static str)> {
        match self {
            Stage::LoadModel => Some((0.1, "Loading model...")),
            Stage::DecodeAudio => Some((0.2, "Loading audio...")),
            Stage::Transcribe => Some((0.3, "Transcribing...")),
            Stage::Align => Some((0.6, "Aligning transcription...")),
            Stage::Diarize => Some((0.7, "Identifying speakers...")),
            Stage::Assemble => Some((0.9, "Formatting output...")),
            Stage::Persist => None,
        }
    }
}

/// Map an engine failure to a classified, user-facing run error.
///
/// This is the single place remediation text is chosen. Degraded stages
/// (alignment, diarization) are handled at their stage boundary and never
/// pass through here.
pub fn classify(stage: Stage, err: EngineError) -> RunError {
    match err {
        EngineError::ToolMissing { tool } => RunError::EnvironmentMissing {
            hint: install_hint(&tool),
            tool,
        },
        EngineError::ModelMissing { name, path } => RunError::EnvironmentMissing {
            tool: name,
            hint: model_hint(stage, &path),
        },
        EngineError::OutOfMemory(detail) => RunError::ResourceExhausted {
            detail,
            hint: OOM_HINT.to_string(),
        },
        EngineError::Backend(detail) if mentions_out_of_memory(&detail) => {
            RunError::ResourceExhausted {
                detail,
                hint: OOM_HINT.to_string(),
            }
        }
        EngineError::DecodeFailed(detail) => RunError::Unclassified {
            detail: format!("could not decode audio: {detail}"),
            hint: "Check that the file contains valid audio and is not corrupted.".to_string(),
        },
        EngineError::Config(detail) => RunError::Unclassified {
            detail: format!("configuration error: {detail}"),
            hint: "Check the configuration file for invalid values.".to_string(),
        },
        other => RunError::Unclassified {
            detail: other.to_string(),
            hint: generic_hint(stage),
        },
    }
}

const OOM_HINT: &str =
    "Try a smaller model size such as tiny or base, or free accelerator memory and run again.";

fn mentions_out_of_memory(detail: &str) -> bool {
    detail.to_lowercase().contains("out of memory")
}

fn install_hint(tool: &str) -> String {
    match tool {
        "ffmpeg" => {
            "Install FFmpeg and ensure it is on PATH (https://ffmpeg.org/download.html)."
                .to_string()
        }
        "whisper-cli" => {
            "Install whisper.cpp and ensure whisper-cli is on PATH \
             (https://github.com/ggerganov/whisper.cpp)."
                .to_string()
        }
        _ if tool.starts_with("sherpa-onnx") => {
            "Install sherpa-onnx and ensure its offline speaker diarization tool is on PATH \
             (https://github.com/k2-fsa/sherpa-onnx)."
                .to_string()
        }
        _ => format!("Install {tool} and ensure it is on PATH."),
    }
}

fn model_hint(stage: Stage, path: &Path) -> String {
    match stage {
        Stage::Diarize => format!(
            "Download the speaker diarization models and place them at {} \
             (pretrained segmentation and embedding models are published with sherpa-onnx).",
            path.display()
        ),
        _ => format!(
            "Download the model to {} (pretrained ggml models are published at \
             https://huggingface.co/ggerganov/whisper.cpp).",
            path.display()
        ),
    }
}

fn generic_hint(stage: Stage) -> String {
    match stage {
        Stage::Persist => {
            "Check that the output directory is writable and the disk is not full.".to_string()
        }
        _ => "Check the log for details and run again.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::domain::FailureKind;

    #[test]
    fn test_tool_missing_maps_to_environment() {
        let err = classify(
            Stage::DecodeAudio,
            EngineError::ToolMissing {
                tool: "ffmpeg".to_string(),
            },
        );
        assert_eq!(err.kind(), FailureKind::EnvironmentMissing);
        let message = err.to_string();
        assert!(message.contains("ffmpeg is required"));
        assert!(message.contains("ffmpeg.org"));
    }

    #[test]
    fn test_model_missing_hint_names_the_path() {
        let err = classify(
            Stage::LoadModel,
            EngineError::ModelMissing {
                name: "ggml-tiny.bin".to_string(),
                path: PathBuf::from("/models/ggml-tiny.bin"),
            },
        );
        assert_eq!(err.kind(), FailureKind::EnvironmentMissing);
        let message = err.to_string();
        assert!(message.contains("/models/ggml-tiny.bin"));
        assert!(message.contains("huggingface.co/ggerganov/whisper.cpp"));
    }

    #[test]
    fn test_model_missing_hint_differs_for_diarization() {
        let err = classify(
            Stage::Diarize,
            EngineError::ModelMissing {
                name: "segmentation.onnx".to_string(),
                path: PathBuf::from("/models/segmentation.onnx"),
            },
        );
        assert!(err.to_string().contains("sherpa-onnx"));
    }

    #[test]
    fn test_out_of_memory_maps_to_resource_exhausted() {
        let err = classify(
            Stage::Transcribe,
            EngineError::OutOfMemory("CUDA error".to_string()),
        );
        assert_eq!(err.kind(), FailureKind::ResourceExhausted);
        assert!(err.to_string().contains("smaller model"));
    }

    #[test]
    fn test_backend_text_is_sniffed_for_oom() {
        let err = classify(
            Stage::Transcribe,
            EngineError::Backend("CUBLAS failure: Out of Memory at layer 3".to_string()),
        );
        assert_eq!(err.kind(), FailureKind::ResourceExhausted);
    }

    #[test]
    fn test_persist_io_hints_at_disk() {
        let err = classify(Stage::Persist, EngineError::Io("permission denied".to_string()));
        assert_eq!(err.kind(), FailureKind::UnclassifiedFailure);
        let message = err.to_string();
        assert!(message.contains("permission denied"));
        assert!(message.contains("writable"));
    }

    #[test]
    fn test_unknown_backend_error_keeps_raw_text() {
        let err = classify(
            Stage::Transcribe,
            EngineError::Backend("tensor shape mismatch".to_string()),
        );
        assert_eq!(err.kind(), FailureKind::UnclassifiedFailure);
        assert!(err.to_string().contains("tensor shape mismatch"));
    }

    #[test]
    fn test_milestones_are_monotonic() {
        let stages = [
            Stage::LoadModel,
            Stage::DecodeAudio,
            Stage::Transcribe,
            Stage::Align,
            Stage::Diarize,
            Stage::Assemble,
        ];
        let mut last = 0.0f32;
        for stage in stages {
            let (fraction, label) = stage.milestone().unwrap();
            assert!(fraction > last, "{} did not advance", stage.name());
            assert!(!label.is_empty());
            last = fraction;
        }
        assert!(PROGRESS_COMPLETE.0 > last);
        assert!(Stage::Persist.milestone().is_none());
    }
}
