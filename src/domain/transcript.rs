use serde::{Deserialize, Serialize};

/// One transcribed span of speech.
///
/// Produced by the transcribe stage, refined in place by alignment
/// (timestamps) and diarization (speaker). Never reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Transcribed text.
    pub text: String,
    /// Speaker label, populated by diarization.
    pub speaker: Option<String>,
}

impl Segment {
    /// Create an unattributed segment.
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            speaker: None,
        }
    }
}

/// Ordered transcription output plus the language the engine settled on.
/// Owned by the current invocation, discarded after persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub segments: Vec<Segment>,
    pub language: String,
}

/// One speaker-labeled interval from the diarization engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerTurn {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Speaker label, e.g. "SPEAKER_00".
    pub speaker: String,
}

impl SpeakerTurn {
    pub fn new(start: f64, end: f64, speaker: impl Into<String>) -> Self {
        Self {
            start,
            end,
            speaker: speaker.into(),
        }
    }
}

/// Result of a best-effort stage: either its refinement was applied or the
/// stage was skipped for a recorded reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StageOutcome {
    Applied,
    Skipped { reason: String },
}

impl StageOutcome {
    /// Shorthand for the skipped variant.
    pub fn skipped(reason: impl Into<String>) -> Self {
        StageOutcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn was_applied(&self) -> bool {
        matches!(self, StageOutcome::Applied)
    }
}

/// True when segments are in non-decreasing start order.
pub fn is_chronological(segments: &[Segment]) -> bool {
    segments.windows(2).all(|pair| pair[0].start <= pair[1].start)
}

/// Assign each segment the speaker of the turn with the greatest temporal
/// overlap.
///
/// Ties resolve to the earlier turn (turns arrive in chronological order
/// from the diarization engine). A segment overlapping no turn keeps
/// `speaker = None`. Segment order is never changed.
pub fn assign_speakers(segments: &mut [Segment], turns: &[SpeakerTurn]) {
    for segment in segments.iter_mut() {
        let mut best: Option<(&SpeakerTurn, f64)> = None;
        for turn in turns {
            let overlap = overlap_secs(segment, turn);
            if overlap <= 0.0 {
                continue;
            }
            let better = match best {
                Some((_, best_overlap)) => overlap > best_overlap,
                None => true,
            };
            if better {
                best = Some((turn, overlap));
            }
        }
        segment.speaker = best.map(|(turn, _)| turn.speaker.clone());
    }
}

fn overlap_secs(segment: &Segment, turn: &SpeakerTurn) -> f64 {
    let start = segment.start.max(turn.start);
    let end = segment.end.min(turn.end);
    end - start
}
