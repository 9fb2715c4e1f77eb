use crate::domain::Segment;

/// How transcript lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// One `[start - end] [speaker]: text` line per segment.
    #[default]
    Timestamped,
    /// Speaker marker lines with bare text underneath.
    SpeakerBlocks,
}

/// Rendered transcript body plus the flat full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTranscript {
    pub body: String,
    pub full_text: String,
}

/// Render integer seconds as `MM:SS`, or `HH:MM:SS` from one hour up.
/// Fractional seconds are truncated, never rounded.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Assemble segments into a rendered transcript.
///
/// Segments whose text trims to nothing are dropped from both the body and
/// the full text. Order is preserved. Assembly is pure: the same segments
/// and mode always render the same output.
pub fn assemble(segments: &[Segment], mode: RenderMode) -> RenderedTranscript {
    let kept: Vec<(&Segment, &str)> = segments
        .iter()
        .filter_map(|segment| {
            let text = segment.text.trim();
            if text.is_empty() {
                None
            } else {
                Some((segment, text))
            }
        })
        .collect();

    let full_text = kept
        .iter()
        .map(|(_, text)| *text)
        .collect::<Vec<_>>()
        .join(" ");

    let body = match mode {
        RenderMode::Timestamped => kept
            .iter()
            .map(|(segment, text)| {
                let start = format_timestamp(segment.start);
                let end = format_timestamp(segment.end);
                match segment.speaker.as_deref() {
                    Some(speaker) => format!("[{start} - {end}] [{speaker}]: {text}"),
                    None => format!("[{start} - {end}]: {text}"),
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
        RenderMode::SpeakerBlocks => {
            let mut lines: Vec<String> = Vec::new();
            // Marker comparison is against the previous segment's speaker,
            // so a speaker returning after an unattributed gap is re-marked.
            let mut previous: Option<&str> = None;
            for (segment, text) in &kept {
                let speaker = segment.speaker.as_deref();
                if let Some(name) = speaker {
                    if previous != Some(name) {
                        if !lines.is_empty() {
                            lines.push(String::new());
                        }
                        lines.push(format!("[{name}]"));
                    }
                }
                lines.push((*text).to_string());
                previous = speaker;
            }
            lines.join("\n")
        }
    };

    RenderedTranscript { body, full_text }
}
