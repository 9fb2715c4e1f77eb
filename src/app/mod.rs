pub mod assemble;
pub mod cache;
pub mod classify;
pub mod pipeline;
pub mod writer;

pub use assemble::{assemble, format_timestamp, RenderMode, RenderedTranscript};
pub use cache::ModelCache;
pub use classify::{classify, Stage};
pub use pipeline::{Engines, Pipeline, ProgressFn, RunOutput, TranscribeRequest};
pub use writer::{ArtifactMeta, TranscriptWriter};
