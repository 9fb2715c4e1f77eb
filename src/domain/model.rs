use serde::{Deserialize, Serialize};

use crate::domain::compute::{ComputeProfile, Device, Precision};

/// Whisper model sizes, smallest to largest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelSize {
    /// Fastest, lowest accuracy. The default.
    #[default]
    Tiny,
    Base,
    Small,
    /// Good accuracy, needs several GB of memory.
    Medium,
    LargeV2,
    /// Highest accuracy, largest memory footprint.
    LargeV3,
}

impl ModelSize {
    /// All sizes, smallest first.
    pub const ALL: [ModelSize; 6] = [
        ModelSize::Tiny,
        ModelSize::Base,
        ModelSize::Small,
        ModelSize::Medium,
        ModelSize::LargeV2,
        ModelSize::LargeV3,
    ];

    /// Get the canonical size name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelSize::Tiny => "tiny",
            ModelSize::Base => "base",
            ModelSize::Small => "small",
            ModelSize::Medium => "medium",
            ModelSize::LargeV2 => "large-v2",
            ModelSize::LargeV3 => "large-v3",
        }
    }

    /// On-disk model file name for this size (ggml convention).
    pub fn ggml_file_name(&self) -> String {
        format!("ggml-{}.bin", self.as_str())
    }
}

impl std::fmt::Display for ModelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ModelSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tiny" => Ok(ModelSize::Tiny),
            "base" => Ok(ModelSize::Base),
            "small" => Ok(ModelSize::Small),
            "medium" => Ok(ModelSize::Medium),
            "large-v2" => Ok(ModelSize::LargeV2),
            "large-v3" => Ok(ModelSize::LargeV3),
            other => Err(format!(
                "unknown model size '{other}' (expected one of: tiny, base, small, medium, large-v2, large-v3)"
            )),
        }
    }
}

/// Composite key identifying one loaded model.
///
/// Any component change forces a reload: size and precision change the
/// weights, device changes where they live, and the language pin changes
/// how the backend is initialized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelSpec {
    pub size: ModelSize,
    pub device: Device,
    pub precision: Precision,
    /// Explicit language code, or None for auto-detection.
    pub language: Option<String>,
}

impl ModelSpec {
    /// Build the key from a requested size, the resolved compute profile,
    /// and an optional language pin.
    pub fn new(size: ModelSize, profile: ComputeProfile, language: Option<String>) -> Self {
        Self {
            size,
            device: profile.device,
            precision: profile.precision,
            language,
        }
    }
}

impl std::fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.size,
            self.device,
            self.precision,
            self.language.as_deref().unwrap_or("auto")
        )
    }
}
