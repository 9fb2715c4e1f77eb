use std::path::PathBuf;

use zeroize::Zeroize;

use crate::domain::EngineError;

/// A credential token held in memory only as long as the current request.
/// Zeroed on drop; never logged.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret {
    value: String,
}

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Borrow the secret for handoff to an engine.
    pub fn expose(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Port for credential-token persistence.
///
/// The store is a single plaintext token at a fixed per-user path, read on
/// demand and overwritten wholesale on save.
pub trait TokenStore: Send + Sync {
    /// Load the stored token. Absent or empty file yields None.
    fn load(&self) -> Result<Option<Secret>, EngineError>;

    /// Overwrite the stored token and return the path written. Empty
    /// tokens are rejected.
    fn save(&self, token: &str) -> Result<PathBuf, EngineError>;

    /// Where the token lives on disk.
    fn token_path(&self) -> PathBuf;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_never_prints_its_value() {
        let secret = Secret::new("hf_abc123");
        assert_eq!(format!("{secret:?}"), "Secret(***)");
        assert_eq!(secret.expose(), "hf_abc123");
    }

    #[test]
    fn test_secret_emptiness_ignores_whitespace() {
        assert!(Secret::new("  ").is_empty());
        assert!(!Secret::new("token").is_empty());
    }
}
