use std::path::PathBuf;

use tracing::info;
use zeroize::Zeroize;

use crate::domain::EngineError;
use crate::ports::{Secret, TokenStore};

const TOKEN_FILE_NAME: &str = ".audioscribe_token.txt";

/// Credential store backed by a single plaintext file in the user's home
/// directory. Read on demand, overwritten wholesale on save.
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    /// Store at the fixed per-user path (`~/.audioscribe_token.txt`).
    pub fn new() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            path: home.join(TOKEN_FILE_NAME),
        }
    }

    /// Store at an explicit path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for TokenFile {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for TokenFile {
    fn load(&self) -> Result<Option<Secret>, EngineError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let mut raw = std::fs::read_to_string(&self.path)?;
        let token = raw.trim();
        let secret = if token.is_empty() {
            None
        } else {
            Some(Secret::new(token))
        };
        raw.zeroize();
        Ok(secret)
    }

    fn save(&self, token: &str) -> Result<PathBuf, EngineError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(EngineError::Config("cannot save an empty token".to_string()));
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        info!(path = ?self.path, "Credential token saved");
        Ok(self.path.clone())
    }

    fn token_path(&self) -> PathBuf {
        self.path.clone()
    }
}
