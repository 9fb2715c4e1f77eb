use std::path::PathBuf;

use crate::domain::{AppConfig, EngineError};

/// Configuration store port for persisting and loading app configuration.
pub trait ConfigStore: Send + Sync {
    /// Load configuration from persistent storage.
    /// Returns defaults if none exists.
    fn load(&self) -> Result<AppConfig, EngineError>;

    /// Save configuration to persistent storage.
    fn save(&self, config: &AppConfig) -> Result<(), EngineError>;

    /// Get the path to the configuration file.
    fn config_path(&self) -> PathBuf;

    /// Get the path to the application data directory.
    fn data_dir(&self) -> PathBuf;

    /// Get the path to the logs directory.
    fn logs_dir(&self) -> PathBuf;
}
