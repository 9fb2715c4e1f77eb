use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::domain::{AppConfig, EngineError};
use crate::ports::ConfigStore;

/// TOML-based configuration store with OS-specific paths.
pub struct TomlConfigStore {
    data_dir: PathBuf,
}

impl TomlConfigStore {
    /// Create a new TomlConfigStore.
    /// Uses OS-specific application data directories.
    pub fn new() -> Result<Self, EngineError> {
        let data_dir = Self::get_data_dir()?;

        // Ensure the data directory exists
        fs::create_dir_all(&data_dir)?;

        info!(data_dir = ?data_dir, "ConfigStore initialized");

        Ok(Self { data_dir })
    }

    /// Get the OS-specific application data directory.
    /// - macOS: ~/Library/Application Support/AudioScribe/
    /// - Windows: %APPDATA%\AudioScribe\
    /// - Linux: ~/.config/AudioScribe/
    fn get_data_dir() -> Result<PathBuf, EngineError> {
        #[cfg(target_os = "macos")]
        {
            dirs::data_dir()
                .map(|p| p.join("AudioScribe"))
                .ok_or_else(|| {
                    EngineError::Config("Could not find application data directory".to_string())
                })
        }

        #[cfg(target_os = "windows")]
        {
            dirs::config_dir()
                .map(|p| p.join("AudioScribe"))
                .ok_or_else(|| {
                    EngineError::Config("Could not find application data directory".to_string())
                })
        }

        #[cfg(target_os = "linux")]
        {
            dirs::config_dir()
                .map(|p| p.join("AudioScribe"))
                .ok_or_else(|| {
                    EngineError::Config("Could not find application data directory".to_string())
                })
        }

        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        {
            Err(EngineError::Config(
                "Unsupported operating system".to_string(),
            ))
        }
    }

    /// Get the OS-specific log directory.
    /// - macOS: ~/Library/Application Support/AudioScribe/logs/
    /// - Windows: %LOCALAPPDATA%\AudioScribe\logs\
    /// - Linux: ~/.local/share/AudioScribe/logs/
    fn get_logs_dir(&self) -> PathBuf {
        #[cfg(target_os = "macos")]
        {
            self.data_dir.join("logs")
        }

        #[cfg(target_os = "windows")]
        {
            dirs::data_local_dir()
                .map(|p| p.join("AudioScribe").join("logs"))
                .unwrap_or_else(|| self.data_dir.join("logs"))
        }

        #[cfg(target_os = "linux")]
        {
            dirs::data_dir()
                .map(|p| p.join("AudioScribe").join("logs"))
                .unwrap_or_else(|| self.data_dir.join("logs"))
        }

        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        {
            self.data_dir.join("logs")
        }
    }
}

impl ConfigStore for TomlConfigStore {
    fn load(&self) -> Result<AppConfig, EngineError> {
        let config_path = self.config_path();

        if config_path.exists() {
            debug!(path = ?config_path, "Loading configuration");
            let content = fs::read_to_string(&config_path)?;
            let config: AppConfig = toml::from_str(&content)?;
            info!(path = ?config_path, "Configuration loaded");
            Ok(config)
        } else {
            info!(path = ?config_path, "Configuration file not found, creating default");
            let config = AppConfig::new();
            self.save(&config)?;
            Ok(config)
        }
    }

    fn save(&self, config: &AppConfig) -> Result<(), EngineError> {
        let config_path = self.config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&config_path, content)?;

        info!(path = ?config_path, "Configuration saved");
        Ok(())
    }

    fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }

    fn data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    fn logs_dir(&self) -> PathBuf {
        self.get_logs_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelSize;

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = TomlConfigStore {
            data_dir: temp_dir.path().to_path_buf(),
        };

        let mut config = AppConfig::new();
        config.transcription.model = ModelSize::Medium;
        config.logging.level = "debug".to_string();

        store.save(&config).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.transcription.model, ModelSize::Medium);
        assert_eq!(loaded.logging.level, "debug");
    }

    #[test]
    fn test_first_load_creates_default_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = TomlConfigStore {
            data_dir: temp_dir.path().to_path_buf(),
        };

        assert!(!store.config_path().exists());
        let config = store.load().unwrap();
        assert_eq!(config.transcription.model, ModelSize::Tiny);
        assert!(store.config_path().exists());
    }

    #[test]
    fn test_config_path_layout() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = TomlConfigStore {
            data_dir: temp_dir.path().to_path_buf(),
        };
        assert!(store.config_path().ends_with("config.toml"));
        assert_eq!(store.data_dir(), temp_dir.path());
    }

    #[test]
    fn test_data_dir_carries_branded_directory_name() {
        let data_dir = TomlConfigStore::get_data_dir().unwrap();
        assert_eq!(
            data_dir.file_name().and_then(|name| name.to_str()),
            Some("AudioScribe")
        );
    }
}
