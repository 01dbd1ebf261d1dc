use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Reference fade tick (milliseconds)
pub const DEFAULT_TICK_MS: u64 = 50;

/// Default music transition length (milliseconds)
pub const DEFAULT_FADE_MS: u64 = 1000;

/// Maximum number of background sounds looping at once
pub const MAX_CONCURRENT_BGS: usize = 6;

fn default_extensions() -> Vec<String> {
    // Two lossy encodings first, lossless last
    vec!["ogg".to_string(), "mp3".to_string(), "wav".to_string()]
}

/// Initial volume levels, all in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeDefaults {
    pub music: f64,
    pub sfx: f64,
    pub bgs: f64,
    pub master: f64,
}

impl Default for VolumeDefaults {
    fn default() -> Self {
        Self {
            music: 1.0,
            sfx: 1.0,
            bgs: 1.0,
            master: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Directory holding the `music/`, `sfx/` and `bgs/` folders
    pub asset_root: PathBuf,

    /// File extensions tried in order when resolving an asset
    pub extensions: Vec<String>,

    /// Fade scheduler tick period in milliseconds
    pub tick_ms: u64,

    /// Default music crossfade length in milliseconds
    pub default_fade_ms: u64,

    /// Background sound slot limit
    pub max_concurrent_bgs: usize,

    /// Volume levels applied at startup
    pub volumes: VolumeDefaults,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            extensions: default_extensions(),
            tick_ms: DEFAULT_TICK_MS,
            default_fade_ms: DEFAULT_FADE_MS,
            max_concurrent_bgs: MAX_CONCURRENT_BGS,
            volumes: VolumeDefaults::default(),
        }
    }
}

impl AudioConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn default_fade(&self) -> Duration {
        Duration::from_millis(self.default_fade_ms)
    }

    /// Reject settings the scheduler and session cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms must be greater than 0".to_string()));
        }
        if self.max_concurrent_bgs == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent_bgs must be greater than 0".to_string(),
            ));
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one file extension is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        let config: AudioConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })?;
        config.validate()?;

        tracing::info!("Loaded audio config from: {}", path.display());
        Ok(config)
    }

    /// Load configuration, writing the defaults first if the file doesn't exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::load(path);
        }

        let config = AudioConfig::default();
        config.save(path)?;
        tracing::info!("Created default audio config at: {}", path.display());
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConfigError::DirectoryCreationFailed {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        fs::write(path, json).map_err(|e| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        Ok(())
    }
}
