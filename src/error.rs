use thiserror::Error;

/// Audio errors using thiserror for structured error handling.
///
/// Every variant is recoverable: public operations log the error through
/// `tracing` and hand it back to the caller instead of aborting.

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Audio asset not found: {0}")]
    AssetNotFound(String),

    #[error("Failed to load audio {name}: all {tried} source candidate(s) failed")]
    LoadFailure { name: String, tried: usize },

    #[error("Background sound capacity reached ({max} tracks playing)")]
    CapacityExceeded { max: usize },

    #[error("Background sound is not playing: {0}")]
    NotPlaying(String),

    #[error("Invalid volume category: {0}")]
    InvalidVolumeCategory(String),

    #[error("Audio backend failure")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AudioError {
    /// Wrap a platform error coming out of the playback backend
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        AudioError::Backend(Box::new(err))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to create config directory: {path}")]
    DirectoryCreationFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for audio operations
pub type AudioResult<T> = Result<T, AudioError>;
