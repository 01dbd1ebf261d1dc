//! Layered audio manager for games.
//!
//! Music crossfades, one-shot sound effects and looping background sounds,
//! mixed through a master × category × relative volume hierarchy. Fades are
//! driven by an explicit tick so hosts decide when time advances.

pub mod audio_system;
pub mod config;
pub mod error;
pub mod logging;
pub mod messaging;

pub use audio_system::{
    AssetKey, AudioCategory, AudioSystemManager, FadeDirection, FileLoader, MediaLoader, Playable,
    SilentHandle, SilentLoader, TrackHandle, VolumeChannel, VolumeState,
};
pub use config::AudioConfig;
pub use error::{AudioError, AudioResult, ConfigError};
pub use messaging::{AudioEvent, EventBus};
