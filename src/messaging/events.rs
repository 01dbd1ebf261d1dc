/// Audio events
///
/// Notifications of things that happened to playback (past tense). They are
/// broadcast to every subscriber of the [`EventBus`](super::EventBus).
use crate::audio_system::effects::{FadeDirection, VolumeChannel};
use crate::audio_system::source::{AssetKey, AudioCategory};

#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    /// A music track became current
    MusicStarted { name: String },

    /// A fade job reached its bound
    FadeCompleted {
        key: AssetKey,
        direction: FadeDirection,
    },

    /// A sound effect instance was triggered
    SfxTriggered { name: String },

    /// A background sound started looping
    BgsStarted { name: String },

    /// A background sound was stopped
    BgsStopped { name: String },

    /// A volume level changed
    VolumeChanged { channel: VolumeChannel, level: f64 },

    /// A category was muted or unmuted
    MuteToggled { category: AudioCategory, muted: bool },

    /// All playback was suspended
    Paused,

    /// Suspended playback was restored
    Resumed,

    /// Every source candidate for an asset failed
    LoadFailed { key: AssetKey, reason: String },
}

impl AudioEvent {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            AudioEvent::MusicStarted { name } => format!("Music started: {}", name),
            AudioEvent::FadeCompleted { key, direction } => {
                format!("Finished {} on {}", direction, key)
            }
            AudioEvent::SfxTriggered { name } => format!("Sound effect: {}", name),
            AudioEvent::BgsStarted { name } => format!("Background sound started: {}", name),
            AudioEvent::BgsStopped { name } => format!("Background sound stopped: {}", name),
            AudioEvent::VolumeChanged { channel, level } => {
                format!("{} volume: {:.2}", channel, level)
            }
            AudioEvent::MuteToggled { category, muted } => {
                if *muted {
                    format!("{} muted", category)
                } else {
                    format!("{} unmuted", category)
                }
            }
            AudioEvent::Paused => "Playback paused".to_string(),
            AudioEvent::Resumed => "Playback resumed".to_string(),
            AudioEvent::LoadFailed { key, reason } => format!("Failed to load {}: {}", key, reason),
        }
    }
}
