/// Audio source categories
///
/// Each category has its own volume level, mute flag and asset folder.
use std::fmt;
use std::str::FromStr;

use crate::error::AudioError;

/// Audio source categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCategory {
    /// Looping music tracks, one audible at a time (crossfaded)
    Music,

    /// Fire-and-forget sound effects
    Sfx,

    /// Looping background sounds (ambience), several at once
    Bgs,
}

impl AudioCategory {
    pub const ALL: [AudioCategory; 3] = [AudioCategory::Music, AudioCategory::Sfx, AudioCategory::Bgs];

    /// Asset folder the category is stored under
    pub fn folder(&self) -> &'static str {
        match self {
            AudioCategory::Music => "music",
            AudioCategory::Sfx => "sfx",
            AudioCategory::Bgs => "bgs",
        }
    }

    /// Whether handles of this category loop by default
    pub fn loops(&self) -> bool {
        match self {
            AudioCategory::Music => true,
            AudioCategory::Sfx => false,
            AudioCategory::Bgs => true,
        }
    }
}

impl fmt::Display for AudioCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder())
    }
}

impl FromStr for AudioCategory {
    type Err = AudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "music" => Ok(AudioCategory::Music),
            "sfx" => Ok(AudioCategory::Sfx),
            "bgs" => Ok(AudioCategory::Bgs),
            _ => Err(AudioError::InvalidVolumeCategory(s.to_string())),
        }
    }
}

/// Registry key: `category:name`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetKey {
    pub category: AudioCategory,
    pub name: String,
}

impl AssetKey {
    pub fn new(category: AudioCategory, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
        }
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.name)
    }
}
