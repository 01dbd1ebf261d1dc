/// Volume hierarchy
///
/// Master, per-category and per-sound relative levels multiply into the
/// loudness actually applied to a handle.
use std::fmt;
use std::str::FromStr;

use crate::audio_system::source::AudioCategory;
use crate::config::VolumeDefaults;
use crate::error::AudioError;

/// Clamp into [0, 1]; NaN counts as silence
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// A settable volume level: one per category plus master
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeChannel {
    Music,
    Sfx,
    Bgs,
    Master,
}

impl From<AudioCategory> for VolumeChannel {
    fn from(category: AudioCategory) -> Self {
        match category {
            AudioCategory::Music => VolumeChannel::Music,
            AudioCategory::Sfx => VolumeChannel::Sfx,
            AudioCategory::Bgs => VolumeChannel::Bgs,
        }
    }
}

impl fmt::Display for VolumeChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeChannel::Music => write!(f, "music"),
            VolumeChannel::Sfx => write!(f, "sfx"),
            VolumeChannel::Bgs => write!(f, "bgs"),
            VolumeChannel::Master => write!(f, "master"),
        }
    }
}

impl FromStr for VolumeChannel {
    type Err = AudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("master") {
            return Ok(VolumeChannel::Master);
        }
        s.parse::<AudioCategory>().map(VolumeChannel::from)
    }
}

/// Volume levels and mute flags for every category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeState {
    music: f64,
    sfx: f64,
    bgs: f64,
    master: f64,
    mute_music: bool,
    mute_sfx: bool,
    mute_bgs: bool,
}

impl VolumeState {
    pub fn new(music: f64, sfx: f64, bgs: f64, master: f64) -> Self {
        Self {
            music: clamp01(music),
            sfx: clamp01(sfx),
            bgs: clamp01(bgs),
            master: clamp01(master),
            mute_music: false,
            mute_sfx: false,
            mute_bgs: false,
        }
    }

    pub fn level(&self, channel: VolumeChannel) -> f64 {
        match channel {
            VolumeChannel::Music => self.music,
            VolumeChannel::Sfx => self.sfx,
            VolumeChannel::Bgs => self.bgs,
            VolumeChannel::Master => self.master,
        }
    }

    /// Store a clamped level, returning the stored value
    pub fn set_level(&mut self, channel: VolumeChannel, value: f64) -> f64 {
        let value = clamp01(value);
        let slot = match channel {
            VolumeChannel::Music => &mut self.music,
            VolumeChannel::Sfx => &mut self.sfx,
            VolumeChannel::Bgs => &mut self.bgs,
            VolumeChannel::Master => &mut self.master,
        };
        *slot = value;
        value
    }

    /// Add `delta` to the current level, clamping the result
    pub fn change_level(&mut self, channel: VolumeChannel, delta: f64) -> f64 {
        let current = self.level(channel);
        self.set_level(channel, current + delta)
    }

    pub fn is_muted(&self, category: AudioCategory) -> bool {
        match category {
            AudioCategory::Music => self.mute_music,
            AudioCategory::Sfx => self.mute_sfx,
            AudioCategory::Bgs => self.mute_bgs,
        }
    }

    pub fn set_muted(&mut self, category: AudioCategory, muted: bool) {
        match category {
            AudioCategory::Music => self.mute_music = muted,
            AudioCategory::Sfx => self.mute_sfx = muted,
            AudioCategory::Bgs => self.mute_bgs = muted,
        }
    }

    /// Flip the mute flag, returning the new state
    pub fn toggle_mute(&mut self, category: AudioCategory) -> bool {
        let muted = !self.is_muted(category);
        self.set_muted(category, muted);
        muted
    }

    pub fn all_muted(&self) -> bool {
        AudioCategory::ALL.iter().all(|c| self.is_muted(*c))
    }

    /// Loudness for a sound of `category` played at `relative` volume
    pub fn effective(&self, category: AudioCategory, relative: f64) -> f64 {
        if self.is_muted(category) {
            return 0.0;
        }
        clamp01(relative) * self.level(category.into()) * self.master
    }

    /// Full-scale loudness of a category (relative volume 1)
    pub fn ceiling(&self, category: AudioCategory) -> f64 {
        self.effective(category, 1.0)
    }
}

impl Default for VolumeState {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }
}

impl From<&VolumeDefaults> for VolumeState {
    fn from(defaults: &VolumeDefaults) -> Self {
        Self::new(defaults.music, defaults.sfx, defaults.bgs, defaults.master)
    }
}
