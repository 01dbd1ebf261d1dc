/// Playback sessions
///
/// Bookkeeping for what is currently playing: the music playlist with its
/// authoritative handle, and the bounded set of looping background sounds.
use super::effects::volume::clamp01;
use super::player::TrackHandle;
use crate::error::{AudioError, AudioResult};

/// Music playlist and the handle most recently made current
#[derive(Debug, Default)]
pub struct MusicSession {
    current: Option<TrackHandle>,
    playlist: Vec<String>,
    index: usize,
}

impl MusicSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track name, ignoring duplicates
    pub fn add(&mut self, name: &str) {
        if !self.playlist.iter().any(|n| n == name) {
            self.playlist.push(name.to_string());
        }
    }

    pub fn playlist(&self) -> &[String] {
        &self.playlist
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.playlist.iter().position(|n| n == name)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn select(&mut self, index: usize) {
        if index < self.playlist.len() {
            self.index = index;
        }
    }

    /// Name at the current index
    pub fn selected(&self) -> Option<&str> {
        self.playlist.get(self.index).map(String::as_str)
    }

    /// Move the index by `offset` with wraparound, returning the new index
    pub fn step(&mut self, offset: isize) -> Option<usize> {
        let len = self.playlist.len();
        if len == 0 {
            return None;
        }
        let len = len as isize;
        self.index = (self.index as isize + offset).rem_euclid(len) as usize;
        Some(self.index)
    }

    pub fn current(&self) -> Option<&TrackHandle> {
        self.current.as_ref()
    }

    /// Make `handle` authoritative, returning the handle it replaces
    pub fn replace_current(&mut self, handle: TrackHandle) -> Option<TrackHandle> {
        self.current.replace(handle)
    }
}

/// A looping background sound and the relative volume it was started at
#[derive(Debug, Clone)]
pub struct ActiveBgs {
    pub handle: TrackHandle,
    pub relative: f64,
}

/// Background sounds currently looping, at most `max_concurrent`
#[derive(Debug)]
pub struct BgsSession {
    active: Vec<ActiveBgs>,
    max_concurrent: usize,
}

impl BgsSession {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            active: Vec::with_capacity(max_concurrent),
            max_concurrent,
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.active.len() >= self.max_concurrent
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&ActiveBgs> {
        self.active.iter().find(|bgs| bgs.handle.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ActiveBgs> {
        self.active.iter_mut().find(|bgs| bgs.handle.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveBgs> {
        self.active.iter()
    }

    /// Track a newly started sound
    pub fn insert(&mut self, handle: TrackHandle, relative: f64) -> AudioResult<()> {
        if self.is_full() {
            return Err(AudioError::CapacityExceeded {
                max: self.max_concurrent,
            });
        }
        self.active.push(ActiveBgs {
            handle,
            relative: clamp01(relative),
        });
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<ActiveBgs> {
        let index = self.active.iter().position(|bgs| bgs.handle.name() == name)?;
        Some(self.active.remove(index))
    }

    pub fn drain(&mut self) -> Vec<ActiveBgs> {
        std::mem::take(&mut self.active)
    }
}
