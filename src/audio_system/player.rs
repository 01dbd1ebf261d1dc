/// Playable handles
///
/// A handle is one loaded sound the session can start, pause, rewind and
/// whose loudness the fade scheduler reads and writes.
use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::effects::volume::clamp01;
use super::source::AssetKey;
use crate::error::AudioResult;

/// Platform side of a loaded sound
///
/// Implementations use interior mutability: a handle is shared between the
/// registry, the sessions and any fade job targeting it.
pub trait Playable: Send + Sync {
    /// Start or continue playback from the current position
    fn play(&self) -> AudioResult<()>;

    fn pause(&self);

    /// Reset the playback cursor to the start
    fn seek_zero(&self);

    fn volume(&self) -> f64;

    /// Set loudness; the backend clamps into [0, 1]
    fn set_volume(&self, volume: f64);

    fn is_looping(&self) -> bool;

    fn set_looping(&self, looping: bool);

    fn is_playing(&self) -> bool;

    /// Elapsed playback position
    fn position(&self) -> Duration;

    /// Fresh, independent instance of the same sound
    fn duplicate(&self) -> AudioResult<Arc<dyn Playable>>;

    /// Advance a simulated playback clock. Real backends track their own
    /// position and ignore this.
    fn advance(&self, _elapsed: Duration) {}
}

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a handle, stable across clones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

impl HandleId {
    fn next() -> Self {
        HandleId(NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared reference to a loaded sound plus the key it was loaded under
#[derive(Clone)]
pub struct TrackHandle {
    id: HandleId,
    key: AssetKey,
    inner: Arc<dyn Playable>,
}

impl TrackHandle {
    pub fn new(key: AssetKey, inner: Arc<dyn Playable>) -> Self {
        Self {
            id: HandleId::next(),
            key,
            inner,
        }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn key(&self) -> &AssetKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    /// Duplicate the underlying sound into a new, unowned handle
    pub fn duplicate(&self) -> AudioResult<TrackHandle> {
        Ok(TrackHandle::new(self.key.clone(), self.inner.duplicate()?))
    }
}

impl Deref for TrackHandle {
    type Target = dyn Playable;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl PartialEq for TrackHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TrackHandle {}

impl fmt::Debug for TrackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackHandle")
            .field("id", &self.id)
            .field("key", &self.key.to_string())
            .field("volume", &self.inner.volume())
            .field("playing", &self.inner.is_playing())
            .finish()
    }
}

#[derive(Debug, Default)]
struct SilentState {
    volume: f64,
    looping: bool,
    playing: bool,
    position: Duration,
    length: Option<Duration>,
}

/// In-memory handle with no audio output
///
/// Stands in for assets that failed to load, and backs headless sessions.
/// Its position only moves when [`Playable::advance`] is called.
#[derive(Debug, Default)]
pub struct SilentHandle {
    state: Mutex<SilentState>,
}

impl SilentHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// A non-looping instance stops by itself once `length` has elapsed
    pub fn with_length(length: Duration) -> Self {
        let handle = Self::default();
        handle.state.lock().length = Some(length);
        handle
    }
}

impl Playable for SilentHandle {
    fn play(&self) -> AudioResult<()> {
        self.state.lock().playing = true;
        Ok(())
    }

    fn pause(&self) {
        self.state.lock().playing = false;
    }

    fn seek_zero(&self) {
        self.state.lock().position = Duration::ZERO;
    }

    fn volume(&self) -> f64 {
        self.state.lock().volume
    }

    fn set_volume(&self, volume: f64) {
        self.state.lock().volume = clamp01(volume);
    }

    fn is_looping(&self) -> bool {
        self.state.lock().looping
    }

    fn set_looping(&self, looping: bool) {
        self.state.lock().looping = looping;
    }

    fn is_playing(&self) -> bool {
        self.state.lock().playing
    }

    fn position(&self) -> Duration {
        self.state.lock().position
    }

    fn duplicate(&self) -> AudioResult<Arc<dyn Playable>> {
        let state = self.state.lock();
        let copy = SilentHandle::default();
        {
            let mut fresh = copy.state.lock();
            fresh.volume = state.volume;
            fresh.looping = state.looping;
            fresh.length = state.length;
        }
        Ok(Arc::new(copy))
    }

    fn advance(&self, elapsed: Duration) {
        let mut state = self.state.lock();
        if !state.playing {
            return;
        }
        state.position += elapsed;
        if let Some(length) = state.length.filter(|l| !l.is_zero()) {
            if state.position >= length {
                if state.looping {
                    state.position = Duration::from_nanos(
                        (state.position.as_nanos() % length.as_nanos()) as u64,
                    );
                } else {
                    state.position = length;
                    state.playing = false;
                }
            }
        }
    }
}
