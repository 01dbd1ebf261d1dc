pub mod effects;
pub mod loader;
pub mod manager;
pub mod player;
pub mod registry;
pub mod session;
pub mod sink;
/// Audio system module
///
/// Layered playback for games:
/// - One current music track, crossfaded on every change
/// - Fire-and-forget sound effects, each trigger its own instance
/// - Up to six looping background sounds
/// - Master × category × relative volume, per-category mute, global pause
///
/// ## Architecture
///
/// ```text
/// AudioSystemManager
///   ├── AssetRegistry ── MediaLoader (FileLoader / SilentLoader)
///   ├── VolumeState      (levels + mute flags)
///   ├── FadeScheduler    (one FadeJob per handle, advanced per tick)
///   ├── MusicSession     (playlist, current handle)
///   └── BgsSession       (active looping handles)
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// use game_audio_manager::{AudioConfig, AudioSystemManager};
///
/// let config = AudioConfig::default();
/// let mut audio = AudioSystemManager::with_file_loader(&config)?;
///
/// audio.preload_music(&["title", "battle"]);
/// audio.preload_sfx(&["hit"]);
/// audio.play_music(Some("title"))?;
///
/// // Every frame
/// audio.update(frame_time);
///
/// audio.play_sfx("hit")?;
/// audio.next_music()?; // crossfades to "battle"
/// ```
pub mod source;

pub use effects::{FadeDirection, FadeJob, FadeScheduler, VolumeChannel, VolumeState};
pub use loader::{FileLoader, MediaLoader, SilentLoader};
pub use manager::AudioSystemManager;
pub use player::{HandleId, Playable, SilentHandle, TrackHandle};
pub use registry::AssetRegistry;
pub use source::{AssetKey, AudioCategory};
