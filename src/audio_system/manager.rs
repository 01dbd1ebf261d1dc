/// Audio system manager
///
/// The explicit session object: owns the asset registry, the volume state,
/// the fade scheduler and the music/background sessions. Nothing is global;
/// the host keeps one manager and drives it with `tick`/`update`.
use std::time::Duration;

use super::effects::{FadeCompletion, FadeScheduler, VolumeChannel, VolumeState};
use super::loader::{FileLoader, MediaLoader};
use super::player::TrackHandle;
use super::registry::AssetRegistry;
use super::session::{BgsSession, MusicSession};
use super::source::AudioCategory;
use crate::config::AudioConfig;
use crate::error::{AudioError, AudioResult};
use crate::messaging::{AudioEvent, EventBus};

pub struct AudioSystemManager {
    registry: AssetRegistry,
    volumes: VolumeState,
    fades: FadeScheduler,
    music: MusicSession,
    bgs: BgsSession,
    default_fade: Duration,
    paused: bool,
    suspended: Vec<TrackHandle>,
    sfx: Vec<TrackHandle>,
    events: EventBus,
}

impl AudioSystemManager {
    /// Create a manager that loads sounds through `loader`
    pub fn new(config: &AudioConfig, loader: Box<dyn MediaLoader>) -> Self {
        let events = EventBus::new();
        Self {
            registry: AssetRegistry::new(loader, events.clone()),
            volumes: VolumeState::from(&config.volumes),
            fades: FadeScheduler::new(config.tick_period()),
            music: MusicSession::new(),
            bgs: BgsSession::new(config.max_concurrent_bgs),
            default_fade: config.default_fade(),
            paused: false,
            suspended: Vec::new(),
            sfx: Vec::new(),
            events,
        }
    }

    /// Create a manager playing files from `config.asset_root` on the default output device
    pub fn with_file_loader(config: &AudioConfig) -> AudioResult<Self> {
        let loader = FileLoader::new(config)?;
        Ok(Self::new(config, Box::new(loader)))
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn volumes(&self) -> &VolumeState {
        &self.volumes
    }

    pub fn fades(&self) -> &FadeScheduler {
        &self.fades
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn handle(&self, category: AudioCategory, name: &str) -> Option<&TrackHandle> {
        self.registry.get(category, name)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Load music tracks and append them to the playlist
    pub fn preload_music<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            let name = name.as_ref();
            self.registry.resolve(AudioCategory::Music, name);
            self.music.add(name);
        }
        tracing::info!("Playlist now has {} track(s)", self.music.playlist().len());
    }

    pub fn preload_sfx<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            self.registry.resolve(AudioCategory::Sfx, name.as_ref());
        }
    }

    pub fn preload_bgs<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            self.registry.resolve(AudioCategory::Bgs, name.as_ref());
        }
    }

    pub fn playlist(&self) -> &[String] {
        self.music.playlist()
    }

    pub fn current_index(&self) -> usize {
        self.music.index()
    }

    pub fn current_music(&self) -> Option<&TrackHandle> {
        self.music.current()
    }

    /// Play a track with the default crossfade
    pub fn play_music(&mut self, name: Option<&str>) -> AudioResult<()> {
        self.play_music_with_fade(name, self.default_fade)
    }

    /// Play `name` (or the selected playlist entry) and crossfade to it.
    ///
    /// A name missing from the playlist is still played from the registry,
    /// but `AssetNotFound` is reported afterwards.
    pub fn play_music_with_fade(&mut self, name: Option<&str>, fade: Duration) -> AudioResult<()> {
        if self.volumes.is_muted(AudioCategory::Music) {
            tracing::debug!("Music is muted, ignoring play request");
            return Ok(());
        }
        if self.paused {
            tracing::debug!("Playback is paused, ignoring music request");
            return Ok(());
        }

        let mut outcome = Ok(());
        let track = match name {
            Some(name) => {
                match self.music.position_of(name) {
                    Some(index) => self.music.select(index),
                    None => {
                        tracing::warn!("Music '{}' is not in the playlist", name);
                        outcome = Err(AudioError::AssetNotFound(name.to_string()));
                    }
                }
                name.to_string()
            }
            None => match self.music.selected() {
                Some(selected) => selected.to_string(),
                None => {
                    tracing::warn!("Cannot play music: playlist is empty");
                    return Err(AudioError::AssetNotFound("playlist is empty".to_string()));
                }
            },
        };

        let handle = self.registry.resolve(AudioCategory::Music, &track);
        handle.set_volume(0.0);
        handle.set_looping(true);
        if let Err(e) = handle.play() {
            tracing::warn!("Failed to start music '{}': {}", track, e);
            return Err(e);
        }

        let ceiling = self.volumes.ceiling(AudioCategory::Music);
        match self.music.replace_current(handle.clone()) {
            Some(previous) if previous != handle => {
                self.fades.crossfade(&previous, &handle, ceiling, fade);
            }
            _ => self.fades.fade_in(&handle, ceiling, fade),
        }

        tracing::info!("Playing music: {} (fade {}ms)", track, fade.as_millis());
        self.events.publish(AudioEvent::MusicStarted { name: track });
        outcome
    }

    pub fn next_music(&mut self) -> AudioResult<()> {
        self.step_music(1)
    }

    pub fn previous_music(&mut self) -> AudioResult<()> {
        self.step_music(-1)
    }

    fn step_music(&mut self, offset: isize) -> AudioResult<()> {
        if self.music.step(offset).is_none() {
            tracing::warn!("Cannot change track: playlist is empty");
            return Err(AudioError::AssetNotFound("playlist is empty".to_string()));
        }
        self.play_music(None)
    }

    pub fn is_music_playing(&self) -> bool {
        self.music.current().is_some_and(|h| h.is_playing())
    }

    /// Playing, not silent, and past the very start of the track
    pub fn is_music_audible(&self) -> bool {
        self.music.current().is_some_and(|h| {
            h.is_playing() && h.volume() > 0.0 && h.position() > Duration::ZERO
        })
    }

    /// Trigger a sound effect at full relative volume
    pub fn play_sfx(&mut self, name: &str) -> AudioResult<Option<TrackHandle>> {
        self.play_sfx_at(name, 1.0)
    }

    /// Sound effect instances that are still playing
    pub fn active_sfx(&self) -> &[TrackHandle] {
        &self.sfx
    }

    /// Trigger a fresh instance of a sound effect.
    ///
    /// The instance is not affected by mute or pause. The manager keeps it
    /// until it stops playing so ticks advance its clock, then releases it.
    pub fn play_sfx_at(&mut self, name: &str, relative: f64) -> AudioResult<Option<TrackHandle>> {
        if self.volumes.is_muted(AudioCategory::Sfx) || self.paused {
            return Ok(None);
        }

        let base = self.registry.resolve(AudioCategory::Sfx, name);
        let instance = base.duplicate().map_err(|e| {
            tracing::warn!("Failed to duplicate sound effect '{}': {}", name, e);
            e
        })?;
        instance.set_volume(self.volumes.effective(AudioCategory::Sfx, relative));
        instance.play().map_err(|e| {
            tracing::warn!("Failed to play sound effect '{}': {}", name, e);
            e
        })?;

        self.events.publish(AudioEvent::SfxTriggered {
            name: name.to_string(),
        });
        self.sfx.push(instance.clone());
        Ok(Some(instance))
    }

    pub fn active_bgs(&self) -> Vec<&TrackHandle> {
        self.bgs.iter().map(|bgs| &bgs.handle).collect()
    }

    pub fn is_bgs_playing(&self, name: &str) -> bool {
        self.bgs.contains(name)
    }

    pub fn play_bgs(&mut self, name: &str) -> AudioResult<()> {
        self.play_bgs_at(name, 1.0)
    }

    /// Start looping a background sound.
    ///
    /// Re-playing an active sound only updates its relative volume.
    pub fn play_bgs_at(&mut self, name: &str, relative: f64) -> AudioResult<()> {
        if self.volumes.is_muted(AudioCategory::Bgs) || self.paused {
            return Ok(());
        }

        if let Some(active) = self.bgs.get_mut(name) {
            active.relative = super::effects::clamp01(relative);
            active
                .handle
                .set_volume(self.volumes.effective(AudioCategory::Bgs, active.relative));
            return Ok(());
        }

        if self.bgs.is_full() {
            let err = AudioError::CapacityExceeded {
                max: self.bgs.max_concurrent(),
            };
            tracing::warn!("Not playing background sound '{}': {}", name, err);
            return Err(err);
        }

        let handle = self.registry.resolve(AudioCategory::Bgs, name);
        handle.set_looping(true);
        handle.set_volume(self.volumes.effective(AudioCategory::Bgs, relative));
        if let Err(e) = handle.play() {
            tracing::warn!("Failed to play background sound '{}': {}", name, e);
            return Err(e);
        }
        self.bgs.insert(handle, relative)?;

        tracing::info!("Playing background sound: {}", name);
        self.events.publish(AudioEvent::BgsStarted {
            name: name.to_string(),
        });
        Ok(())
    }

    pub fn stop_bgs(&mut self, name: &str) -> AudioResult<()> {
        let Some(active) = self.bgs.remove(name) else {
            tracing::warn!("Background sound '{}' is not playing", name);
            return Err(AudioError::NotPlaying(name.to_string()));
        };
        self.halt(&active.handle);
        self.events.publish(AudioEvent::BgsStopped {
            name: name.to_string(),
        });
        Ok(())
    }

    pub fn stop_all_bgs(&mut self) {
        for active in self.bgs.drain() {
            self.halt(&active.handle);
            self.events.publish(AudioEvent::BgsStopped {
                name: active.handle.name().to_string(),
            });
        }
        tracing::debug!("Stopped all background sounds");
    }

    fn halt(&mut self, handle: &TrackHandle) {
        self.fades.cancel(handle.id());
        self.suspended.retain(|h| h != handle);
        handle.pause();
        handle.seek_zero();
    }

    /// Suspend every playing handle. Fades freeze until `resume_all`.
    pub fn pause_all(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;

        // Music and background handles live in the registry too
        let mut suspended = Vec::new();
        for handle in self.registry.handles() {
            if handle.is_playing() {
                handle.pause();
                suspended.push(handle.clone());
            }
        }

        tracing::info!("Paused {} handle(s)", suspended.len());
        self.suspended = suspended;
        self.events.publish(AudioEvent::Paused);
    }

    /// Restart exactly the handles `pause_all` suspended
    pub fn resume_all(&mut self) {
        if !self.paused {
            return;
        }
        self.paused = false;

        let mut resumed = 0;
        for handle in std::mem::take(&mut self.suspended) {
            if self.volumes.is_muted(handle.key().category) {
                continue;
            }
            match handle.play() {
                Ok(()) => resumed += 1,
                Err(e) => tracing::warn!("Failed to resume {}: {}", handle.key(), e),
            }
        }

        tracing::info!("Resumed {} handle(s)", resumed);
        self.events.publish(AudioEvent::Resumed);
    }

    pub fn set_music_volume(&mut self, value: f64) -> f64 {
        self.set_volume(VolumeChannel::Music, value)
    }

    pub fn set_sfx_volume(&mut self, value: f64) -> f64 {
        self.set_volume(VolumeChannel::Sfx, value)
    }

    pub fn set_bgs_volume(&mut self, value: f64) -> f64 {
        self.set_volume(VolumeChannel::Bgs, value)
    }

    pub fn set_master_volume(&mut self, value: f64) -> f64 {
        self.set_volume(VolumeChannel::Master, value)
    }

    /// Store a clamped level and re-apply it to the affected active handles
    pub fn set_volume(&mut self, channel: VolumeChannel, value: f64) -> f64 {
        let level = self.volumes.set_level(channel, value);
        self.volume_changed(channel, level);
        level
    }

    /// Nudge a level by `delta`, e.g. for volume up/down buttons
    pub fn change_volume(&mut self, channel: VolumeChannel, delta: f64) -> f64 {
        let level = self.volumes.change_level(channel, delta);
        self.volume_changed(channel, level);
        level
    }

    /// `set_volume` addressed by channel name ("music", "sfx", "bgs", "master")
    pub fn set_volume_named(&mut self, channel: &str, value: f64) -> AudioResult<f64> {
        let channel = channel.parse::<VolumeChannel>().map_err(|e| {
            tracing::warn!("{}", e);
            e
        })?;
        Ok(self.set_volume(channel, value))
    }

    /// `change_volume` addressed by channel name
    pub fn change_volume_named(&mut self, channel: &str, delta: f64) -> AudioResult<f64> {
        let channel = channel.parse::<VolumeChannel>().map_err(|e| {
            tracing::warn!("{}", e);
            e
        })?;
        Ok(self.change_volume(channel, delta))
    }

    fn volume_changed(&mut self, channel: VolumeChannel, level: f64) {
        match channel {
            VolumeChannel::Music => self.apply_music_volume(),
            VolumeChannel::Bgs => self.apply_bgs_volume(),
            // Running sound effects keep the loudness they started with
            VolumeChannel::Sfx => {}
            VolumeChannel::Master => {
                self.apply_music_volume();
                self.apply_bgs_volume();
            }
        }
        tracing::debug!("{} volume set to {:.2}", channel, level);
        self.events.publish(AudioEvent::VolumeChanged { channel, level });
    }

    fn apply_music_volume(&self) {
        if let Some(current) = self.music.current() {
            // A running fade picks the new ceiling up on its next tick
            if !self.fades.is_fading(current.id()) {
                current.set_volume(self.volumes.ceiling(AudioCategory::Music));
            }
        }
    }

    fn apply_bgs_volume(&self) {
        for active in self.bgs.iter() {
            active
                .handle
                .set_volume(self.volumes.effective(AudioCategory::Bgs, active.relative));
        }
    }

    pub fn toggle_mute_music(&mut self) -> bool {
        self.toggle_mute(AudioCategory::Music)
    }

    pub fn toggle_mute_sfx(&mut self) -> bool {
        self.toggle_mute(AudioCategory::Sfx)
    }

    pub fn toggle_mute_bgs(&mut self) -> bool {
        self.toggle_mute(AudioCategory::Bgs)
    }

    /// Mute every category, or unmute them all if all were muted
    pub fn toggle_mute_all(&mut self) -> bool {
        let mute = !self.volumes.all_muted();
        for category in AudioCategory::ALL {
            if self.volumes.is_muted(category) != mute {
                self.toggle_mute(category);
            }
        }
        mute
    }

    /// Flip a category's mute flag, pausing or resuming its active handles.
    ///
    /// Returns the new mute state. Sound effects only change for future
    /// triggers.
    pub fn toggle_mute(&mut self, category: AudioCategory) -> bool {
        let muted = self.volumes.toggle_mute(category);

        let handles: Vec<TrackHandle> = match category {
            AudioCategory::Music => self.music.current().cloned().into_iter().collect(),
            AudioCategory::Bgs => self.bgs.iter().map(|bgs| bgs.handle.clone()).collect(),
            AudioCategory::Sfx => Vec::new(),
        };

        if muted {
            let settled = self.fades.settle_fade_outs(category);
            self.publish_completions(settled);
            for handle in &handles {
                handle.pause();
            }
        } else {
            match category {
                AudioCategory::Music => self.apply_music_volume(),
                AudioCategory::Bgs => self.apply_bgs_volume(),
                AudioCategory::Sfx => {}
            }
            for handle in handles {
                if self.paused {
                    // resume_all restarts it along with everything else
                    if !self.suspended.contains(&handle) {
                        self.suspended.push(handle);
                    }
                } else if let Err(e) = handle.play() {
                    tracing::warn!("Failed to resume {}: {}", handle.key(), e);
                }
            }
        }

        tracing::info!("{} {}", category, if muted { "muted" } else { "unmuted" });
        self.events.publish(AudioEvent::MuteToggled { category, muted });
        muted
    }

    pub fn tick_period(&self) -> Duration {
        self.fades.tick_period()
    }

    /// Advance all fades by one tick. Does nothing while paused.
    pub fn tick(&mut self) {
        if self.paused {
            return;
        }
        let completed = self.fades.tick(&self.volumes);
        let elapsed = self.fades.tick_period();
        self.registry.advance_all(elapsed);
        for instance in &self.sfx {
            instance.advance(elapsed);
        }
        self.sfx.retain(|instance| instance.is_playing());
        self.publish_completions(completed);
    }

    /// Run every tick that falls within `elapsed` wall-clock time.
    ///
    /// Hosts call this once per frame; leftover time carries over.
    pub fn update(&mut self, elapsed: Duration) {
        if self.paused {
            return;
        }
        for _ in 0..self.fades.due_ticks(elapsed) {
            self.tick();
        }
    }

    fn publish_completions(&self, completed: Vec<FadeCompletion>) {
        for completion in completed {
            self.events.publish(AudioEvent::FadeCompleted {
                key: completion.handle.key().clone(),
                direction: completion.direction,
            });
        }
    }
}
