// Integration tests for the audio manager
// These drive the public API with silent handles and synthetic ticks

use std::sync::Arc;
use std::time::Duration;

use approx::assert_relative_eq;
use game_audio_manager::{
    AudioCategory, AudioConfig, AudioError, AudioEvent, AudioSystemManager, FadeDirection,
    SilentLoader, TrackHandle, VolumeChannel,
};

fn manager() -> AudioSystemManager {
    AudioSystemManager::new(&AudioConfig::default(), Box::new(SilentLoader::new()))
}

fn handle(manager: &AudioSystemManager, category: AudioCategory, name: &str) -> TrackHandle {
    manager
        .handle(category, name)
        .cloned()
        .unwrap_or_else(|| panic!("{category}:{name} not registered"))
}

fn run_ticks(manager: &mut AudioSystemManager, ticks: usize) {
    for _ in 0..ticks {
        manager.tick();
    }
}

#[test]
fn test_volume_setters_clamp() {
    let mut manager = manager();
    for input in [-1.0_f64, -0.0001, 0.0, 0.42, 1.0, 1.5, 100.0] {
        let expected = input.clamp(0.0, 1.0);
        assert_eq!(manager.set_music_volume(input), expected);
        assert_eq!(manager.set_sfx_volume(input), expected);
        assert_eq!(manager.set_bgs_volume(input), expected);
        assert_eq!(manager.set_master_volume(input), expected);
        for channel in [
            VolumeChannel::Music,
            VolumeChannel::Sfx,
            VolumeChannel::Bgs,
            VolumeChannel::Master,
        ] {
            assert_eq!(manager.volumes().level(channel), expected);
        }
    }

    manager.set_master_volume(0.9);
    assert_eq!(manager.change_volume(VolumeChannel::Master, 0.5), 1.0);
    assert_eq!(manager.change_volume(VolumeChannel::Master, -2.0), 0.0);
}

#[test]
fn test_sfx_loudness_follows_hierarchy() {
    let mut manager = manager();
    manager.set_sfx_volume(0.5);
    manager.set_master_volume(0.8);

    let instance = manager.play_sfx_at("hit", 0.5).unwrap().unwrap();
    assert_relative_eq!(instance.volume(), 0.5 * 0.5 * 0.8);
    assert!(instance.is_playing());

    manager.toggle_mute_sfx();
    assert!(manager.play_sfx("hit").unwrap().is_none());
}

#[test]
fn test_sfx_instances_overlap() {
    let mut manager = manager();
    manager.preload_sfx(&["hit"]);

    let first = manager.play_sfx("hit").unwrap().unwrap();
    let second = manager.play_sfx("hit").unwrap().unwrap();
    let base = handle(&manager, AudioCategory::Sfx, "hit");

    assert_ne!(first, second);
    assert!(first.is_playing());
    assert!(second.is_playing());
    assert!(!base.is_playing());
}

#[test]
fn test_sfx_mute_leaves_running_instances() {
    let mut manager = manager();
    let instance = manager.play_sfx("hit").unwrap().unwrap();

    manager.toggle_mute_sfx();
    assert!(instance.is_playing());

    manager.pause_all();
    assert!(instance.is_playing());
}

#[test]
fn test_fade_in_reaches_ceiling_in_exact_ticks() {
    let mut manager = manager();
    manager.set_music_volume(0.8);
    manager.set_master_volume(0.5);
    manager.preload_music(&["a"]);
    manager
        .play_music_with_fade(Some("a"), Duration::from_millis(730))
        .unwrap();

    let track = handle(&manager, AudioCategory::Music, "a");
    let ceiling = 0.8 * 0.5;
    let expected_ticks = 15; // ceil(730 / 50)

    let mut last = track.volume();
    for tick in 1..=expected_ticks {
        manager.tick();
        assert!(track.volume() >= last);
        last = track.volume();
        if tick < expected_ticks {
            assert!(track.volume() < ceiling, "ceiling reached early at tick {tick}");
        }
    }
    assert_eq!(track.volume(), ceiling);
    assert!(manager.fades().is_idle());
}

#[test]
fn test_crossfade_completes_once_per_side() {
    let mut manager = manager();
    manager.preload_music(&["a", "b", "c"]);
    let (rx, _id) = manager.events().subscribe();

    manager.play_music(Some("a")).unwrap();
    run_ticks(&mut manager, 20);
    manager.play_music(Some("b")).unwrap();
    run_ticks(&mut manager, 40);

    let a = handle(&manager, AudioCategory::Music, "a");
    let b = handle(&manager, AudioCategory::Music, "b");
    assert_eq!(a.volume(), 0.0);
    assert!(!a.is_playing());
    assert_eq!(a.position(), Duration::ZERO);
    assert_eq!(b.volume(), 1.0);
    assert!(b.is_playing());

    let completions: Vec<_> = rx
        .try_iter()
        .filter_map(|event| match event {
            AudioEvent::FadeCompleted { key, direction } => Some((key.name, direction)),
            _ => None,
        })
        .collect();
    assert_eq!(
        completions,
        vec![
            ("a".to_string(), FadeDirection::In),
            ("a".to_string(), FadeDirection::Out),
            ("b".to_string(), FadeDirection::In),
        ]
    );
}

#[test]
fn test_playlist_scenario() {
    let mut manager = manager();
    manager.preload_music(&["a", "b", "c"]);
    manager.play_music(Some("a")).unwrap();
    run_ticks(&mut manager, 20);

    manager
        .play_music_with_fade(Some("b"), Duration::from_millis(1000))
        .unwrap();
    let b = handle(&manager, AudioCategory::Music, "b");

    run_ticks(&mut manager, 19);
    assert!(b.volume() < 1.0);
    manager.tick();

    assert_eq!(b.volume(), manager.volumes().ceiling(AudioCategory::Music));
    assert_eq!(manager.current_music(), Some(&b));
    assert_eq!(manager.current_index(), 1);
}

#[test]
fn test_next_and_previous_wrap() {
    let mut manager = manager();
    manager.preload_music(&["a", "b", "c"]);

    manager.play_music(Some("c")).unwrap();
    assert_eq!(manager.current_index(), 2);
    manager.next_music().unwrap();
    assert_eq!(manager.current_index(), 0);
    assert_eq!(manager.current_music().map(|h| h.name()), Some("a"));

    manager.previous_music().unwrap();
    assert_eq!(manager.current_index(), 2);
    assert_eq!(manager.current_music().map(|h| h.name()), Some("c"));
}

#[test]
fn test_rapid_track_changes_settle() {
    let mut manager = manager();
    manager.preload_music(&["a", "b"]);

    manager.play_music(Some("a")).unwrap();
    run_ticks(&mut manager, 20);
    manager.play_music(Some("b")).unwrap();
    run_ticks(&mut manager, 5);
    manager.play_music(Some("a")).unwrap();
    run_ticks(&mut manager, 5);
    manager.play_music(Some("b")).unwrap();

    let a = handle(&manager, AudioCategory::Music, "a");
    let b = handle(&manager, AudioCategory::Music, "b");

    // One job per handle at any time
    assert_eq!(manager.fades().active_jobs(), 2);

    run_ticks(&mut manager, 20);
    assert!(manager.fades().is_idle());
    assert_eq!(a.volume(), 0.0);
    assert!(!a.is_playing());
    assert_eq!(b.volume(), 1.0);
    assert!(b.is_playing());
}

#[test]
fn test_music_playing_and_audible() {
    let mut manager = manager();
    manager.preload_music(&["a"]);
    assert!(!manager.is_music_playing());

    manager.play_music(Some("a")).unwrap();
    assert!(manager.is_music_playing());
    assert!(!manager.is_music_audible());

    manager.tick();
    assert!(manager.is_music_audible());

    manager.toggle_mute_music();
    assert!(!manager.is_music_playing());
    assert!(!manager.is_music_audible());
}

#[test]
fn test_bgs_capacity() {
    let mut manager = manager();
    for name in ["a", "b", "c", "d", "e", "f"] {
        manager.play_bgs(name).unwrap();
    }
    assert_eq!(manager.active_bgs().len(), 6);

    let result = manager.play_bgs("g");
    assert!(matches!(result, Err(AudioError::CapacityExceeded { max: 6 })));
    assert_eq!(manager.active_bgs().len(), 6);
    assert!(!manager.is_bgs_playing("g"));
}

#[test]
fn test_stop_bgs() {
    let mut manager = manager();
    manager.play_bgs("rain").unwrap();
    manager.play_bgs("wind").unwrap();
    run_ticks(&mut manager, 3);

    let rain = handle(&manager, AudioCategory::Bgs, "rain");
    manager.stop_bgs("rain").unwrap();
    assert!(!rain.is_playing());
    assert_eq!(rain.position(), Duration::ZERO);
    assert!(matches!(manager.stop_bgs("rain"), Err(AudioError::NotPlaying(_))));

    manager.stop_all_bgs();
    assert!(manager.active_bgs().is_empty());
    assert!(!handle(&manager, AudioCategory::Bgs, "wind").is_playing());
}

#[test]
fn test_bgs_volume_scenario() {
    let mut manager = manager();
    manager.play_bgs("rain").unwrap();

    manager.set_bgs_volume(0.5);
    manager.set_master_volume(0.4);

    let rain = handle(&manager, AudioCategory::Bgs, "rain");
    assert_relative_eq!(rain.volume(), 0.2);
}

#[test]
fn test_master_volume_reaches_music() {
    let mut manager = manager();
    manager.preload_music(&["a"]);
    manager.play_music(Some("a")).unwrap();
    run_ticks(&mut manager, 20);

    manager.set_master_volume(0.25);
    assert_relative_eq!(handle(&manager, AudioCategory::Music, "a").volume(), 0.25);
}

#[test]
fn test_bgs_mute_toggle() {
    let mut manager = manager();
    manager.play_bgs("rain").unwrap();
    manager.play_bgs("wind").unwrap();
    manager.preload_bgs(&["birds"]);

    assert!(manager.toggle_mute_bgs());
    assert_eq!(manager.active_bgs().len(), 2);
    assert!(manager.active_bgs().iter().all(|h| !h.is_playing()));
    assert!(matches!(manager.play_bgs("birds"), Ok(())));
    assert!(!manager.is_bgs_playing("birds"));

    assert!(!manager.toggle_mute_bgs());
    assert!(manager.active_bgs().iter().all(|h| h.is_playing()));
    assert!(!handle(&manager, AudioCategory::Bgs, "birds").is_playing());
}

#[test]
fn test_toggle_mute_all() {
    let mut manager = manager();
    manager.toggle_mute_music();

    assert!(manager.toggle_mute_all());
    for category in AudioCategory::ALL {
        assert!(manager.volumes().is_muted(category));
    }

    assert!(!manager.toggle_mute_all());
    for category in AudioCategory::ALL {
        assert!(!manager.volumes().is_muted(category));
    }
}

#[test]
fn test_pause_and_resume_all() {
    let mut manager = manager();
    manager.preload_music(&["a", "b"]);
    manager.preload_sfx(&["hit"]);
    manager.play_music(Some("a")).unwrap();
    manager.play_bgs("rain").unwrap();
    run_ticks(&mut manager, 4);

    let a = handle(&manager, AudioCategory::Music, "a");
    let b = handle(&manager, AudioCategory::Music, "b");
    let rain = handle(&manager, AudioCategory::Bgs, "rain");
    let hit = handle(&manager, AudioCategory::Sfx, "hit");

    manager.pause_all();
    manager.pause_all();
    assert!(manager.is_paused());
    assert!(!a.is_playing());
    assert!(!rain.is_playing());

    // Frozen while paused
    let volume = a.volume();
    run_ticks(&mut manager, 10);
    assert_eq!(a.volume(), volume);
    assert!(manager.play_bgs("wind").is_ok());
    assert!(!manager.is_bgs_playing("wind"));

    manager.resume_all();
    manager.resume_all();
    assert!(!manager.is_paused());
    assert!(a.is_playing());
    assert!(rain.is_playing());
    assert!(!b.is_playing());
    assert!(!hit.is_playing());
    assert_eq!(b.position(), Duration::ZERO);

    run_ticks(&mut manager, 16);
    assert_eq!(a.volume(), 1.0);
}

#[test]
fn test_unmute_while_paused_waits_for_resume() {
    let mut manager = manager();
    manager.play_bgs("rain").unwrap();
    manager.toggle_mute_bgs();
    manager.pause_all();

    manager.toggle_mute_bgs();
    let rain = handle(&manager, AudioCategory::Bgs, "rain");
    assert!(!rain.is_playing());

    manager.resume_all();
    assert!(rain.is_playing());
}

#[test]
fn test_load_failure_degrades_to_silent_handle() {
    let loader = Arc::new(SilentLoader::new().failing(["broken"]));
    let mut manager = AudioSystemManager::new(&AudioConfig::default(), Box::new(Arc::clone(&loader)));
    let (rx, _id) = manager.events().subscribe();

    manager.preload_music(&["broken", "ok"]);
    assert_eq!(loader.loaded(), vec!["music:ok".to_string()]);
    assert_eq!(manager.playlist().len(), 2);
    assert!(rx
        .try_iter()
        .any(|event| matches!(event, AudioEvent::LoadFailed { .. })));

    assert!(manager.play_music(Some("broken")).is_ok());
    assert!(manager.is_music_playing());
}

#[test]
fn test_lazy_load_on_first_play() {
    let loader = Arc::new(SilentLoader::new());
    let mut manager = AudioSystemManager::new(&AudioConfig::default(), Box::new(Arc::clone(&loader)));

    manager.play_bgs("rain").unwrap();
    manager.stop_bgs("rain").unwrap();
    manager.play_bgs("rain").unwrap();

    assert_eq!(loader.loaded(), vec!["bgs:rain".to_string()]);
}

#[test]
fn test_custom_tick_period() {
    let config = AudioConfig {
        tick_ms: 10,
        default_fade_ms: 100,
        ..AudioConfig::default()
    };
    let mut manager = AudioSystemManager::new(&config, Box::new(SilentLoader::new()));
    manager.preload_music(&["a"]);
    manager.play_music(None).unwrap();

    run_ticks(&mut manager, 9);
    assert!(!manager.fades().is_idle());
    manager.tick();
    assert!(manager.fades().is_idle());
}
