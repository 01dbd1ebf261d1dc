/// Messaging module
///
/// Playback notifications published by the audio system. Hosts subscribe to
/// react to track changes, finished fades or load failures without polling.
///
/// ```rust,ignore
/// let (rx, _id) = manager.events().subscribe();
/// manager.play_music(Some("title"))?;
///
/// while let Ok(event) = rx.try_recv() {
///     println!("{}", event.description());
/// }
/// ```

pub mod bus;
pub mod events;

pub use bus::{EventBus, SubscriberId};
pub use events::AudioEvent;
