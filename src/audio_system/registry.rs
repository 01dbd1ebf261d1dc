/// Asset registry
///
/// Owns every loaded handle keyed by `category:name`. Entries are created by
/// preloading or on first play and are never removed.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::loader::MediaLoader;
use super::player::{SilentHandle, TrackHandle};
use super::source::{AssetKey, AudioCategory};
use crate::messaging::{AudioEvent, EventBus};

pub struct AssetRegistry {
    loader: Box<dyn MediaLoader>,
    handles: HashMap<AssetKey, TrackHandle>,
    events: EventBus,
}

impl AssetRegistry {
    pub fn new(loader: Box<dyn MediaLoader>, events: EventBus) -> Self {
        Self {
            loader,
            handles: HashMap::new(),
            events,
        }
    }

    /// Look up a handle, loading it on first use.
    ///
    /// A failed load is logged and replaced by a silent handle so callers can
    /// carry on; the failure is not retried.
    pub fn resolve(&mut self, category: AudioCategory, name: &str) -> TrackHandle {
        let key = AssetKey::new(category, name);
        if let Some(handle) = self.handles.get(&key) {
            return handle.clone();
        }

        let inner = match self.loader.load(category, name) {
            Ok(inner) => inner,
            Err(e) => {
                tracing::warn!("{}; continuing with a silent handle", e);
                self.events.publish(AudioEvent::LoadFailed {
                    key: key.clone(),
                    reason: e.to_string(),
                });
                Arc::new(SilentHandle::new())
            }
        };

        inner.set_looping(category.loops());
        let handle = TrackHandle::new(key.clone(), inner);
        self.handles.insert(key, handle.clone());
        handle
    }

    pub fn get(&self, category: AudioCategory, name: &str) -> Option<&TrackHandle> {
        self.handles.get(&AssetKey::new(category, name))
    }

    pub fn contains(&self, category: AudioCategory, name: &str) -> bool {
        self.get(category, name).is_some()
    }

    pub fn handles(&self) -> impl Iterator<Item = &TrackHandle> {
        self.handles.values()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Move the simulated clock of every registered handle
    pub fn advance_all(&self, elapsed: Duration) {
        for handle in self.handles.values() {
            handle.advance(elapsed);
        }
    }
}
