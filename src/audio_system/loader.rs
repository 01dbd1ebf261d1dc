/// Media resource loaders
///
/// Turn a `(category, name)` pair into a playable handle. The file loader
/// probes `<root>/<category>/<name>.<ext>` for each configured extension in
/// order and gives up only once every candidate failed.
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rodio::{OutputStream, OutputStreamHandle};

use super::player::{Playable, SilentHandle};
use super::sink::SinkHandle;
use super::source::AudioCategory;
use crate::config::AudioConfig;
use crate::error::{AudioError, AudioResult};

/// Platform collaborator that loads sounds
pub trait MediaLoader {
    fn load(&self, category: AudioCategory, name: &str) -> AudioResult<Arc<dyn Playable>>;
}

/// Candidate files for an asset, in preference order
pub fn source_candidates(
    root: &Path,
    extensions: &[String],
    category: AudioCategory,
    name: &str,
) -> Vec<PathBuf> {
    let folder = root.join(category.folder());
    extensions
        .iter()
        .map(|ext| folder.join(format!("{}.{}", name, ext.trim_start_matches('.'))))
        .collect()
}

/// Loads audio files from disk and plays them through the default output device
pub struct FileLoader {
    root: PathBuf,
    extensions: Vec<String>,
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
}

impl FileLoader {
    pub fn new(config: &AudioConfig) -> AudioResult<Self> {
        let (stream, stream_handle) = OutputStream::try_default().map_err(AudioError::backend)?;
        tracing::info!(
            "Audio output ready, assets under {} (formats: {})",
            config.asset_root.display(),
            config.extensions.join(", ")
        );

        Ok(Self {
            root: config.asset_root.clone(),
            extensions: config.extensions.clone(),
            _stream: stream,
            stream_handle,
        })
    }

    fn load_candidate(&self, path: &Path) -> AudioResult<SinkHandle> {
        let audio_data = std::fs::read(path).map_err(AudioError::backend)?;
        let handle = SinkHandle::from_bytes(self.stream_handle.clone(), Arc::new(audio_data))?;
        Ok(handle)
    }
}

impl MediaLoader for FileLoader {
    fn load(&self, category: AudioCategory, name: &str) -> AudioResult<Arc<dyn Playable>> {
        let candidates = source_candidates(&self.root, &self.extensions, category, name);

        for path in &candidates {
            match self.load_candidate(path) {
                Ok(handle) => {
                    tracing::info!("Loaded {}:{} from {}", category, name, path.display());
                    return Ok(Arc::new(handle));
                }
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", path.display(), e);
                }
            }
        }

        Err(AudioError::LoadFailure {
            name: format!("{}:{}", category, name),
            tried: candidates.len(),
        })
    }
}

/// Loader producing [`SilentHandle`]s, for headless runs and tests
#[derive(Debug, Default)]
pub struct SilentLoader {
    failing: HashSet<String>,
    length: Option<Duration>,
    loaded: Mutex<Vec<String>>,
}

impl SilentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make loads of these names fail as if no encoding could be decoded
    pub fn failing<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failing.extend(names.into_iter().map(Into::into));
        self
    }

    /// Give every loaded sound a fixed length
    pub fn with_length(mut self, length: Duration) -> Self {
        self.length = Some(length);
        self
    }

    /// `category:name` of every successful load, in order
    pub fn loaded(&self) -> Vec<String> {
        self.loaded.lock().clone()
    }
}

impl MediaLoader for SilentLoader {
    fn load(&self, category: AudioCategory, name: &str) -> AudioResult<Arc<dyn Playable>> {
        if self.failing.contains(name) {
            return Err(AudioError::LoadFailure {
                name: format!("{}:{}", category, name),
                tried: 3,
            });
        }

        self.loaded.lock().push(format!("{}:{}", category, name));
        let handle = match self.length {
            Some(length) => SilentHandle::with_length(length),
            None => SilentHandle::new(),
        };
        Ok(Arc::new(handle))
    }
}

impl<L: MediaLoader + ?Sized> MediaLoader for Arc<L> {
    fn load(&self, category: AudioCategory, name: &str) -> AudioResult<Arc<dyn Playable>> {
        (**self).load(category, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_candidates_order() {
        let extensions = vec!["ogg".to_string(), ".mp3".to_string(), "wav".to_string()];
        let candidates = source_candidates(Path::new("assets"), &extensions, AudioCategory::Bgs, "rain");

        assert_eq!(
            candidates,
            vec![
                PathBuf::from("assets/bgs/rain.ogg"),
                PathBuf::from("assets/bgs/rain.mp3"),
                PathBuf::from("assets/bgs/rain.wav"),
            ]
        );
    }

    #[test]
    fn test_silent_loader_records_loads() {
        let loader = SilentLoader::new();
        let handle = loader.load(AudioCategory::Music, "theme").unwrap();
        assert!(!handle.is_playing());
        assert_eq!(loader.loaded(), vec!["music:theme".to_string()]);
    }

    #[test]
    fn test_silent_loader_failure() {
        let loader = SilentLoader::new().failing(["broken"]);
        let result = loader.load(AudioCategory::Sfx, "broken");
        assert!(matches!(result, Err(AudioError::LoadFailure { tried: 3, .. })));
        assert!(loader.loaded().is_empty());
    }
}
