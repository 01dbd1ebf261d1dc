/// rodio-backed playable handle
///
/// Keeps the encoded bytes in memory and feeds a fresh decoder into a
/// `Sink` whenever playback (re)starts from the beginning.
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rodio::{Decoder, OutputStreamHandle, Sink};

use super::effects::volume::clamp01;
use super::player::Playable;
use crate::error::{AudioError, AudioResult};

#[derive(Debug, Clone, Copy)]
struct SinkState {
    volume: f64,
    looping: bool,
}

/// Handle playing preloaded audio through a rodio sink
pub struct SinkHandle {
    stream_handle: OutputStreamHandle,
    sink: Mutex<Sink>,
    audio_data: Arc<Vec<u8>>,
    state: Mutex<SinkState>,
    transient: bool,
}

impl SinkHandle {
    /// Create a paused handle, verifying the bytes decode
    pub fn from_bytes(stream_handle: OutputStreamHandle, audio_data: Arc<Vec<u8>>) -> AudioResult<Self> {
        // Note: rodio's Decoder requires owned data with 'static lifetime
        let cursor = Cursor::new((*audio_data).clone());
        Decoder::new(cursor).map_err(AudioError::backend)?;

        Self::with_state(
            stream_handle,
            audio_data,
            SinkState {
                volume: 1.0,
                looping: false,
            },
            false,
        )
    }

    fn with_state(
        stream_handle: OutputStreamHandle,
        audio_data: Arc<Vec<u8>>,
        state: SinkState,
        transient: bool,
    ) -> AudioResult<Self> {
        let sink = Self::idle_sink(&stream_handle, state.volume)?;
        Ok(Self {
            stream_handle,
            sink: Mutex::new(sink),
            audio_data,
            state: Mutex::new(state),
            transient,
        })
    }

    fn idle_sink(stream_handle: &OutputStreamHandle, volume: f64) -> AudioResult<Sink> {
        let sink = Sink::try_new(stream_handle).map_err(AudioError::backend)?;
        sink.pause();
        sink.set_volume(volume as f32);
        Ok(sink)
    }

    fn append_source(&self, sink: &Sink, looping: bool) -> AudioResult<()> {
        let cursor = Cursor::new((*self.audio_data).clone());
        if looping {
            sink.append(Decoder::new_looped(cursor).map_err(AudioError::backend)?);
        } else {
            sink.append(Decoder::new(cursor).map_err(AudioError::backend)?);
        }
        Ok(())
    }
}

impl Playable for SinkHandle {
    fn play(&self) -> AudioResult<()> {
        let state = *self.state.lock();
        let sink = self.sink.lock();
        if sink.empty() {
            self.append_source(&sink, state.looping)?;
        }
        sink.set_volume(state.volume as f32);
        sink.play();
        Ok(())
    }

    fn pause(&self) {
        self.sink.lock().pause();
    }

    fn seek_zero(&self) {
        // Swapping in a fresh sink rewinds without blocking on the output thread
        let volume = self.state.lock().volume;
        let mut sink = self.sink.lock();
        let resume = !sink.is_paused() && !sink.empty();

        let fresh = match Self::idle_sink(&self.stream_handle, volume) {
            Ok(fresh) => fresh,
            Err(e) => {
                tracing::warn!("Failed to rewind audio sink: {}", e);
                return;
            }
        };
        sink.stop();
        *sink = fresh;

        if resume {
            let looping = self.state.lock().looping;
            match self.append_source(&sink, looping) {
                Ok(()) => sink.play(),
                Err(e) => tracing::warn!("Failed to restart audio after rewind: {}", e),
            }
        }
    }

    fn volume(&self) -> f64 {
        self.state.lock().volume
    }

    fn set_volume(&self, volume: f64) {
        let volume = clamp01(volume);
        self.state.lock().volume = volume;
        self.sink.lock().set_volume(volume as f32);
    }

    fn is_looping(&self) -> bool {
        self.state.lock().looping
    }

    fn set_looping(&self, looping: bool) {
        self.state.lock().looping = looping;
    }

    fn is_playing(&self) -> bool {
        let sink = self.sink.lock();
        !sink.is_paused() && !sink.empty()
    }

    fn position(&self) -> Duration {
        self.sink.lock().get_pos()
    }

    fn duplicate(&self) -> AudioResult<Arc<dyn Playable>> {
        let state = *self.state.lock();
        let copy = Self::with_state(
            self.stream_handle.clone(),
            Arc::clone(&self.audio_data),
            state,
            true,
        )?;
        Ok(Arc::new(copy))
    }
}

impl Drop for SinkHandle {
    fn drop(&mut self) {
        // Transient instances play out after their last reference is gone
        if self.transient {
            let sink = std::mem::replace(self.sink.get_mut(), Sink::new_idle().0);
            sink.detach();
        }
    }
}
