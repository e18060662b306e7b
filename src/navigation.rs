use log::{debug, warn};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;

use crate::cache::TranscriptCache;
use crate::catalog::RecordingRef;
use crate::store::TranscriptSource;
use crate::transcript::Segment;

/// Playback target that segment navigation seeks
pub trait Player: Send + Sync {
    fn seek(&self, seconds: u32);
}

#[derive(Debug, Clone)]
struct LoadedRecording {
    base_name: String,
    segments: Arc<Vec<Segment>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigateError {
    /// The recording's segments did not arrive within the navigation timeout
    Timeout { base_name: String, waited: Duration },
    /// The transcript loaded but has no segment at this position
    SegmentOutOfRange { position: usize, available: usize },
}

impl fmt::Display for NavigateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigateError::Timeout { base_name, waited } => write!(
                f,
                "Timed out after {} ms waiting for segments of '{}'",
                waited.as_millis(),
                base_name
            ),
            NavigateError::SegmentOutOfRange {
                position,
                available,
            } => write!(
                f,
                "Segment {} requested but recording has {} segments",
                position, available
            ),
        }
    }
}

impl std::error::Error for NavigateError {}

/// Tracks the selected recording and moves playback to segments, loading
/// transcripts on demand.
pub struct Navigator<S> {
    source: Arc<S>,
    cache: Arc<TranscriptCache>,
    timeout: Duration,
    current: Arc<Mutex<Option<String>>>,
    loaded: Arc<watch::Sender<Option<LoadedRecording>>>,
}

fn lock_current(current: &Mutex<Option<String>>) -> MutexGuard<'_, Option<String>> {
    current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<S> Navigator<S>
where
    S: TranscriptSource + 'static,
{
    pub fn new(source: Arc<S>, cache: Arc<TranscriptCache>, timeout: Duration) -> Self {
        let (loaded, _) = watch::channel(None);
        Self {
            source,
            cache,
            timeout,
            current: Arc::new(Mutex::new(None)),
            loaded: Arc::new(loaded),
        }
    }

    /// Base name of the selected recording
    pub fn current(&self) -> Option<String> {
        lock_current(&self.current).clone()
    }

    /// Segments of the selected recording, once they have loaded
    pub fn current_segments(&self) -> Option<Arc<Vec<Segment>>> {
        let current = self.current()?;
        self.loaded
            .borrow()
            .as_ref()
            .filter(|loaded| loaded.base_name == current)
            .map(|loaded| Arc::clone(&loaded.segments))
    }

    /// Make `recording` the selected one and start loading its segments.
    /// Selecting the already selected recording does nothing.
    pub fn select(&self, recording: &RecordingRef) {
        {
            let mut current = lock_current(&self.current);
            if current.as_deref() == Some(recording.base_name.as_str()) {
                return;
            }
            *current = Some(recording.base_name.clone());
        }
        debug!("Selected {}", recording.display_name);

        let source = Arc::clone(&self.source);
        let cache = Arc::clone(&self.cache);
        let current = Arc::clone(&self.current);
        let loaded = Arc::clone(&self.loaded);
        let recording = recording.clone();
        tokio::spawn(async move {
            let segments = cache.get_or_load(source.as_ref(), &recording).await;

            // A later selection wins; stale loads are only cached
            let current = lock_current(&current);
            if current.as_deref() == Some(recording.base_name.as_str()) {
                loaded.send_replace(Some(LoadedRecording {
                    base_name: recording.base_name,
                    segments,
                }));
            }
        });
    }

    /// Seek `player` to the start of segment `position` of `recording`.
    ///
    /// Selects the recording when it is not the current one, then waits for its
    /// segments for at most the navigation timeout. Returns the seek position.
    pub async fn navigate<P>(
        &self,
        recording: &RecordingRef,
        position: usize,
        player: &P,
    ) -> Result<u32, NavigateError>
    where
        P: Player + ?Sized,
    {
        let mut ready = self.loaded.subscribe();
        self.select(recording);

        let wait = ready.wait_for(|loaded| {
            loaded
                .as_ref()
                .is_some_and(|loaded| loaded.base_name == recording.base_name)
        });
        let segments = match tokio::time::timeout(self.timeout, wait).await {
            Ok(Ok(loaded)) => loaded
                .as_ref()
                .map(|loaded| Arc::clone(&loaded.segments))
                .unwrap_or_default(),
            // The sender lives as long as self, so a closed channel means no data is coming
            Ok(Err(_)) | Err(_) => {
                warn!(
                    "Segments for {} not ready after {} ms",
                    recording.display_name,
                    self.timeout.as_millis()
                );
                return Err(NavigateError::Timeout {
                    base_name: recording.base_name.clone(),
                    waited: self.timeout,
                });
            }
        };

        let segment = segments
            .get(position)
            .ok_or(NavigateError::SegmentOutOfRange {
                position,
                available: segments.len(),
            })?;
        player.seek(segment.start);
        Ok(segment.start)
    }
}
