//! # Segment Navigation Tests
//!
//! Selecting a recording, waiting for its transcript and seeking the player.
//!
//! ```bash
//! cargo test --test navigation_test
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use audio_archive::cache::TranscriptCache;
use audio_archive::catalog::RecordingRef;
use audio_archive::navigation::{NavigateError, Navigator, Player};
use audio_archive::store::TranscriptSource;

/// Store that answers after a fixed delay
struct DelayedStore {
    files: HashMap<String, String>,
    delay: Duration,
}

impl DelayedStore {
    fn new(delay: Duration) -> Self {
        let mut files = HashMap::new();
        files.insert(
            "talk.md".to_string(),
            "### [0:00:00] Intro\n### [0:02:00] Middle\n### [1:00:00] End\n".to_string(),
        );
        files.insert("other.md".to_string(), "### [0:00:15] Other\n".to_string());
        Self { files, delay }
    }
}

impl TranscriptSource for DelayedStore {
    fn fetch(&self, file_name: &str) -> impl Future<Output = Result<Option<String>, String>> + Send {
        let body = self.files.get(file_name).cloned();
        let delay = self.delay;
        async move {
            tokio::time::sleep(delay).await;
            Ok(body)
        }
    }
}

#[derive(Default)]
struct RecordingPlayer {
    seeks: Mutex<Vec<u32>>,
}

impl Player for RecordingPlayer {
    fn seek(&self, seconds: u32) {
        self.seeks.lock().unwrap().push(seconds);
    }
}

fn navigator(delay: Duration, timeout: Duration) -> (Navigator<DelayedStore>, Arc<TranscriptCache>) {
    let cache = Arc::new(TranscriptCache::new());
    let navigator = Navigator::new(Arc::new(DelayedStore::new(delay)), Arc::clone(&cache), timeout);
    (navigator, cache)
}

#[tokio::test]
async fn test_navigate_loads_recording_and_seeks() {
    let (navigator, cache) = navigator(Duration::from_millis(20), Duration::from_secs(2));
    let player = RecordingPlayer::default();
    let talk = RecordingRef::new("talk.mp3");

    let start = navigator.navigate(&talk, 1, &player).await.unwrap();
    assert_eq!(start, 120);
    assert_eq!(navigator.current().as_deref(), Some("talk"));
    assert!(cache.contains("talk"));

    // Already loaded: no wait, same recording
    let start = navigator.navigate(&talk, 2, &player).await.unwrap();
    assert_eq!(start, 3600);
    assert_eq!(*player.seeks.lock().unwrap(), vec![120, 3600]);
    assert_eq!(navigator.current_segments().unwrap().len(), 3);
}

#[tokio::test]
async fn test_navigate_switches_recordings() {
    let (navigator, _) = navigator(Duration::from_millis(5), Duration::from_secs(2));
    let player = RecordingPlayer::default();

    navigator.navigate(&RecordingRef::new("talk.mp3"), 0, &player).await.unwrap();
    let start = navigator
        .navigate(&RecordingRef::new("other.mp3"), 0, &player)
        .await
        .unwrap();
    assert_eq!(start, 15);
    assert_eq!(navigator.current().as_deref(), Some("other"));
    assert_eq!(navigator.current_segments().unwrap()[0].title, "Other");
}

#[tokio::test]
async fn test_navigate_out_of_range() {
    let (navigator, _) = navigator(Duration::from_millis(5), Duration::from_secs(2));
    let player = RecordingPlayer::default();

    let err = navigator
        .navigate(&RecordingRef::new("talk.mp3"), 7, &player)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        NavigateError::SegmentOutOfRange {
            position: 7,
            available: 3
        }
    );
    assert!(player.seeks.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_transcript_is_empty_not_timeout() {
    let (navigator, cache) = navigator(Duration::from_millis(5), Duration::from_secs(2));
    let player = RecordingPlayer::default();

    let err = navigator
        .navigate(&RecordingRef::new("silent.mp3"), 0, &player)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        NavigateError::SegmentOutOfRange {
            position: 0,
            available: 0
        }
    );
    assert!(!cache.contains("silent"));
}

#[tokio::test]
async fn test_navigate_times_out_on_slow_transcript() {
    let (navigator, _) = navigator(Duration::from_millis(500), Duration::from_millis(50));
    let player = RecordingPlayer::default();

    let err = navigator
        .navigate(&RecordingRef::new("talk.mp3"), 0, &player)
        .await
        .unwrap_err();
    assert!(matches!(err, NavigateError::Timeout { ref base_name, .. } if base_name == "talk"));
    assert!(player.seeks.lock().unwrap().is_empty());
}
