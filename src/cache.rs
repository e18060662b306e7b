use dashmap::DashMap;
use log::{info, warn};
use std::sync::Arc;

use crate::catalog::RecordingRef;
use crate::store::{load_transcript, TranscriptLookup, TranscriptSource};
use crate::transcript::{parse_transcript, Segment};

/// Parsed segments keyed by recording base name.
///
/// Entries live until `clear`; there is no eviction.
#[derive(Debug, Default)]
pub struct TranscriptCache {
    segments: DashMap<String, Arc<Vec<Segment>>>,
}

impl TranscriptCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, base_name: &str) -> Option<Arc<Vec<Segment>>> {
        self.segments.get(base_name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn put(&self, base_name: &str, segments: Vec<Segment>) -> Arc<Vec<Segment>> {
        let segments = Arc::new(segments);
        self.segments
            .insert(base_name.to_string(), Arc::clone(&segments));
        segments
    }

    pub fn contains(&self, base_name: &str) -> bool {
        self.segments.contains_key(base_name)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn clear(&self) {
        self.segments.clear();
        info!("Transcript cache cleared");
    }

    /// Cached segments for a recording, loading and parsing the transcript on a miss.
    ///
    /// A recording without a transcript yields an empty sequence and is not cached,
    /// so the next call looks again.
    pub async fn get_or_load<S: TranscriptSource>(
        &self,
        source: &S,
        recording: &RecordingRef,
    ) -> Arc<Vec<Segment>> {
        if let Some(segments) = self.get(&recording.base_name) {
            info!("Cached transcript: {}", recording.display_name);
            return segments;
        }

        match load_transcript(source, &recording.base_name).await {
            TranscriptLookup::Found(loaded) => {
                let segments = parse_transcript(&loaded.text);
                info!(
                    "{}: {} segments from {}",
                    recording.display_name,
                    segments.len(),
                    loaded.file_name
                );
                self.put(&recording.base_name, segments)
            }
            TranscriptLookup::NotFound => {
                warn!("No transcript found for {}", recording.display_name);
                Arc::new(Vec::new())
            }
            TranscriptLookup::Unreachable(reason) => {
                warn!(
                    "Transcript for {} could not be fetched: {}",
                    recording.display_name, reason
                );
                Arc::new(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: u32) -> Segment {
        Segment {
            start,
            end: start + 60,
            title: format!("at {}", start),
            text: String::new(),
        }
    }

    #[test]
    fn test_put_get_clear() {
        let cache = TranscriptCache::new();
        assert!(cache.is_empty());
        assert!(cache.get("a").is_none());

        cache.put("a", vec![segment(0), segment(60)]);
        assert!(cache.contains("a"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a").unwrap().len(), 2);

        cache.put("a", vec![segment(5)]);
        assert_eq!(cache.get("a").unwrap()[0].start, 5);

        cache.clear();
        assert!(cache.is_empty());
        assert!(!cache.contains("a"));
    }
}
