use log::{debug, error, info, warn};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::catalog::RecordingRef;
use crate::store::{load_transcript, TranscriptLookup, TranscriptSource};
use crate::transcript::parse_headers;

/// One searchable segment header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderEntry {
    pub file_name: String,
    pub display_name: String,
    pub title: String,
    pub start: u32,
    /// Position of the segment within the recording's parsed transcript
    pub segment_index: usize,
}

/// What indexing a single recording produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingOutcome {
    Indexed(Vec<HeaderEntry>),
    NoTranscript,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRecording {
    pub file_name: String,
    pub reason: String,
}

/// Summary of an index build, by recording file name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexBuildReport {
    pub indexed: Vec<String>,
    pub missing: Vec<String>,
    pub failed: Vec<FailedRecording>,
}

/// Flat cross-recording index of segment headers
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeaderIndex {
    entries: Vec<HeaderEntry>,
}

impl HeaderIndex {
    pub fn from_entries(entries: Vec<HeaderEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[HeaderEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose title contains `term`, case-insensitive, in index order.
    /// A blank term matches nothing.
    pub fn search(&self, term: &str) -> Vec<&HeaderEntry> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|entry| entry.title.to_lowercase().contains(&term))
            .collect()
    }
}

/// Headers-only parse of one recording's transcript
pub async fn index_recording<S: TranscriptSource>(
    source: &S,
    recording: &RecordingRef,
) -> RecordingOutcome {
    match load_transcript(source, &recording.base_name).await {
        TranscriptLookup::Found(loaded) => {
            let entries = parse_headers(&loaded.text)
                .into_iter()
                .enumerate()
                .map(|(segment_index, (start, title))| HeaderEntry {
                    file_name: recording.file_name.clone(),
                    display_name: recording.display_name.clone(),
                    title,
                    start,
                    segment_index,
                })
                .collect::<Vec<_>>();
            debug!("Indexed {} headers from {}", entries.len(), loaded.file_name);
            RecordingOutcome::Indexed(entries)
        }
        TranscriptLookup::NotFound => RecordingOutcome::NoTranscript,
        TranscriptLookup::Unreachable(reason) => RecordingOutcome::Failed(reason),
    }
}

/// Build the header index over every recording.
///
/// One task per recording runs concurrently; a missing or failing transcript only
/// removes that recording's entries. Entries are flattened in catalog order.
pub async fn build_index<S>(
    recordings: &[RecordingRef],
    source: Arc<S>,
) -> (HeaderIndex, IndexBuildReport)
where
    S: TranscriptSource + 'static,
{
    let mut tasks = JoinSet::new();
    for (position, recording) in recordings.iter().cloned().enumerate() {
        let source = Arc::clone(&source);
        tasks.spawn(async move {
            let outcome = index_recording(source.as_ref(), &recording).await;
            (position, outcome)
        });
    }

    let mut outcomes: Vec<Option<RecordingOutcome>> = recordings.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((position, outcome)) => outcomes[position] = Some(outcome),
            Err(e) => error!("Index task failed: {}", e),
        }
    }

    let mut entries = Vec::new();
    let mut report = IndexBuildReport::default();
    for (recording, outcome) in recordings.iter().zip(outcomes) {
        let outcome = outcome
            .unwrap_or_else(|| RecordingOutcome::Failed("indexing task did not complete".to_string()));
        match outcome {
            RecordingOutcome::Indexed(recording_entries) => {
                entries.extend(recording_entries);
                report.indexed.push(recording.file_name.clone());
            }
            RecordingOutcome::NoTranscript => {
                info!("No transcript for {}, skipping", recording.file_name);
                report.missing.push(recording.file_name.clone());
            }
            RecordingOutcome::Failed(reason) => {
                warn!("Could not index {}: {}", recording.file_name, reason);
                report.failed.push(FailedRecording {
                    file_name: recording.file_name.clone(),
                    reason,
                });
            }
        }
    }

    info!(
        "Header index ready: {} entries from {} recordings ({} without transcript, {} failed)",
        entries.len(),
        report.indexed.len(),
        report.missing.len(),
        report.failed.len()
    );

    (HeaderIndex::from_entries(entries), report)
}
