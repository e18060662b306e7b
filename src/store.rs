use log::{debug, info, warn};
use std::future::Future;
use std::io::ErrorKind;
use std::path::PathBuf;
use url::Url;

use crate::catalog::{catalog_or_default, RecordingRef};
use crate::config::{ArchiveConfig, SourceKind};
use crate::constants::TRANSCRIPT_EXTENSIONS;

/// Storage that transcript files are read from
pub trait TranscriptSource: Send + Sync {
    /// Fetch a single file by name.
    ///
    /// `Ok(None)` means the file does not exist (or the server answered with a
    /// non-success status). `Err` is reserved for transport and IO failures.
    fn fetch(&self, file_name: &str)
        -> impl Future<Output = Result<Option<String>, String>> + Send;
}

/// Transcripts stored in a local directory
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TranscriptSource for LocalStore {
    fn fetch(
        &self,
        file_name: &str,
    ) -> impl Future<Output = Result<Option<String>, String>> + Send {
        let path = self.root.join(file_name);
        async move {
            match tokio::fs::read_to_string(&path).await {
                Ok(body) => Ok(Some(body)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(format!("Failed to read '{}': {}", path.display(), e)),
            }
        }
    }
}

/// Transcripts served over HTTP below a base URL
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base: Url,
}

impl HttpStore {
    pub fn new(base_url: &str) -> Result<Self, String> {
        // Url::join replaces the last path segment unless the base ends with '/'
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base).map_err(|e| format!("Invalid base URL '{}': {}", base_url, e))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    pub fn url_for(&self, file_name: &str) -> Result<Url, String> {
        self.base
            .join(&urlencoding::encode(file_name))
            .map_err(|e| format!("Invalid transcript name '{}': {}", file_name, e))
    }
}

impl TranscriptSource for HttpStore {
    fn fetch(
        &self,
        file_name: &str,
    ) -> impl Future<Output = Result<Option<String>, String>> + Send {
        let url = self.url_for(file_name);
        let client = self.client.clone();
        async move {
            let url = url?;
            let response = client
                .get(url.clone())
                .send()
                .await
                .map_err(|e| format!("Request to {} failed: {}", url, e))?;

            if !response.status().is_success() {
                debug!("{} answered {}", url, response.status());
                return Ok(None);
            }

            response
                .text()
                .await
                .map(Some)
                .map_err(|e| format!("Failed to read body from {}: {}", url, e))
        }
    }
}

/// Store selected by configuration
#[derive(Debug, Clone)]
pub enum ArchiveStore {
    Local(LocalStore),
    Http(HttpStore),
}

impl ArchiveStore {
    pub fn from_config(config: &ArchiveConfig) -> Result<Self, String> {
        match config.source {
            SourceKind::Local => Ok(ArchiveStore::Local(LocalStore::new(&config.transcripts))),
            SourceKind::Http => Ok(ArchiveStore::Http(HttpStore::new(&config.transcripts)?)),
        }
    }
}

impl TranscriptSource for ArchiveStore {
    fn fetch(
        &self,
        file_name: &str,
    ) -> impl Future<Output = Result<Option<String>, String>> + Send {
        async move {
            match self {
                ArchiveStore::Local(store) => store.fetch(file_name).await,
                ArchiveStore::Http(store) => store.fetch(file_name).await,
            }
        }
    }
}

/// Transcript file names to try for a recording, in order:
/// `{base}.md`, `{base}.txt`, then the same with underscores replaced by spaces
pub fn candidate_names(base_name: &str) -> Vec<String> {
    let mut variants = vec![base_name.to_string()];
    let spaced = base_name.replace('_', " ");
    if spaced != base_name {
        variants.push(spaced);
    }

    variants
        .iter()
        .flat_map(|name| {
            TRANSCRIPT_EXTENSIONS
                .iter()
                .map(move |ext| format!("{}.{}", name, ext))
        })
        .collect()
}

/// A transcript body together with the file name it was found under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTranscript {
    pub file_name: String,
    pub text: String,
}

/// Result of looking up a recording's transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptLookup {
    Found(LoadedTranscript),
    /// Every candidate was cleanly absent
    NotFound,
    /// Nothing was found and at least one attempt failed in transport
    Unreachable(String),
}

/// Try every candidate name once, returning the first body found. No retries.
pub async fn load_transcript<S: TranscriptSource>(source: &S, base_name: &str) -> TranscriptLookup {
    let mut failures = Vec::new();

    for file_name in candidate_names(base_name) {
        match source.fetch(&file_name).await {
            Ok(Some(text)) => {
                debug!("Loaded transcript {}", file_name);
                return TranscriptLookup::Found(LoadedTranscript { file_name, text });
            }
            Ok(None) => {}
            Err(e) => {
                debug!("Transcript attempt failed: {}", e);
                failures.push(e);
            }
        }
    }

    if failures.is_empty() {
        TranscriptLookup::NotFound
    } else {
        TranscriptLookup::Unreachable(failures.join("; "))
    }
}

async fn read_listing(source: SourceKind, location: &str) -> Result<String, String> {
    match source {
        SourceKind::Local => tokio::fs::read_to_string(location)
            .await
            .map_err(|e| format!("Failed to read '{}': {}", location, e)),
        SourceKind::Http => {
            let response = reqwest::get(location)
                .await
                .map_err(|e| format!("Request to {} failed: {}", location, e))?;
            if !response.status().is_success() {
                return Err(format!("{} answered {}", location, response.status()));
            }
            response
                .text()
                .await
                .map_err(|e| format!("Failed to read body from {}: {}", location, e))
        }
    }
}

/// Load the recording catalog, falling back to the configured defaults when the
/// listing is unavailable or names no audio files
pub async fn load_catalog(config: &ArchiveConfig) -> Vec<RecordingRef> {
    let listing = match &config.catalog {
        Some(location) => match read_listing(config.source, location).await {
            Ok(text) => Some(text),
            Err(e) => {
                info!("File listing unavailable, using default list: {}", e);
                None
            }
        },
        None => None,
    };

    let recordings = catalog_or_default(listing.as_deref(), &config.default_recordings);
    if recordings.is_empty() {
        warn!("Catalog is empty: no file listing entries and no default recordings");
    } else {
        info!("Found {} recordings", recordings.len());
    }
    recordings
}
