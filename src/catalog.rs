use serde::Serialize;

use crate::constants::AUDIO_EXTENSIONS;

/// A recording known to the archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordingRef {
    /// Audio file name as listed, e.g. "first_talk.mp3"
    pub file_name: String,
    /// File name without the audio extension, used to look up transcripts
    pub base_name: String,
    /// Base name with underscores shown as spaces
    pub display_name: String,
}

impl RecordingRef {
    pub fn new(file_name: &str) -> Self {
        let base_name = strip_audio_extension(file_name).to_string();
        let display_name = base_name.replace('_', " ");
        Self {
            file_name: file_name.to_string(),
            base_name,
            display_name,
        }
    }
}

fn audio_extension_len(file_name: &str) -> Option<usize> {
    let (_, ext) = file_name.rsplit_once('.')?;
    AUDIO_EXTENSIONS
        .iter()
        .any(|known| ext.eq_ignore_ascii_case(known))
        .then_some(ext.len() + 1)
}

/// Whether the file name ends in a known audio extension (case-insensitive)
pub fn is_audio_file(file_name: &str) -> bool {
    audio_extension_len(file_name).is_some()
}

/// Strip a known audio extension; other names are returned unchanged
pub fn strip_audio_extension(file_name: &str) -> &str {
    match audio_extension_len(file_name) {
        Some(len) => &file_name[..file_name.len() - len],
        None => file_name,
    }
}

/// Parse a newline-delimited file listing, keeping only audio files
pub fn parse_listing(text: &str) -> Vec<RecordingRef> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && is_audio_file(line))
        .map(RecordingRef::new)
        .collect()
}

/// Use the listing when it names at least one recording, otherwise the configured defaults
pub fn catalog_or_default(listing: Option<&str>, defaults: &[String]) -> Vec<RecordingRef> {
    let recordings = listing.map(parse_listing).unwrap_or_default();
    if !recordings.is_empty() {
        return recordings;
    }
    defaults
        .iter()
        .map(|name| RecordingRef::new(name.trim()))
        .collect()
}
