/// Literal that opens every transcript header line, e.g. `### [0:01:05] Intro`
pub const HEADER_MARKER: &str = "### [";

/// Duration assigned to the last segment of a recording, in seconds
/// There is no measured audio length, so the last segment always gets this fixed span
pub const LAST_SEGMENT_DURATION_SECS: u32 = 60;

/// Transcript file extensions, tried in this order
pub const TRANSCRIPT_EXTENSIONS: [&str; 2] = ["md", "txt"];

/// Audio file extensions accepted in a catalog listing (matched case-insensitively)
pub const AUDIO_EXTENSIONS: [&str; 3] = ["mp3", "wav", "ogg"];

/// Default port for the archive API server
pub const DEFAULT_API_PORT: u16 = 3000;

/// How long segment navigation waits for a transcript to load before giving up
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 5000;
