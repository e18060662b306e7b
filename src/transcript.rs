use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::OnceLock;

use crate::constants::{HEADER_MARKER, LAST_SEGMENT_DURATION_SECS};
use crate::timecode::hms_to_seconds;

/// One timestamped, titled unit of a recording's transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Start offset in seconds
    pub start: u32,
    /// Start of the next chunk, or start + 60 for the last one
    pub end: u32,
    pub title: String,
    /// Non-blank body lines joined with '\n'
    pub text: String,
}

/// Fields extracted from a `### [H:MM:SS] Title` header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMatch {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub title: String,
}

impl HeaderMatch {
    pub fn start(&self) -> u32 {
        hms_to_seconds(self.hours, self.minutes, self.seconds)
    }
}

fn header_regex() -> &'static Regex {
    static HEADER_REGEX: OnceLock<Regex> = OnceLock::new();
    HEADER_REGEX.get_or_init(|| {
        Regex::new(r"^### \[([0-9]{1,2}):([0-9]{2}):([0-9]{2})\][ \t]*(.*)")
            .expect("Failed to compile transcript header regex")
    })
}

/// Numeric header field, falling back to 0 when absent or unparseable
fn field_or_zero(caps: &Captures, group: usize) -> u32 {
    caps.get(group)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Match a single header line. Returns None when the line is not a header.
pub fn match_header(line: &str) -> Option<HeaderMatch> {
    let caps = header_regex().captures(line)?;
    Some(HeaderMatch {
        hours: field_or_zero(&caps, 1),
        minutes: field_or_zero(&caps, 2),
        seconds: field_or_zero(&caps, 3),
        title: caps
            .get(4)
            .map(|m| m.as_str().trim_end().to_string())
            .unwrap_or_default(),
    })
}

/// Split transcript text into header-anchored chunks.
///
/// Everything before the first `### [` is dropped, wherever it occurs. After that,
/// a new chunk starts at every line that begins with the marker.
fn split_chunks(text: &str) -> Vec<&str> {
    let Some(first) = text.find(HEADER_MARKER) else {
        return Vec::new();
    };
    let text = &text[first..];

    let mut chunks = Vec::new();
    let mut chunk_start = 0;
    let mut line_start = 0;
    for line in text.split_inclusive('\n') {
        if line_start > 0 && line.starts_with(HEADER_MARKER) {
            chunks.push(&text[chunk_start..line_start]);
            chunk_start = line_start;
        }
        line_start += line.len();
    }
    if chunk_start < text.len() {
        chunks.push(&text[chunk_start..]);
    }
    chunks
}

fn chunk_header(chunk: &str) -> Option<HeaderMatch> {
    match_header(chunk.lines().next().unwrap_or(""))
}

fn chunk_body(chunk: &str) -> String {
    chunk
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Parse a transcript into segments, in source order.
///
/// Chunks whose first line is not a valid header are dropped. A segment's end is
/// taken from the chunk immediately after it; when that chunk is missing or has a
/// malformed header the default last-segment duration applies.
pub fn parse_transcript(text: &str) -> Vec<Segment> {
    let chunks = split_chunks(text);

    chunks
        .iter()
        .enumerate()
        .filter_map(|(i, chunk)| {
            let header = chunk_header(chunk)?;
            let start = header.start();
            let end = chunks
                .get(i + 1)
                .and_then(|next| chunk_header(next))
                .map(|next| next.start())
                .unwrap_or(start + LAST_SEGMENT_DURATION_SECS);

            Some(Segment {
                start,
                end,
                title: header.title,
                text: chunk_body(chunk),
            })
        })
        .collect()
}

/// Headers-only parse: `(start, title)` pairs without materializing body text.
/// Positions line up with the segments `parse_transcript` returns for the same input.
pub fn parse_headers(text: &str) -> Vec<(u32, String)> {
    split_chunks(text)
        .into_iter()
        .filter_map(chunk_header)
        .map(|header| (header.start(), header.title))
        .collect()
}

/// Positions of segments whose title or body contains `term`, case-insensitive.
/// An empty term matches every segment.
pub fn search_segments(segments: &[Segment], term: &str) -> Vec<usize> {
    let term = term.trim().to_lowercase();
    segments
        .iter()
        .enumerate()
        .filter(|(_, seg)| {
            term.is_empty()
                || seg.title.to_lowercase().contains(&term)
                || seg.text.to_lowercase().contains(&term)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Position of the segment playing at `time_secs` (start inclusive, end exclusive)
pub fn segment_at(segments: &[Segment], time_secs: f64) -> Option<usize> {
    segments
        .iter()
        .position(|seg| time_secs >= seg.start as f64 && time_secs < seg.end as f64)
}
