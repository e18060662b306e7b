//! # Transcript Parsing Tests
//!
//! Behaviour of the `### [H:MM:SS] Title` transcript parser in full and headers-only mode.
//!
//! ```bash
//! cargo test --test transcript_test
//! ```

use audio_archive::transcript::{parse_headers, parse_transcript, search_segments, Segment};

fn seg(start: u32, end: u32, title: &str, text: &str) -> Segment {
    Segment {
        start,
        end,
        title: title.to_string(),
        text: text.to_string(),
    }
}

const LECTURE: &str = "# Lecture notes\n\
intro paragraph that is not a segment\n\
\n\
### [0:00:00] Opening\n\
Good evening.\n\
\n\
   \n\
Let us begin.\n\
### [0:04:30] First question\n\
What is patience?\n\
### [0:04:30] Same timestamp\n\
### [1:02:03] Closing words\n\
Thank you.\n";

#[test]
fn test_two_segment_example() {
    let segments = parse_transcript("### [0:01:05] Intro\nHello\n\n### [0:02:10] Next\nWorld");
    assert_eq!(
        segments,
        vec![
            seg(65, 130, "Intro", "Hello"),
            seg(130, 190, "Next", "World"),
        ]
    );
}

#[test]
fn test_leading_noise_is_dropped() {
    let segments = parse_transcript("junk\n### [1:00:00] A\n### [1:05:00] B");
    assert_eq!(
        segments,
        vec![seg(3600, 3900, "A", ""), seg(3900, 3960, "B", "")]
    );
}

#[test]
fn test_empty_and_headerless_input() {
    assert!(parse_transcript("").is_empty());
    assert!(parse_transcript("no headers here").is_empty());
    assert!(parse_headers("").is_empty());
    assert!(parse_headers("no headers here").is_empty());
}

#[test]
fn test_end_times_chain_and_last_gets_sixty_seconds() {
    let segments = parse_transcript(LECTURE);
    assert_eq!(segments.len(), 4);

    for pair in segments.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
        assert!(pair[0].start <= pair[1].start);
    }
    let last = segments.last().unwrap();
    assert_eq!(last.start, 3723);
    assert_eq!(last.end, 3723 + 60);
}

#[test]
fn test_body_drops_blank_lines() {
    let segments = parse_transcript(LECTURE);
    assert_eq!(segments[0].title, "Opening");
    assert_eq!(segments[0].text, "Good evening.\nLet us begin.");
    assert_eq!(segments[3].text, "Thank you.");
}

#[test]
fn test_shared_timestamp_gives_zero_length_segment() {
    let segments = parse_transcript(LECTURE);
    assert_eq!(segments[1].start, 270);
    assert_eq!(segments[1].end, 270);
    assert_eq!(segments[2].title, "Same timestamp");
    assert_eq!(segments[2].text, "");
}

#[test]
fn test_out_of_order_timestamps_are_not_corrected() {
    let segments = parse_transcript("### [0:10:00] Later\n### [0:05:00] Earlier");
    assert_eq!(segments[0].start, 600);
    assert_eq!(segments[0].end, 300);
    assert_eq!(segments[1].end, 360);
}

#[test]
fn test_malformed_header_chunk_is_dropped() {
    let segments = parse_transcript("### [0:00:10] Good\nbody\n### [0:7:00] Bad\nlost\n### [0:01:00] Next");
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].title, "Good");
    // The end comes from the chunk right after, which is malformed
    assert_eq!(segments[0].end, 70);
    assert_eq!(segments[1].start, 60);
    assert_eq!(segments[1].end, 120);
}

#[test]
fn test_mid_line_marker_does_not_split() {
    let segments = parse_transcript("### [0:00:01] A\nquote: ### [0:00:02] not a header\n");
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].text, "quote: ### [0:00:02] not a header");
    assert_eq!(segments[0].end, 61);
}

#[test]
fn test_crlf_line_endings() {
    let segments = parse_transcript("### [0:00:05] Title\r\nline one\r\n\r\nline two\r\n### [0:00:09] Next\r\n");
    assert_eq!(segments[0].title, "Title");
    assert_eq!(segments[0].text, "line one\nline two");
    assert_eq!(segments[0].end, 9);
    assert_eq!(segments[1].title, "Next");
}

#[test]
fn test_headers_only_agrees_with_full_parse() {
    let inputs = [
        LECTURE,
        "### [0:01:05] Intro\nHello\n\n### [0:02:10] Next\nWorld",
        "### [0:00:10] Good\n### [x:00:00] Bad\n### [0:01:00] Next",
        "",
    ];
    for input in inputs {
        let full: Vec<(u32, String)> = parse_transcript(input)
            .into_iter()
            .map(|s| (s.start, s.title))
            .collect();
        assert_eq!(parse_headers(input), full);
    }
}

#[test]
fn test_search_segments_matches_title_or_body() {
    let segments = parse_transcript(LECTURE);
    assert_eq!(search_segments(&segments, "PATIENCE"), vec![1]);
    assert_eq!(search_segments(&segments, "closing"), vec![3]);
    assert_eq!(search_segments(&segments, ""), vec![0, 1, 2, 3]);
    assert!(search_segments(&segments, "absent").is_empty());
}
