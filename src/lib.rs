// Library interface for testing

// Declare all modules
pub mod cache;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod index;
pub mod navigation;
pub mod serve;
pub mod store;
pub mod timecode;
pub mod transcript;

// Re-export the core types for convenience
pub use catalog::RecordingRef;
pub use index::{build_index, HeaderEntry, HeaderIndex};
pub use transcript::{parse_headers, parse_transcript, Segment};
