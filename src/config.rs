use clap::ValueEnum;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{DEFAULT_API_PORT, DEFAULT_NAVIGATION_TIMEOUT_MS};

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Transcripts and file listing read from local directories
    Local,
    /// Transcripts and file listing fetched over HTTP(S)
    Http,
}

fn default_source_kind() -> SourceKind {
    SourceKind::Local
}

fn default_api_port() -> u16 {
    DEFAULT_API_PORT
}

fn default_navigation_timeout_ms() -> u64 {
    DEFAULT_NAVIGATION_TIMEOUT_MS
}

/// Archive configuration file structure
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    /// Where transcripts and the file listing come from (default: local)
    #[serde(default = "default_source_kind")]
    pub source: SourceKind,
    /// Transcript directory (local) or base URL (http)
    pub transcripts: String,
    /// File listing path (local) or URL (http), newline-delimited audio file names
    pub catalog: Option<String>,
    /// Directory holding the audio files, served under /audio (optional)
    pub audio_dir: Option<PathBuf>,
    /// Recordings used when the file listing is missing or empty
    #[serde(default)]
    pub default_recordings: Vec<String>,
    /// API server port (default: 3000)
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// How long segment navigation waits for a transcript (default: 5000 ms)
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,
}

impl ArchiveConfig {
    /// Read and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;
        let config: ArchiveConfig = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    /// Validate location settings for the configured source kind
    pub fn validate(&self) -> Result<(), String> {
        if self.transcripts.trim().is_empty() {
            return Err("transcripts location must not be empty".to_string());
        }

        if self.source == SourceKind::Http {
            url::Url::parse(&self.transcripts)
                .map_err(|e| format!("Invalid transcripts URL '{}': {}", self.transcripts, e))?;
            if let Some(catalog) = &self.catalog {
                url::Url::parse(catalog)
                    .map_err(|e| format!("Invalid catalog URL '{}': {}", catalog, e))?;
            }
        }

        if self.navigation_timeout_ms == 0 {
            return Err("navigation_timeout_ms must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: ArchiveConfig = toml::from_str(r#"transcripts = "transcripts/""#).unwrap();
        assert_eq!(config.source, SourceKind::Local);
        assert_eq!(config.api_port, 3000);
        assert_eq!(config.navigation_timeout_ms, 5000);
        assert!(config.default_recordings.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_http_config_requires_urls() {
        let config: ArchiveConfig = toml::from_str(
            r#"
            source = "http"
            transcripts = "not a url"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config: ArchiveConfig = toml::from_str(
            r#"
            source = "http"
            transcripts = "https://example.com/transcripts/"
            catalog = "https://example.com/files.txt"
            default_recordings = ["a.mp3", "b.mp3"]
            "#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_recordings.len(), 2);
    }

    #[test]
    fn test_zero_navigation_timeout_rejected() {
        let config: ArchiveConfig = toml::from_str(
            r#"
            transcripts = "t"
            navigation_timeout_ms = 0
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }
}
