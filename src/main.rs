use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use audio_archive::cache::TranscriptCache;
use audio_archive::catalog::RecordingRef;
use audio_archive::config::ArchiveConfig;
use audio_archive::index::{build_index, HeaderEntry, IndexBuildReport};
use audio_archive::navigation::{Navigator, Player};
use audio_archive::serve::serve_archive;
use audio_archive::store::{load_catalog, ArchiveStore};
use audio_archive::timecode::format_time;
use audio_archive::transcript::{parse_headers, parse_transcript};

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse timestamped transcripts of an audio archive")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a transcript file and print its segments as JSON
    Parse {
        /// Path to the transcript (.md or .txt)
        file: PathBuf,

        /// Only print start times and titles
        #[arg(long)]
        headers_only: bool,
    },
    /// Build the header index over the whole catalog
    Index {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: PathBuf,

        /// Only print entries whose title contains this term
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Resolve a segment of a recording to its playback position
    Locate {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: PathBuf,

        /// Audio file name as listed in the catalog
        recording: String,

        /// Zero-based segment position
        segment: usize,
    },
    /// Serve the archive API via HTTP
    Serve {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: PathBuf,

        /// Port to listen on (overrides config file)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Serialize)]
struct HeaderLine {
    start: u32,
    title: String,
}

#[derive(Serialize)]
struct IndexOutput<'a> {
    report: IndexBuildReport,
    entries: Vec<&'a HeaderEntry>,
}

/// Player that only reports where it would seek
struct PrintPlayer;

impl Player for PrintPlayer {
    fn seek(&self, seconds: u32) {
        println!("Seek to {} ({} s)", format_time(seconds), seconds);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match args.command {
        Command::Parse { file, headers_only } => parse(file, headers_only),
        Command::Index { config, search } => index(config, search),
        Command::Locate {
            config,
            recording,
            segment,
        } => locate(config, recording, segment),
        Command::Serve { config, port } => {
            let config = ArchiveConfig::load(&config)?;
            let port = port.unwrap_or(config.api_port);
            serve_archive(config, port)
        }
    }
}

fn parse(file: PathBuf, headers_only: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(&file)
        .map_err(|e| format!("Failed to read transcript '{}': {}", file.display(), e))?;

    let json = if headers_only {
        let headers: Vec<HeaderLine> = parse_headers(&text)
            .into_iter()
            .map(|(start, title)| HeaderLine { start, title })
            .collect();
        serde_json::to_string_pretty(&headers)?
    } else {
        serde_json::to_string_pretty(&parse_transcript(&text))?
    };
    println!("{}", json);
    Ok(())
}

fn index(config_path: PathBuf, search: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = ArchiveConfig::load(&config_path)?;
    let store = Arc::new(ArchiveStore::from_config(&config)?);

    let rt = tokio::runtime::Runtime::new()?;
    let (index, report) = rt.block_on(async {
        let catalog = load_catalog(&config).await;
        build_index(&catalog, store).await
    });

    let entries = match &search {
        Some(term) => index.search(term),
        None => index.entries().iter().collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&IndexOutput { report, entries })?
    );
    Ok(())
}

fn locate(
    config_path: PathBuf,
    file_name: String,
    segment: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ArchiveConfig::load(&config_path)?;
    let store = Arc::new(ArchiveStore::from_config(&config)?);
    let navigator = Navigator::new(
        store,
        Arc::new(TranscriptCache::new()),
        config.navigation_timeout(),
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let catalog = load_catalog(&config).await;
        let recording = catalog
            .into_iter()
            .find(|rec| rec.file_name == file_name)
            .unwrap_or_else(|| RecordingRef::new(&file_name));
        navigator.navigate(&recording, segment, &PrintPlayer).await
    })?;
    Ok(())
}
