use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc as StdArc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::cache::TranscriptCache;
use crate::catalog::RecordingRef;
use crate::config::ArchiveConfig;
use crate::index::{build_index, HeaderEntry, HeaderIndex};
use crate::store::{load_catalog, ArchiveStore};
use crate::timecode::format_time;
use crate::transcript::{search_segments, segment_at};

// State for archive API handlers
pub struct AppState {
    pub store: StdArc<ArchiveStore>,
    pub cache: StdArc<TranscriptCache>,
    pub catalog: Vec<RecordingRef>,
    pub index: HeaderIndex,
}

impl AppState {
    fn recording(&self, file_name: &str) -> Option<&RecordingRef> {
        self.catalog.iter().find(|rec| rec.file_name == file_name)
    }
}

/// Load the catalog, build the header index and serve the archive API (for serve command)
pub fn serve_archive(config: ArchiveConfig, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let store = StdArc::new(ArchiveStore::from_config(&config)?);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let catalog = load_catalog(&config).await;
        let (index, report) = build_index(&catalog, StdArc::clone(&store)).await;
        for failed in &report.failed {
            warn!("Not indexed: {} ({})", failed.file_name, failed.reason);
        }

        println!("Recordings: {}", catalog.len());
        println!(
            "Header index: {} entries ({} recordings without transcript, {} failed)",
            index.len(),
            report.missing.len(),
            report.failed.len()
        );
        println!("Listening on: http://[::]:{} (IPv4 + IPv6)", port);
        println!("Endpoints:");
        println!("  GET /api/recordings  - Recording catalog");
        println!("  GET /api/recordings/{{file_name}}/segments?q=<term>  - Transcript segments");
        println!("  GET /api/recordings/{{file_name}}/segments/at?t=<seconds>  - Segment playing at a time");
        println!("  GET /api/search?q=<term>  - Search segment titles across recordings");
        println!("  GET|DELETE /api/cache  - Transcript cache info / clear");
        if let Some(audio_dir) = &config.audio_dir {
            println!("  GET /audio/<file>  - Audio files from {}", audio_dir.display());
        }

        let app_state = StdArc::new(AppState {
            store,
            cache: StdArc::new(TranscriptCache::new()),
            catalog,
            index,
        });
        let app = build_router(app_state, config.audio_dir.clone());

        let listener = tokio::net::TcpListener::bind(format!("[::]:{}", port)).await?;
        info!("Archive API ready on port {}", port);
        axum::serve(listener, app).await?;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

/// Archive API routes, plus the audio directory under /audio when given
pub fn build_router(app_state: StdArc<AppState>, audio_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/api/recordings", get(recordings_handler))
        .route("/api/recordings/{file_name}/segments", get(segments_handler))
        .route(
            "/api/recordings/{file_name}/segments/at",
            get(segment_at_handler),
        )
        .route("/api/search", get(search_handler))
        .route("/api/cache", get(cache_info_handler).delete(cache_clear_handler))
        .with_state(app_state);

    if let Some(audio_dir) = audio_dir {
        router = router.nest_service("/audio", ServeDir::new(audio_dir));
    }

    router.layer(cors)
}

// Health check endpoint - returns 200 OK if server is running
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[derive(Serialize)]
struct RecordingInfo {
    file_name: String,
    display_name: String,
    cached: bool,
}

#[derive(Serialize)]
struct RecordingsList {
    recordings: Vec<RecordingInfo>,
}

async fn recordings_handler(State(state): State<StdArc<AppState>>) -> impl IntoResponse {
    let recordings = state
        .catalog
        .iter()
        .map(|rec| RecordingInfo {
            file_name: rec.file_name.clone(),
            display_name: rec.display_name.clone(),
            cached: state.cache.contains(&rec.base_name),
        })
        .collect();

    (StatusCode::OK, axum::Json(RecordingsList { recordings })).into_response()
}

#[derive(Deserialize)]
pub struct SegmentsQuery {
    pub q: Option<String>,
}

#[derive(Serialize)]
struct SegmentData {
    position: usize,
    start: u32,
    end: u32,
    start_label: String,
    title: String,
    text: String,
}

#[derive(Serialize)]
struct SegmentsResponse {
    file_name: String,
    display_name: String,
    total: usize,
    segments: Vec<SegmentData>,
}

fn unknown_recording(file_name: &str) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        axum::Json(serde_json::json!({"error": format!("Recording '{}' not found", file_name)})),
    )
        .into_response()
}

async fn segments_handler(
    State(state): State<StdArc<AppState>>,
    Path(file_name): Path<String>,
    Query(query): Query<SegmentsQuery>,
) -> impl IntoResponse {
    let Some(recording) = state.recording(&file_name) else {
        return unknown_recording(&file_name);
    };

    let segments = state.cache.get_or_load(state.store.as_ref(), recording).await;
    let positions = search_segments(&segments, query.q.as_deref().unwrap_or(""));

    let data = positions
        .into_iter()
        .map(|position| {
            let seg = &segments[position];
            SegmentData {
                position,
                start: seg.start,
                end: seg.end,
                start_label: format_time(seg.start),
                title: seg.title.clone(),
                text: seg.text.clone(),
            }
        })
        .collect();

    (
        StatusCode::OK,
        axum::Json(SegmentsResponse {
            file_name: recording.file_name.clone(),
            display_name: recording.display_name.clone(),
            total: segments.len(),
            segments: data,
        }),
    )
        .into_response()
}

#[derive(Deserialize)]
pub struct SegmentAtQuery {
    pub t: f64,
}

async fn segment_at_handler(
    State(state): State<StdArc<AppState>>,
    Path(file_name): Path<String>,
    Query(query): Query<SegmentAtQuery>,
) -> impl IntoResponse {
    let Some(recording) = state.recording(&file_name) else {
        return unknown_recording(&file_name);
    };

    let segments = state.cache.get_or_load(state.store.as_ref(), recording).await;
    let position = segment_at(&segments, query.t);

    (
        StatusCode::OK,
        axum::Json(serde_json::json!({"time": query.t, "position": position})),
    )
        .into_response()
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Serialize)]
struct SearchResponse<'a> {
    query: String,
    entries: Vec<&'a HeaderEntry>,
}

async fn search_handler(
    State(state): State<StdArc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let term = query.q.unwrap_or_default();
    let entries = state.index.search(&term);

    (
        StatusCode::OK,
        axum::Json(SearchResponse {
            query: term,
            entries,
        }),
    )
        .into_response()
}

async fn cache_info_handler(State(state): State<StdArc<AppState>>) -> impl IntoResponse {
    let cached: Vec<&str> = state
        .catalog
        .iter()
        .filter(|rec| state.cache.contains(&rec.base_name))
        .map(|rec| rec.file_name.as_str())
        .collect();

    (
        StatusCode::OK,
        axum::Json(serde_json::json!({"transcripts": state.cache.len(), "cached": cached})),
    )
        .into_response()
}

async fn cache_clear_handler(State(state): State<StdArc<AppState>>) -> impl IntoResponse {
    state.cache.clear();
    (StatusCode::OK, axum::Json(serde_json::json!({"cleared": true}))).into_response()
}
