use std::sync::{Arc, RwLock};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::coverage::{select_blindspots, CoverageAnalysis};
use crate::framing::{headline_framing, SourceFraming};
use crate::headline::{HeadlineRecord, IngestError};
use crate::service::BlindspotService;
use crate::session::ReadingSession;

#[derive(Clone)]
pub struct AppState {
    service: Arc<BlindspotService>,
    session: Arc<RwLock<ReadingSession>>,
}

impl AppState {
    pub fn new(service: BlindspotService) -> Self {
        Self {
            service: Arc::new(service),
            session: Arc::new(RwLock::new(ReadingSession::new())),
        }
    }

    /// Demo headlines, default config, registry from `$SOURCES_DB_PATH` or seed.
    pub fn demo() -> Self {
        Self::new(BlindspotService::demo())
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/analyze", post(analyze))
        .route("/blindspots", post(blindspots))
        .route("/coverage/{region}", get(coverage_for_region))
        .route("/sources", get(list_regions))
        .route("/sources/{region}", get(list_sources))
        .route("/session/stories/{n}", get(session_story))
        .route("/session/stories/{n}/framing", get(session_framing))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorBody>)>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> (StatusCode, Json<ErrorBody>) {
    (status, Json(ErrorBody { error: msg.into() }))
}

#[derive(Debug, Deserialize)]
struct HeadlineIn {
    title: String,
    source: String,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>, // missing means "now"
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl HeadlineIn {
    fn into_record(self) -> Result<HeadlineRecord, IngestError> {
        let mut rec = HeadlineRecord::new(&self.title, &self.source, self.published_at)?;
        if let Some(u) = self.url {
            rec = rec.with_url(u);
        }
        if let Some(d) = self.description {
            rec = rec.with_description(d);
        }
        Ok(rec)
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzeReq {
    #[serde(default)]
    region: Option<String>,
    items: Vec<HeadlineIn>,
    #[serde(default)]
    max_items: Option<usize>,
}

impl AnalyzeReq {
    fn region(&self, state: &AppState) -> String {
        self.region
            .as_deref()
            .map(|r| r.trim().to_ascii_uppercase())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| state.service.config().default_region.clone())
    }
}

fn ingest(items: Vec<HeadlineIn>) -> Result<Vec<HeadlineRecord>, (StatusCode, Json<ErrorBody>)> {
    items
        .into_iter()
        .map(HeadlineIn::into_record)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}

fn record_run(analyses: &[CoverageAnalysis]) {
    counter!("coverage_runs_total").increment(1);
    counter!("coverage_clusters_total").increment(analyses.len() as u64);
    let flagged = analyses.iter().filter(|a| a.blindspot.is_some()).count();
    counter!("coverage_blindspots_total").increment(flagged as u64);
}

fn remember(state: &AppState, region: &str, analyses: &[CoverageAnalysis]) {
    match state.session.write() {
        Ok(mut s) => s.record(region, analyses.to_vec()),
        Err(_) => tracing::warn!("reading session lock poisoned; results not remembered"),
    }
}

async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeReq>,
) -> ApiResult<Vec<CoverageAnalysis>> {
    let region = body.region(&state);
    let records = ingest(body.items)?;
    let out = state.service.analyze(records, &region);
    record_run(&out);
    remember(&state, &region, &out);
    Ok(Json(out))
}

async fn blindspots(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeReq>,
) -> ApiResult<Vec<CoverageAnalysis>> {
    let region = body.region(&state);
    let max_items = body
        .max_items
        .unwrap_or(state.service.config().max_blindspots);
    let records = ingest(body.items)?;
    let all = state.service.analyze(records, &region);
    record_run(&all);
    Ok(Json(select_blindspots(all, max_items)))
}

async fn coverage_for_region(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> Json<Vec<CoverageAnalysis>> {
    let region = region.trim().to_ascii_uppercase();
    let out = state.service.coverage(&region).await;
    record_run(&out);
    remember(&state, &region, &out);
    Json(out)
}

#[derive(Debug, Serialize)]
struct RegionOut {
    region: String,
    sources: usize,
}

async fn list_regions(State(state): State<AppState>) -> Json<Vec<RegionOut>> {
    let reg = state.service.registry();
    let out = reg
        .available_regions()
        .into_iter()
        .map(|r| RegionOut {
            sources: reg.sources_for_region(&r).len(),
            region: r,
        })
        .collect();
    Json(out)
}

#[derive(Debug, Serialize)]
struct SourceOut {
    name: String,
    url: String,
    bias_score: f64,
    bias: String,
    reliability_score: f64,
    reliability: String,
}

async fn list_sources(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> ApiResult<Vec<SourceOut>> {
    let sources = state.service.registry().sources_for_region(&region);
    if sources.is_empty() {
        return Err(api_error(
            StatusCode::NOT_FOUND,
            format!("no sources for region {region}"),
        ));
    }
    let out = sources
        .iter()
        .map(|s| SourceOut {
            name: s.name.clone(),
            url: s.url.clone(),
            bias_score: s.bias_score,
            bias: s.bias_category().to_string(),
            reliability_score: s.reliability_score,
            reliability: s.reliability_category().to_string(),
        })
        .collect();
    Ok(Json(out))
}

fn stored_story(state: &AppState, n: usize) -> Result<CoverageAnalysis, (StatusCode, Json<ErrorBody>)> {
    let session = state
        .session
        .read()
        .map_err(|_| api_error(StatusCode::INTERNAL_SERVER_ERROR, "session lock poisoned"))?;
    session.story(n).cloned().ok_or_else(|| {
        api_error(
            StatusCode::NOT_FOUND,
            format!("story {n} not found ({} stored)", session.len()),
        )
    })
}

async fn session_story(
    State(state): State<AppState>,
    Path(n): Path<usize>,
) -> ApiResult<CoverageAnalysis> {
    stored_story(&state, n).map(Json)
}

async fn session_framing(
    State(state): State<AppState>,
    Path(n): Path<usize>,
) -> ApiResult<Vec<SourceFraming>> {
    let story = stored_story(&state, n)?;
    Ok(Json(headline_framing(&story.story)))
}
