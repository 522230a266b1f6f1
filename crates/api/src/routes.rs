use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use pipeline::AnalysisRun;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::report::AnalysisReport;
use crate::state::AppState;

/// Pasted policies shorter than this are rejected.
pub const MIN_TEXT_CHARS: usize = 100;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/analyze", post(analyze))
        .route("/analyze/batch", post(analyze_batch))
        .route("/stats", get(get_stats))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    url: Option<String>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BatchRequest {
    urls: Vec<String>,
}

#[derive(Serialize)]
struct BatchSlot {
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<AnalysisReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct BatchResponse {
    results: Vec<BatchSlot>,
    succeeded: usize,
    failed: usize,
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let pipeline = state.analyzer.pipeline();

    Json(json!({
        "status": "ok",
        "analysis_method": pipeline.method(),
        "model": pipeline.model(),
    }))
}

async fn get_stats(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "metrics": state.metrics.snapshot(),
        "cache": state.cache.stats(),
    }))
}

async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let result = analyze_source(&state, req).await;
    state.metrics.record_request(result.is_ok());
    result.map(Json)
}

async fn analyze_source(state: &AppState, req: AnalyzeRequest) -> Result<AnalysisReport, ApiError> {
    let url = req.url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
    let text = req.text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());

    let (source, url) = match (url, text) {
        (Some(url), None) => (url.clone(), Some(url)),
        (None, Some(text)) => {
            if text.chars().count() < MIN_TEXT_CHARS {
                return Err(ApiError::BadRequest(format!(
                    "text must be at least {MIN_TEXT_CHARS} characters"
                )));
            }
            (text, None)
        }
        (Some(_), Some(_)) => {
            return Err(ApiError::BadRequest("provide either 'url' or 'text', not both".into()));
        }
        (None, None) => return Err(ApiError::BadRequest("either 'url' or 'text' is required".into())),
    };

    if let Some(cached) = state.cache.get(&source) {
        debug!(url = ?url, "Serving cached report");
        state.metrics.record_cache_hit();
        return Ok(cached.reissue());
    }

    let run = match &url {
        Some(url) => state.analyzer.analyze_url(url).await?,
        None => state.analyzer.analyze_text(&source).await?,
    };
    let report = finish(state, url, run);

    // Fallback reports are not cached so a later request can retry the provider.
    if !report.outcome.is_fallback() {
        state.cache.insert(&source, report.clone());
    }
    Ok(report)
}

async fn analyze_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, ApiError> {
    let result = run_batch(&state, req.urls).await;
    state.metrics.record_request(result.is_ok());
    result.map(Json)
}

/// Serve cached URLs directly and send only the misses through the pipeline,
/// keeping request order in the response.
async fn run_batch(state: &AppState, urls: Vec<String>) -> Result<BatchResponse, ApiError> {
    state.analyzer.check_batch(&urls)?;

    let cached: Vec<Option<AnalysisReport>> = urls.iter().map(|url| state.cache.get(url)).collect();
    let misses: Vec<String> = urls
        .iter()
        .zip(&cached)
        .filter(|(_, hit)| hit.is_none())
        .map(|(url, _)| url.clone())
        .collect();

    let hits = urls.len() - misses.len();
    for _ in 0..hits {
        state.metrics.record_cache_hit();
    }
    debug!(hits, misses = misses.len(), "Batch cache lookup");

    let mut fresh = if misses.is_empty() {
        Vec::new().into_iter()
    } else {
        state.analyzer.analyze_batch(&misses).await?.into_iter()
    };

    let mut results = Vec::with_capacity(urls.len());
    for (url, hit) in urls.into_iter().zip(cached) {
        let slot = match hit {
            Some(report) => BatchSlot {
                url,
                report: Some(report.reissue()),
                error: None,
            },
            None => {
                let item = fresh
                    .next()
                    .ok_or_else(|| ApiError::Internal(format!("missing batch result for {url}")))?;
                match item.result {
                    Ok(run) => {
                        let report = finish(state, Some(item.url.clone()), run);
                        if !report.outcome.is_fallback() {
                            state.cache.insert(&item.url, report.clone());
                        }
                        BatchSlot {
                            url: item.url,
                            report: Some(report),
                            error: None,
                        }
                    }
                    Err(e) => BatchSlot {
                        url: item.url,
                        report: None,
                        error: Some(e.to_string()),
                    },
                }
            }
        };
        results.push(slot);
    }

    let succeeded = results.iter().filter(|s| s.report.is_some()).count();
    let failed = results.len() - succeeded;
    info!(succeeded, failed, cached = hits, "Batch request completed");

    Ok(BatchResponse {
        results,
        succeeded,
        failed,
    })
}

fn finish(state: &AppState, url: Option<String>, run: AnalysisRun) -> AnalysisReport {
    state.metrics.record_analysis(&run);
    AnalysisReport::from_run(url, run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ReportCache;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use ingest::{DocumentFetcher, FetchError};
    use pipeline::{BatchConfig, Pipeline, PolicyAnalyzer};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    const POLICY: &str = "This Privacy Policy explains how we collect your email address and \
                          location. You may request deletion of your data at any time. We comply with GDPR.";

    struct StubFetcher;

    #[async_trait]
    impl DocumentFetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            match url {
                "https://good.test/privacy" => Ok(POLICY.to_string()),
                "ftp://bad.test" => Err(FetchError::InvalidUrl(url.to_string())),
                _ => Err(FetchError::NoContent(url.to_string())),
            }
        }
    }

    fn app() -> (Router, AppState) {
        let analyzer = PolicyAnalyzer::new(
            Arc::new(Pipeline::rule_based()),
            Arc::new(StubFetcher),
            BatchConfig {
                max_items: 3,
                item_delay: Duration::ZERO,
            },
        );
        let state = AppState::from_parts(analyzer, ReportCache::new(true, 100));
        (create_router(state.clone()), state)
    }

    async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_health_reports_method() {
        let (app, _) = app();
        let (status, body) = call(app, "GET", "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["analysis_method"], "enhanced_rule_based");
        assert!(body["model"].is_null());
    }

    #[tokio::test]
    async fn test_analyze_text() {
        let (app, _) = app();
        let (status, body) = call(app, "POST", "/analyze", Some(json!({ "text": POLICY }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analysis_method"], "enhanced_rule_based");
        assert_eq!(body["user_rights"]["deletion"], true);
        assert_eq!(body["compliance"]["gdpr_mentioned"], true);
        assert!(body["request_id"].is_string());
        assert!(body.get("url").is_none());
    }

    #[tokio::test]
    async fn test_short_text_is_rejected() {
        let (app, state) = app();
        let (status, body) = call(app, "POST", "/analyze", Some(json!({ "text": "Too short." }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "text must be at least 100 characters");
        assert_eq!(state.metrics.snapshot().failed_requests, 1);
    }

    #[tokio::test]
    async fn test_requires_exactly_one_source() {
        let (app, _) = app();
        let (status, _) = call(app.clone(), "POST", "/analyze", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let both = json!({ "url": "https://good.test/privacy", "text": POLICY });
        let (status, _) = call(app, "POST", "/analyze", Some(both)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analyze_url_is_cached() {
        let (app, state) = app();
        let req = json!({ "url": "https://good.test/privacy" });

        let (status, first) = call(app.clone(), "POST", "/analyze", Some(req.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["url"], "https://good.test/privacy");

        let (_, second) = call(app, "POST", "/analyze", Some(req)).await;
        assert_ne!(first["request_id"], second["request_id"]);
        assert_eq!(first["privacy_score"], second["privacy_score"]);
        assert_eq!(state.metrics.snapshot().cache_hits, 1);
        assert_eq!(state.cache.stats().entries, 1);
    }

    #[tokio::test]
    async fn test_fetch_failures_map_to_status() {
        let (app, _) = app();

        let (status, body) = call(
            app.clone(),
            "POST",
            "/analyze",
            Some(json!({ "url": "https://empty.test/privacy" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("no policy text found"));

        let (status, _) = call(app, "POST", "/analyze", Some(json!({ "url": "ftp://bad.test" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_batch_isolates_failures() {
        let (app, _) = app();
        let req = json!({ "urls": ["https://good.test/privacy", "https://empty.test/privacy"] });
        let (status, body) = call(app, "POST", "/analyze/batch", Some(req)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["succeeded"], 1);
        assert_eq!(body["failed"], 1);
        assert_eq!(body["results"][0]["report"]["analysis_method"], "enhanced_rule_based");
        assert!(body["results"][1]["report"].is_null());
        assert!(body["results"][1]["error"].is_string());
    }

    #[tokio::test]
    async fn test_batch_serves_cached_urls() {
        let (app, state) = app();
        let single = json!({ "url": "https://good.test/privacy" });
        let (_, first) = call(app.clone(), "POST", "/analyze", Some(single)).await;

        let req = json!({ "urls": ["https://good.test/privacy", "https://empty.test/privacy"] });
        let (status, body) = call(app, "POST", "/analyze/batch", Some(req)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["succeeded"], 1);
        assert_eq!(body["results"][0]["url"], "https://good.test/privacy");
        assert_eq!(body["results"][0]["report"]["privacy_score"], first["privacy_score"]);
        assert_ne!(body["results"][0]["report"]["request_id"], first["request_id"]);
        assert!(body["results"][1]["error"].is_string());

        let snapshot = state.metrics.snapshot();
        assert_eq!(snapshot.cache_hits, 1);
        // Only the first /analyze call reached the pipeline
        assert_eq!(snapshot.analyses_by_method.enhanced_rule_based, 1);
        assert_eq!(snapshot.total_requests, 2);
    }

    #[tokio::test]
    async fn test_batch_size_is_validated() {
        let (app, _) = app();

        let (status, _) = call(app.clone(), "POST", "/analyze/batch", Some(json!({ "urls": [] }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let urls = vec!["https://good.test/privacy"; 4];
        let (status, body) = call(app, "POST", "/analyze/batch", Some(json!({ "urls": urls }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "batch of 4 exceeds the limit of 3");
    }

    #[tokio::test]
    async fn test_stats_snapshot() {
        let (app, _) = app();
        call(app.clone(), "POST", "/analyze", Some(json!({ "text": POLICY }))).await;

        let (status, body) = call(app, "GET", "/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metrics"]["total_requests"], 1);
        assert_eq!(body["metrics"]["analyses_by_method"]["enhanced_rule_based"], 1);
        assert_eq!(body["cache"]["entries"], 1);
    }
}
