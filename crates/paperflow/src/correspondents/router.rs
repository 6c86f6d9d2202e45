use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::Value;

use super::extraction::AnalysisResult;
use super::normalizer::CorrespondentIdentity;
use super::service::{CorrespondentService, ExtractionOutcome};

#[derive(Debug, Deserialize)]
pub(crate) struct NormalizeRequest {
    #[serde(default)]
    name: Value,
}

/// Router builder exposing the correspondent endpoints.
pub fn correspondent_router(service: Arc<CorrespondentService>) -> Router {
    Router::new()
        .route("/api/v1/correspondents/normalize", post(normalize_handler))
        .route(
            "/api/v1/correspondents/storage-path",
            post(storage_path_handler),
        )
        .route("/api/v1/correspondents/extract", post(extract_handler))
        .with_state(service)
}

pub(crate) async fn normalize_handler(
    State(service): State<Arc<CorrespondentService>>,
    Json(request): Json<NormalizeRequest>,
) -> Json<CorrespondentIdentity> {
    Json(service.resolve(&request.name))
}

pub(crate) async fn storage_path_handler(
    State(service): State<Arc<CorrespondentService>>,
    Json(record): Json<Value>,
) -> Json<Value> {
    Json(service.enrich_record(record))
}

pub(crate) async fn extract_handler(
    State(service): State<Arc<CorrespondentService>>,
    Json(analysis): Json<AnalysisResult>,
) -> Json<ExtractionOutcome> {
    Json(service.extract(&analysis))
}
