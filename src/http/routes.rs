//! REST endpoints for frustration triage.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, warn};

use super::state::AppState;
use crate::error::PipelineError;
use crate::pipeline::types::{BatchOutcome, ClassifiedEmail, FRUSTRATION_THRESHOLD, RawMessage};

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(rename = "isFrustrated")]
    pub is_frustrated: bool,
    pub score: f64,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub messages: Vec<RawMessage>,
}

/// Wire shape of a batch: the classified emails and the narrative summary.
/// Field names are the ones the web client reads.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub emails: Vec<ClassifiedEmail>,
    #[serde(rename = "frustration_summary")]
    pub summary: String,
}

impl From<BatchOutcome> for ClassifyResponse {
    fn from(outcome: BatchOutcome) -> Self {
        Self {
            emails: outcome.emails,
            summary: outcome.summary,
        }
    }
}

/// Build the triage REST routes.
pub fn triage_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/frustration/classify", post(classify))
        .route("/frustration/emails", get(fetch_and_classify))
        .route("/fetch_predicted_emails", get(fetch_and_classify))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// POST /predict
///
/// Statistical scorer only; no oracle call.
async fn predict(
    State(state): State<AppState>,
    Json(body): Json<PredictRequest>,
) -> impl IntoResponse {
    let score = state.statistical.score(&body.text).await;
    Json(PredictResponse {
        is_frustrated: score > FRUSTRATION_THRESHOLD,
        score,
    })
}

/// POST /frustration/classify
///
/// Classifies a caller-supplied batch.
async fn classify(
    State(state): State<AppState>,
    Json(body): Json<ClassifyRequest>,
) -> Response {
    match state.orchestrator.classify_batch(body.messages).await {
        Ok(outcome) => Json(ClassifyResponse::from(outcome)).into_response(),
        Err(e) => pipeline_error(e),
    }
}

/// GET /frustration/emails (also served as /fetch_predicted_emails)
///
/// Fetches unread mail from the configured source and classifies it.
async fn fetch_and_classify(State(state): State<AppState>) -> Response {
    let Some(source) = state.mail.as_deref() else {
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "No mail source configured".to_string(),
        );
    };

    match state
        .orchestrator
        .fetch_and_classify(source, state.max_results)
        .await
    {
        Ok(outcome) => Json(ClassifyResponse::from(outcome)).into_response(),
        Err(e) => pipeline_error(e),
    }
}

fn pipeline_error(e: PipelineError) -> Response {
    match e {
        PipelineError::Fetch(_) => {
            error!(error = %e, "Failed to fetch emails");
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
        PipelineError::BatchTooLarge { .. } | PipelineError::DuplicateMessage(_) => {
            warn!(error = %e, "Rejected batch");
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({"error": message}))).into_response()
}
