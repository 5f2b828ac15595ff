use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

use super::pipeline::{
    DiagnosticSink, ErrorBody, ErrorKind, EvaluationResponse, UnderwritingPipeline,
};
use super::validation::ValidationError;

/// Router builder exposing the eligibility endpoint and the active policy.
pub fn underwriting_router<D>(pipeline: Arc<UnderwritingPipeline<D>>) -> Router
where
    D: DiagnosticSink + 'static,
{
    Router::new()
        .route("/api/v1/loans/eligibility", post(eligibility_handler::<D>))
        .route("/api/v1/loans/policy", get(policy_handler::<D>))
        .with_state(pipeline)
}

pub(crate) async fn eligibility_handler<D>(
    State(pipeline): State<Arc<UnderwritingPipeline<D>>>,
    body: Bytes,
) -> Response
where
    D: DiagnosticSink + 'static,
{
    let response = match serde_json::from_slice::<Value>(&body) {
        Ok(raw) => pipeline.evaluate(&raw),
        Err(err) => EvaluationResponse {
            success: false,
            data: None,
            error: Some(ErrorBody::validation(
                ValidationError::malformed_body(&err.to_string()).violations,
            )),
        },
    };

    let status = match response.error_kind() {
        None => StatusCode::OK,
        Some(ErrorKind::ValidationError) => StatusCode::BAD_REQUEST,
        Some(ErrorKind::InternalError) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(response)).into_response()
}

pub(crate) async fn policy_handler<D>(
    State(pipeline): State<Arc<UnderwritingPipeline<D>>>,
) -> Response
where
    D: DiagnosticSink + 'static,
{
    (StatusCode::OK, Json(pipeline.policy().clone())).into_response()
}
