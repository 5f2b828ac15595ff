use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use loan_engine::error::AppError;
use loan_engine::workflows::underwriting::{
    evaluate_batch, underwriting_router, BatchOutcome, DiagnosticSink, UnderwritingPipeline,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_underwriting_routes<D>(pipeline: Arc<UnderwritingPipeline<D>>) -> Router
where
    D: DiagnosticSink + 'static,
{
    let batch = Router::new()
        .route("/api/v1/loans/batch", post(batch_endpoint::<D>))
        .with_state(pipeline.clone());

    underwriting_router(pipeline)
        .merge(batch)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Evaluate a CSV upload, one applicant per row.
pub(crate) async fn batch_endpoint<D>(
    State(pipeline): State<Arc<UnderwritingPipeline<D>>>,
    body: String,
) -> Result<Json<Vec<BatchOutcome>>, AppError>
where
    D: DiagnosticSink + 'static,
{
    let outcomes = evaluate_batch(&pipeline, body.as_bytes())?;
    Ok(Json(outcomes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use loan_engine::workflows::underwriting::TracingDiagnostics;
    use tower::ServiceExt;

    const CSV: &str = "\
monthly_income,age,credit_score,employment_stability_score,loan_amount_requested,base_interest_rate,ltv_ratio,include_plot,plot_size_sqft,floors,base_cost_per_sqft,luxury_level,location_score
60000,30,780,0.8,2000000,9,0.8,false,1200,2,1500,0.3,0.5
";

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn batch_endpoint_returns_one_outcome_per_row() {
        let pipeline = Arc::new(UnderwritingPipeline::default());

        let Json(outcomes) =
            batch_endpoint::<TracingDiagnostics>(State(pipeline), CSV.to_string())
                .await
                .expect("batch evaluates");

        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].response.success);
    }

    #[tokio::test]
    async fn batch_endpoint_rejects_ragged_csv() {
        let pipeline = Arc::new(UnderwritingPipeline::default());
        let ragged = "monthly_income,age\n60000,30,extra\n".to_string();

        let result = batch_endpoint::<TracingDiagnostics>(State(pipeline), ragged).await;

        let response = result.expect_err("ragged rows fail").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn eligibility_route_is_mounted() {
        let router = with_underwriting_routes(Arc::new(UnderwritingPipeline::default()));

        let response = router
            .oneshot(
                Request::get("/api/v1/loans/policy")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
    }
}
