use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::domain::DiagnosticInput;
use super::service::{DiagnosisError, DiagnosisService};

/// Router builder exposing the diagnosis endpoints.
pub fn diagnosis_router(service: Arc<DiagnosisService>) -> Router {
    Router::new()
        .route("/api/v1/diagnosis", post(diagnose_handler))
        .route("/api/v1/diagnosis/export", post(export_handler))
        .with_state(service)
}

pub(crate) async fn diagnose_handler(
    State(service): State<Arc<DiagnosisService>>,
    axum::Json(input): axum::Json<DiagnosticInput>,
) -> Response {
    match service.diagnose(input).await {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(DiagnosisError::Intake(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn export_handler(
    State(service): State<Arc<DiagnosisService>>,
    axum::Json(input): axum::Json<DiagnosticInput>,
) -> Response {
    match service.export_csv(input).await {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, mime::TEXT_CSV.as_ref()),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"diagnosis.csv\"",
                ),
            ],
            body,
        )
            .into_response(),
        Err(DiagnosisError::Intake(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
