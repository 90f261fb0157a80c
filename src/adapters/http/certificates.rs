//! Certificate HTTP endpoint.
//!
//! Thin wrapper over the `CertificateGenerator` collaborator: validates
//! the request and streams the rendered PDF back.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use serde::Deserialize;

use crate::ports::CertificateGenerator;

use super::middleware::RequireAuth;
use super::ErrorResponse;

/// Shared state for the certificate endpoint.
#[derive(Clone)]
pub struct CertificateAppState {
    pub generator: Arc<dyn CertificateGenerator>,
}

/// POST /api/certificates request.
#[derive(Debug, Clone, Deserialize)]
pub struct CertificateRequest {
    pub student_name: String,
    pub course_name: String,
}

/// POST /api/certificates
pub async fn generate_certificate(
    State(state): State<CertificateAppState>,
    _auth: RequireAuth,
    Json(request): Json<CertificateRequest>,
) -> impl IntoResponse {
    if request.student_name.trim().is_empty() || request.course_name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "VALIDATION_FAILED",
                "student_name and course_name are required",
            )),
        )
            .into_response();
    }

    match state
        .generator
        .generate(&request.student_name, &request.course_name)
        .await
    {
        Ok(pdf) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/pdf"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=certificate.pdf",
                ),
            ],
            pdf,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Certificate generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "Failed to generate certificate",
                )),
            )
                .into_response()
        }
    }
}

/// Create the certificate router, mounted at `/api/certificates`.
pub fn certificate_routes() -> Router<CertificateAppState> {
    Router::new().route("/", post(generate_certificate))
}
