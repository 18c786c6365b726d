//! Axum route handlers for the Render API.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::cv::completeness::completeness;
use crate::errors::AppError;
use crate::render::export::{run_export, ExportStatus};
use crate::render::preview::{render_preview, RenderedCv};
use crate::state::AppState;

#[derive(Serialize)]
pub struct PreviewResponse {
    pub preview: RenderedCv,
    pub markdown: String,
    pub completeness: u8,
}

/// GET /api/v1/render/preview
pub async fn handle_preview(State(state): State<AppState>) -> Json<PreviewResponse> {
    let snapshot = state.store.snapshot();
    let preview = render_preview(&snapshot);
    Json(PreviewResponse {
        markdown: preview.to_markdown(),
        preview,
        completeness: completeness(&snapshot),
    })
}

/// GET /api/v1/render/status
pub async fn handle_export_status(State(state): State<AppState>) -> Json<ExportStatus> {
    Json(state.exports.status())
}

/// POST /api/v1/render/export
pub async fn handle_export(State(state): State<AppState>) -> Result<Response, AppError> {
    let artifact = run_export(&state.store, &state.exports, state.exporter.as_ref()).await?;

    Ok((
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&artifact.filename),
            ),
            (
                header::HeaderName::from_static("x-export-job"),
                artifact.job_id.to_string(),
            ),
        ],
        artifact.bytes,
    )
        .into_response())
}

/// `attachment` disposition with an ASCII fallback name and the exact UTF-8
/// name percent-encoded in `filename*`.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut encoded = String::with_capacity(filename.len() * 3);
    for byte in filename.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }

    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}
