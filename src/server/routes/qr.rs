use crate::error::AgendaError;
use crate::media::{QR_FILE_NAME, render_png};
use crate::server::router::AgendaState;
use axum::{
    Router,
    extract::rejection::QueryRejection,
    extract::{Query, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use std::fs;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct QrParams {
    /// Text to encode, typically an image URL.
    pub url: String,
}

pub fn router() -> Router<AgendaState> {
    Router::new().route("/qr", get(generate_qr))
}

/// GET /qr?url=...
///
/// Responds with the PNG and keeps a copy as `qr_code.png` in the images directory.
pub(super) async fn generate_qr(
    State(state): State<AgendaState>,
    params: Result<Query<QrParams>, QueryRejection>,
) -> Result<Response, AgendaError> {
    let Query(QrParams { url }) = params?;
    let images_dir = state.images_dir.clone();

    let png = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, AgendaError> {
        let png = render_png(&url)?;
        fs::create_dir_all(images_dir.as_path())?;
        fs::write(images_dir.join(QR_FILE_NAME), &png)?;
        Ok(png)
    })
    .await
    .map_err(|e| AgendaError::UnexpectedError(format!("QR task failed: {e}")))??;

    debug!(bytes = png.len(), "QR code generated");
    Ok(([(CONTENT_TYPE, "image/png")], png).into_response())
}
