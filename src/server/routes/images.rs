use crate::error::AgendaError;
use crate::media::{CropBox, Transform, process_upload};
use crate::server::router::AgendaState;
use agenda_schema::MessageBody;
use axum::{
    Json, Router,
    extract::multipart::MultipartRejection,
    extract::rejection::QueryRejection,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    routing::post,
};
use serde::Deserialize;
use tracing::info;

/// Multipart field carrying the file.
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Default, Deserialize)]
pub struct ImageParams {
    /// `left,upper,right,lower`
    pub crop: Option<String>,
    #[serde(default)]
    pub fliph: bool,
    #[serde(default)]
    pub colorize: bool,
}

impl ImageParams {
    fn transform(&self) -> Result<Transform, AgendaError> {
        let crop = self
            .crop
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(str::parse::<CropBox>)
            .transpose()?;
        Ok(Transform {
            crop,
            flip_horizontal: self.fliph,
            colorize: self.colorize,
        })
    }
}

pub fn router(max_upload_bytes: usize) -> Router<AgendaState> {
    Router::new()
        .route("/images", post(upload_image))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// POST /images?crop=l,u,r,b&fliph=true&colorize=true
pub(super) async fn upload_image(
    State(state): State<AgendaState>,
    params: Result<Query<ImageParams>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageBody>, AgendaError> {
    let Query(params) = params?;
    let transform = params.transform()?;
    let mut multipart = multipart?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;
        upload = Some((file_name, bytes));
        break;
    }
    let Some((file_name, bytes)) = upload else {
        return Err(AgendaError::bad_request(
            "MISSING_IMAGE",
            format!("multipart field `{IMAGE_FIELD}` is required"),
        ));
    };

    let images_dir = state.images_dir.clone();
    let path = tokio::task::spawn_blocking(move || {
        process_upload(
            images_dir.as_path(),
            file_name.as_deref(),
            &bytes,
            &transform,
        )
    })
    .await
    .map_err(|e| AgendaError::UnexpectedError(format!("image task failed: {e}")))??;

    info!(path = %path.display(), "Image processed and saved");
    Ok(Json(MessageBody::new("Image processed and saved")))
}
