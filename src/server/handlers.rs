use super::{form::GenerationForm, types::HealthResponse};
use crate::generation::{
    GeneratedImage, GenerationError, GenerationService, Operation, ProviderError,
};
use axum::{
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<GenerationService>,
}

pub async fn generate(State(state): State<AppState>, form: GenerationForm) -> Response {
    handle(state, Operation::Generate, form).await
}

pub async fn edit(State(state): State<AppState>, form: GenerationForm) -> Response {
    handle(state, Operation::Edit, form).await
}

pub async fn virtual_try_on(State(state): State<AppState>, form: GenerationForm) -> Response {
    handle(state, Operation::TryOn, form).await
}

pub async fn restore_old_image(State(state): State<AppState>, form: GenerationForm) -> Response {
    handle(state, Operation::Restore, form).await
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn handle(state: AppState, operation: Operation, form: GenerationForm) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("generation", %request_id, %operation);

    async move {
        info!("Received {} request", operation);

        let result = match form.into_request(operation) {
            Ok(request) => state.service.execute(request).await,
            Err(e) => Err(e.into()),
        };

        match result.and_then(image_response) {
            Ok(response) => response,
            Err(e) => {
                error!("{} request failed with {}: {}", operation, e.kind(), e);
                e.into_response()
            }
        }
    }
    .instrument(span)
    .await
}

fn image_response(image: GeneratedImage) -> Result<Response, GenerationError> {
    let content_type = HeaderValue::from_str(&image.mime_type).map_err(|_| {
        ProviderError::NoImageReturned(format!(
            "provider returned an invalid mime type '{}'",
            image.mime_type
        ))
    })?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        image.bytes,
    )
        .into_response())
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Banana Studio API</title></head>
<body>
  <h1>Banana Studio API</h1>
  <ul>
    <li><code>POST /api/generate</code>: generate an image from text</li>
    <li><code>POST /api/edit</code>: edit an uploaded image</li>
    <li><code>POST /api/virtual_try_on</code>: dress a person in a garment</li>
    <li><code>POST /api/restore_old_image</code>: restore an old photograph</li>
  </ul>
</body>
</html>
"#;
