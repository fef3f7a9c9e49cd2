//! Decodes multipart or JSON bodies into a [`GenerationForm`].

use super::types::{JsonGenerationBody, JsonImage};
use crate::generation::{
    ApiKey, GenerationRequest, InputImage, Operation, ValidationError, normalizer,
};
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};

const DEFAULT_MIME: &str = "image/png";

/// Which role an uploaded image plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageSlot {
    Image,
    Person,
    Garment,
}

impl ImageSlot {
    fn from_field(name: &str) -> Option<Self> {
        match name {
            "image" | "file" => Some(Self::Image),
            "personImage" | "person_image" | "person" => Some(Self::Person),
            "garmentImage" | "garment_image" | "garment" | "product" => Some(Self::Garment),
            _ => None,
        }
    }
}

/// Everything the client sent, before any operation rules are applied.
#[derive(Debug, Default)]
pub struct GenerationForm {
    pub prompt: Option<String>,
    pub api_key: Option<String>,
    pub images: Vec<InputImage>,
    pub person_images: Vec<InputImage>,
    pub garment_images: Vec<InputImage>,
}

impl GenerationForm {
    fn push(&mut self, slot: ImageSlot, image: InputImage) {
        // Browsers submit an empty part for an untouched file input.
        if image.bytes.is_empty() {
            return;
        }
        match slot {
            ImageSlot::Image => self.images.push(image),
            ImageSlot::Person => self.person_images.push(image),
            ImageSlot::Garment => self.garment_images.push(image),
        }
    }

    /// Assigns image roles for `operation`. Try-on is always person, then garment.
    pub fn into_request(self, operation: Operation) -> Result<GenerationRequest, ValidationError> {
        let images = match operation {
            Operation::TryOn => {
                if !self.images.is_empty()
                    || self.person_images.len() != 1
                    || self.garment_images.len() != 1
                {
                    return Err(ValidationError::WrongImageRoles {
                        operation,
                        person: self.person_images.len(),
                        garment: self.garment_images.len(),
                        other: self.images.len(),
                    });
                }
                let mut images = self.person_images;
                images.extend(self.garment_images);
                images
            }
            _ => {
                let mut images = self.images;
                images.extend(self.person_images);
                images.extend(self.garment_images);
                images
            }
        };

        normalizer::check_image_count(operation, &images)?;

        Ok(GenerationRequest {
            operation,
            prompt: self.prompt.unwrap_or_default(),
            images,
            api_key: ApiKey::new(self.api_key.unwrap_or_default()),
        })
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ValidationError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ValidationError::malformed(format!("invalid multipart body: {}", e)))?
        {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            match name.as_str() {
                "prompt" => form.prompt = Some(read_text(field).await?),
                "apiKey" | "api_key" => form.api_key = Some(read_text(field).await?),
                other => {
                    let Some(slot) = ImageSlot::from_field(other) else {
                        continue;
                    };
                    let mime_type = field
                        .content_type()
                        .filter(|ct| !ct.is_empty() && *ct != "application/octet-stream")
                        .unwrap_or(DEFAULT_MIME)
                        .to_string();
                    let bytes = field.bytes().await.map_err(|e| {
                        ValidationError::malformed(format!("failed to read '{}': {}", name, e))
                    })?;
                    form.push(slot, InputImage::new(bytes.to_vec(), mime_type));
                }
            }
        }

        Ok(form)
    }

    fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        let body: JsonGenerationBody = serde_json::from_slice(body)
            .map_err(|e| ValidationError::malformed(format!("invalid JSON body: {}", e)))?;

        let mut form = Self {
            prompt: body.prompt,
            api_key: body.api_key,
            ..Self::default()
        };

        for (slot, image) in [
            (ImageSlot::Image, body.image),
            (ImageSlot::Person, body.person_image),
            (ImageSlot::Garment, body.garment_image),
        ] {
            if let Some(image) = image {
                form.push(slot, decode_json_image(image)?);
            }
        }

        Ok(form)
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ValidationError> {
    let name = field.name().unwrap_or_default().to_string();
    field
        .text()
        .await
        .map_err(|e| ValidationError::malformed(format!("failed to read '{}': {}", name, e)))
}

/// Accepts raw base64 or a `data:<mime>;base64,<payload>` URL.
fn decode_json_image(image: JsonImage) -> Result<InputImage, ValidationError> {
    let (url_mime, payload) = match image.data.strip_prefix("data:") {
        Some(rest) => {
            let (meta, payload) = rest
                .split_once(',')
                .ok_or_else(|| ValidationError::malformed("invalid data URL"))?;
            let mime = meta.strip_suffix(";base64").unwrap_or(meta);
            (Some(mime.to_string()).filter(|m| !m.is_empty()), payload)
        }
        None => (None, image.data.as_str()),
    };

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| ValidationError::malformed(format!("invalid base64 image: {}", e)))?;

    let mime_type = image
        .mime_type
        .or(url_mime)
        .unwrap_or_else(|| DEFAULT_MIME.to_string());

    Ok(InputImage::new(bytes, mime_type))
}

#[async_trait]
impl<S> FromRequest<S> for GenerationForm
where
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ValidationError::malformed(e.body_text()))?;
            Self::from_multipart(multipart).await
        } else if content_type.starts_with("application/json") {
            let body = Bytes::from_request(req, state)
                .await
                .map_err(|e| ValidationError::malformed(e.body_text()))?;
            Self::from_json(&body)
        } else {
            Err(ValidationError::malformed(format!(
                "unsupported content type '{}', expected multipart/form-data or application/json",
                content_type
            )))
        }
    }
}
