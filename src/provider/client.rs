use super::types::*;
use crate::{
    Result,
    config::ProviderConfig,
    generation::{ApiKey, GeneratedImage, ProviderCall, ProviderError},
};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// One outbound call. The key is used for this call only.
    async fn generate(
        &self,
        call: &ProviderCall,
        api_key: &ApiKey,
    ) -> std::result::Result<GeneratedImage, ProviderError>;
}

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_request(call: &ProviderCall) -> GenerateContentRequest {
        let mut parts = vec![Part::Text {
            text: call.prompt.clone(),
        }];
        parts.extend(call.images.iter().map(|image| Part::InlineData {
            inline_data: InlineData {
                mime_type: Some(image.mime_type.clone()),
                data: STANDARD.encode(&image.bytes),
            },
        }));

        GenerateContentRequest {
            contents: vec![Content { role: None, parts }],
            generation_config: GenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
            },
        }
    }
}

#[async_trait]
impl ImageProvider for GeminiClient {
    async fn generate(
        &self,
        call: &ProviderCall,
        api_key: &ApiKey,
    ) -> std::result::Result<GeneratedImage, ProviderError> {
        // Checked here as well so reqwest never fails to build the header.
        if api_key.is_empty() || !api_key.is_header_safe() {
            return Err(ProviderError::Auth(
                "API key is missing or contains invalid characters".to_string(),
            ));
        }

        debug!(
            "Sending generateContent to model {} with {} image(s)",
            self.model,
            call.images.len()
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key.expose())
            .json(&Self::build_request(call))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::NoImageReturned(format!("unreadable provider response: {}", e))
        })?;

        match parsed.outcome() {
            ResponseOutcome::Image { data, mime_type } => {
                let bytes = STANDARD.decode(data.as_bytes()).map_err(|e| {
                    ProviderError::NoImageReturned(format!("invalid image payload: {}", e))
                })?;
                if bytes.is_empty() {
                    return Err(ProviderError::NoImageReturned(
                        "provider returned an empty image".to_string(),
                    ));
                }
                Ok(GeneratedImage { bytes, mime_type })
            }
            ResponseOutcome::Blocked(reason) => Err(ProviderError::ContentRejected(reason)),
            ResponseOutcome::NoImage(reason) => Err(ProviderError::NoImageReturned(reason)),
        }
    }
}

fn map_transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Unavailable("provider request timed out".to_string())
    } else {
        ProviderError::Unavailable(format!("provider unreachable: {}", err))
    }
}

pub(crate) fn map_status_error(status: StatusCode, body: &str) -> ProviderError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let message = parsed
        .as_ref()
        .map(|envelope| envelope.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("provider returned HTTP {}", status.as_u16()));

    let invalid_key = parsed.as_ref().is_some_and(|envelope| {
        envelope.error.message.contains("API key")
            || envelope
                .error
                .details
                .iter()
                .any(|d| d.get("reason").and_then(|r| r.as_str()) == Some("API_KEY_INVALID"))
    });

    let auth_status = parsed.as_ref().is_some_and(|envelope| {
        matches!(
            envelope.error.status.as_deref(),
            Some("UNAUTHENTICATED" | "PERMISSION_DENIED")
        )
    });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Auth(message),
        StatusCode::BAD_REQUEST if invalid_key => ProviderError::Auth(message),
        s if s.is_client_error() && auth_status => ProviderError::Auth(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => {
            ProviderError::Unavailable(message)
        }
        s if s.is_server_error() => ProviderError::Unavailable(message),
        s if s.is_client_error() => ProviderError::ContentRejected(message),
        _ => ProviderError::Unavailable(message),
    }
}
