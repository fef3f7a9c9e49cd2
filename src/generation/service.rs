use super::{GeneratedImage, GenerationError, GenerationRequest, ProviderError, normalizer};
use crate::provider::ImageProvider;
use std::{sync::Arc, time::Duration};
use tracing::{debug, info, warn};

/// Validates, normalizes and forwards one request. Holds no per-request state.
#[derive(Clone)]
pub struct GenerationService {
    provider: Arc<dyn ImageProvider>,
    timeout: Duration,
}

impl GenerationService {
    pub fn new(provider: Arc<dyn ImageProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub async fn execute(
        &self,
        request: GenerationRequest,
    ) -> Result<GeneratedImage, GenerationError> {
        let call = normalizer::normalize(&request)?;

        debug!(
            "Calling provider for {} with {} image(s)",
            request.operation,
            call.images.len()
        );

        let result = tokio::time::timeout(
            self.timeout,
            self.provider.generate(&call, &request.api_key),
        )
        .await
        .map_err(|_| {
            ProviderError::Unavailable(format!(
                "provider did not respond within {}s",
                self.timeout.as_secs_f32()
            ))
        })?;

        match result {
            Ok(image) => {
                info!(
                    "Provider returned {} bytes of {} for {}",
                    image.bytes.len(),
                    image.mime_type,
                    request.operation
                );
                Ok(image)
            }
            Err(e) => {
                warn!("Provider call for {} failed ({}): {}", request.operation, e.kind(), e);
                Err(e.into())
            }
        }
    }
}
