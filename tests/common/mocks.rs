use async_trait::async_trait;
use banana_studio::{
    generation::{ApiKey, GeneratedImage, ProviderCall, ProviderError},
    provider::ImageProvider,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A provider call as seen by the fake, key included.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub call: ProviderCall,
    pub api_key: String,
}

/// Fake provider that records every call and replies with a canned result
#[derive(Debug, Clone)]
pub struct RecordingProvider {
    pub calls: Arc<Mutex<Vec<RecordedCall>>>,
    pub response: Result<GeneratedImage, ProviderError>,
    pub delay: Option<Duration>,
}

impl RecordingProvider {
    pub fn returning_image(bytes: &[u8], mime_type: &str) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            response: Ok(GeneratedImage {
                bytes: bytes.to_vec(),
                mime_type: mime_type.to_string(),
            }),
            delay: None,
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            response: Err(error),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn get_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for RecordingProvider {
    fn default() -> Self {
        Self::returning_image(b"\x89PNG\r\n\x1a\nfake", "image/png")
    }
}

#[async_trait]
impl ImageProvider for RecordingProvider {
    async fn generate(
        &self,
        call: &ProviderCall,
        api_key: &ApiKey,
    ) -> Result<GeneratedImage, ProviderError> {
        self.calls.lock().unwrap().push(RecordedCall {
            call: call.clone(),
            api_key: api_key.expose().to_string(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.response.clone()
    }
}
