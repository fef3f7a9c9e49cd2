use serde::{Deserialize, Serialize};

/// JSON alternative to the multipart form. Images are base64 (plain or
/// `data:` URLs).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonGenerationBody {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default, alias = "api_key")]
    pub api_key: Option<String>,
    #[serde(default, alias = "file")]
    pub image: Option<JsonImage>,
    #[serde(default, alias = "person")]
    pub person_image: Option<JsonImage>,
    #[serde(default, alias = "product", alias = "garment")]
    pub garment_image: Option<JsonImage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonImage {
    pub data: String,
    #[serde(default, alias = "mime", alias = "mime_type")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
