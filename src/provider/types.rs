//! Gemini `generateContent` payloads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Variant order matters for untagged decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    InlineData {
        #[serde(rename = "inlineData", alias = "inline_data")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default, alias = "mime_type")]
    pub mime_type: Option<String>,
    pub data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// `{"error": {"code", "message", "status", "details"}}`
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub details: Vec<serde_json::Value>,
}

/// What a response amounts to once the loose JSON has been inspected.
#[derive(Debug, PartialEq, Eq)]
pub enum ResponseOutcome {
    Image { data: String, mime_type: String },
    Blocked(String),
    NoImage(String),
}

impl GenerateContentResponse {
    pub fn outcome(self) -> ResponseOutcome {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.clone())
        {
            return ResponseOutcome::Blocked(format!("prompt blocked by provider: {}", reason));
        }

        let mut finish_reason = None;
        let mut text = Vec::new();

        for candidate in self.candidates {
            if finish_reason.is_none() {
                finish_reason = candidate.finish_reason.clone();
            }
            for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
                match part {
                    // An empty payload is not an image; keep looking.
                    Part::InlineData { inline_data } if inline_data.data.is_empty() => {}
                    Part::InlineData { inline_data } => {
                        return ResponseOutcome::Image {
                            data: inline_data.data,
                            mime_type: inline_data
                                .mime_type
                                .unwrap_or_else(|| "image/png".to_string()),
                        };
                    }
                    Part::Text { text: t } => text.push(t),
                    Part::Other(_) => {}
                }
            }
        }

        match finish_reason.as_deref() {
            Some(reason @ ("SAFETY" | "PROHIBITED_CONTENT" | "IMAGE_SAFETY" | "BLOCKLIST")) => {
                ResponseOutcome::Blocked(format!("generation stopped by provider: {}", reason))
            }
            _ if !text.is_empty() => {
                ResponseOutcome::NoImage(format!("No image returned: {}", text.join(" ")))
            }
            _ => ResponseOutcome::NoImage("No image returned".to_string()),
        }
    }
}
