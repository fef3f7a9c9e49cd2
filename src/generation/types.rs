use std::fmt;

/// The four things a client can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Generate,
    Edit,
    TryOn,
    Restore,
}

impl Operation {
    pub fn required_images(self) -> usize {
        match self {
            Self::Generate => 0,
            Self::Edit | Self::Restore => 1,
            Self::TryOn => 2,
        }
    }

    /// Generate and Edit have nothing to say without user text.
    pub fn requires_prompt(self) -> bool {
        matches!(self, Self::Generate | Self::Edit)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Edit => "edit",
            Self::TryOn => "virtual_try_on",
            Self::Restore => "restore_old_image",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct InputImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl InputImage {
    pub fn new(bytes: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }
}

impl fmt::Debug for InputImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputImage")
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// Caller-supplied provider credential. Lives for one request only.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Surrounding whitespace is dropped here, so what is checked is what is sent.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into().trim().to_string())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys travel in an HTTP header: printable ASCII only.
    pub fn is_header_safe(&self) -> bool {
        self.0.chars().all(|c| c.is_ascii_graphic())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub operation: Operation,
    pub prompt: String,
    pub images: Vec<InputImage>,
    pub api_key: ApiKey,
}

/// Normalized shape sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCall {
    pub prompt: String,
    pub images: Vec<InputImage>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl fmt::Debug for GeneratedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedImage")
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .field("mime_type", &self.mime_type)
            .finish()
    }
}
