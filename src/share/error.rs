//! Share-link error type.

/// Errors produced while encoding or decoding a share link.
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("Share token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Gzip stream error
    #[error("Share token could not be (de)compressed: {0}")]
    Compression(#[from] std::io::Error),

    #[error("Share payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Share link version {found} is newer than supported version {supported}")]
    VersionTooNew { found: u32, supported: u32 },

    #[error("Share link is for '{found}' but the map is '{expected}'")]
    KindMismatch { expected: String, found: String },

    #[error("Share payload is not a JSON object")]
    NotAnObject,

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}
