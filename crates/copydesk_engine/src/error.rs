use thiserror::Error;

pub const TIMEOUT_MESSAGE: &str = "request timed out, please try again later";
pub const NETWORK_MESSAGE: &str = "network error, please check your connection";
pub const GENERIC_SERVER_MESSAGE: &str = "the server returned an error";

/// Every way a call to the pipeline service can fail.
///
/// Only [`ApiError::user_message`] crosses into the UI layer; the variants
/// exist for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("http status {status}: {}", .detail.as_deref().unwrap_or("<no detail>"))]
    Server { status: u16, detail: Option<String> },
    #[error("response too large (max {max_bytes} bytes)")]
    TooLarge { max_bytes: u64 },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Builds a server error from a non-success body.
    ///
    /// Fallback chain: `detail` (string), then `message` (string), then nothing.
    /// A `detail` that is not a string, such as a validation error array, is
    /// skipped so a string `message` still reaches the user.
    pub fn from_error_body(status: u16, body: &[u8]) -> Self {
        let detail = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                ["detail", "message"].iter().find_map(|key| {
                    value
                        .get(*key)
                        .and_then(|v| v.as_str())
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(ToOwned::to_owned)
                })
            });
        ApiError::Server { status, detail }
    }

    /// The single human-readable message shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Timeout(_) => TIMEOUT_MESSAGE.to_string(),
            ApiError::InvalidUrl(_) | ApiError::Network(_) => NETWORK_MESSAGE.to_string(),
            ApiError::Server {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ApiError::Server { detail: None, .. }
            | ApiError::TooLarge { .. }
            | ApiError::Decode(_) => GENERIC_SERVER_MESSAGE.to_string(),
        }
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout(err.to_string());
    }
    if err.is_builder() {
        return ApiError::InvalidUrl(err.to_string());
    }
    ApiError::Network(err.to_string())
}
