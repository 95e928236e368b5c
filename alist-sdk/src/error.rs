//! AList SDK error types
//!
//! One error enum for the whole SDK; the blocking façade reuses it
//! unchanged, so an error surfaces identically whether an operation was
//! awaited or bridged.

use thiserror::Error;

/// Maximum response body size for API calls (16 MB).
/// Prevents OOM from malicious or misconfigured servers.
pub const MAX_RESPONSE_SIZE: usize = 16 * 1024 * 1024;

/// Error type for all AList SDK operations.
#[derive(Debug, Error)]
pub enum AListError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {status} for {url}")]
    Http { status: reqwest::StatusCode, url: String },

    #[error("API error (code {code}): {message}")]
    Api { code: u64, message: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Response too large ({size} bytes, max {MAX_RESPONSE_SIZE})")]
    ResponseTooLarge { size: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File is closed")]
    FileClosed,

    #[error("File is not opened")]
    FileNotOpened,

    #[error("Download failed: {0}")]
    Download(String),
}

/// Read a response body with size limit and deserialize as JSON.
///
/// Checks the `Content-Length` hint first (if available), then enforces
/// the limit on the actual body bytes before deserializing.
pub async fn json_with_limit<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, AListError> {
    if let Some(cl) = response.content_length() {
        if cl as usize > MAX_RESPONSE_SIZE {
            return Err(AListError::ResponseTooLarge { size: cl });
        }
    }
    let bytes = response.bytes().await?;
    if bytes.len() > MAX_RESPONSE_SIZE {
        return Err(AListError::ResponseTooLarge { size: bytes.len() as u64 });
    }
    serde_json::from_slice(&bytes).map_err(Into::into)
}

/// Check HTTP response status before processing body.
pub fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, AListError> {
    let status = resp.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(AListError::Http {
            status,
            url: resp.url().to_string(),
        });
    }
    Ok(resp)
}

impl From<reqwest::Error> for AListError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AListError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for AListError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}
