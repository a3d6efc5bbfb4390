//! Errors surfaced by the price service client.

use thiserror::Error;

/// Every variant renders a non-empty, user-facing message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Could not reach the price service: {0}")]
    Transport(#[from] wreq::Error),

    #[error("Price service returned status {status}{}", suffix(.detail))]
    Status { status: u16, detail: Option<String> },

    #[error("Invalid response shape: {0}")]
    InvalidResponseShape(String),
}

fn suffix(detail: &Option<String>) -> String {
    detail.as_ref().map(|d| format!(": {}", d)).unwrap_or_default()
}

impl ApiError {
    pub(crate) fn shape(err: serde_json::Error) -> Self {
        Self::InvalidResponseShape(err.to_string())
    }

    /// Builds a status error, pulling `detail` or `message` out of a JSON error body.
    pub(crate) fn status(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body).ok().and_then(|v| {
            ["detail", "message", "error"]
                .iter()
                .find_map(|key| v.get(key).and_then(|d| d.as_str()).map(str::to_string))
        });

        Self::Status { status, detail: detail.filter(|d| !d.trim().is_empty()) }
    }
}
