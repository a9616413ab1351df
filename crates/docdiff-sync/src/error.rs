use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("request to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },
    #[error("request aborted")]
    Aborted,
}

impl FetchError {
    /// A superseded or cancelled request. Not shown to the user.
    pub fn is_abort(&self) -> bool {
        matches!(self, FetchError::Aborted)
    }

    /// Worth another attempt: timeouts, connection failures, and 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Timeout { .. } => true,
            FetchError::Server { status, .. } => *status >= 500,
            FetchError::Http(e) => e.is_timeout() || e.is_connect(),
            FetchError::Json(_) | FetchError::Aborted => false,
        }
    }
}
