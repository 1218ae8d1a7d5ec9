use reqwest::StatusCode;

/// Errors surfaced by the [`ApiClient`](super::ApiClient).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ClientError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The refresh call failed; the stored token has been cleared.
    #[error("session refresh failed: {detail}")]
    RefreshFailed {
        status: Option<StatusCode>,
        detail: String,
    },

    /// Another request already ended the session while this one waited to
    /// refresh it.
    #[error("session ended while waiting for refresh")]
    SessionEnded,

    /// The backend answered with a non-success status.
    #[error("{status}: {body}")]
    Status { status: StatusCode, body: String },

    /// A success response carried a body that could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Reading or writing the token store failed.
    #[error(transparent)]
    Store(#[from] marquee_common::Error),
}

impl ClientError {
    /// Whether the caller should send the user back to the login screen.
    pub fn requires_login(&self) -> bool {
        match self {
            Self::RefreshFailed { .. } | Self::SessionEnded => true,
            Self::Status { status, .. } => *status == StatusCode::UNAUTHORIZED,
            _ => false,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::RefreshFailed { status, .. } => *status,
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }
}
