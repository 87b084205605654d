use std::{io::ErrorKind, path::Path};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, PlaylistError>;

/// Everything that can go wrong while loading or serving a playlist
#[derive(Debug, thiserror::Error)]
pub enum PlaylistError {
    /// Network / file I/O failure, non-2xx status, timeout
    #[error("{message}")]
    Transport { message: String },

    /// Local playlist file does not exist
    #[error("Local playlist file not found: {}", .path.display())]
    NotFound { path: Box<Path> },

    /// Content is not a playlist we understand
    #[error("{message}. Head={snippet:?}")]
    Format { message: String, snippet: String },

    /// Bad request parameters
    #[error("{message}")]
    Validation { message: String },
}

impl PlaylistError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn format(message: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
            snippet: snippet.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Maps a failed local read, keeping `NotFound` distinct from other I/O errors
    pub fn from_file_read(path: &Path, err: &std::io::Error) -> Self {
        if err.kind() == ErrorKind::NotFound {
            return Self::NotFound { path: path.into() };
        }

        Self::transport(format!(
            "Error reading local playlist file {}: {err}",
            path.display()
        ))
    }

    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Transport { .. } | Self::NotFound { .. } | Self::Format { .. } => {
                StatusCode::BAD_GATEWAY
            }
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<reqwest::Error> for PlaylistError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::transport(format!("Timed out fetching playlist: {err}"));
        }
        if let Some(status) = err.status() {
            return Self::transport(format!("Playlist server answered {status}: {err}"));
        }

        Self::transport(format!("Fetching playlist failed: {err}"))
    }
}

impl IntoResponse for PlaylistError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
