//! Client error types

use bytes::Bytes;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// Request could not be built or sent, or no response arrived
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API host answered with a non-200 status
    #[error("API request failed with status {status}: {body:?}")]
    Transport { status: u16, body: Bytes },

    /// Response body was not the expected JSON shape
    #[error("JSON codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// An array response carried no elements
    #[error("Empty response: server returned no upload grants")]
    EmptyResponse,

    /// Local file could not be opened or read
    #[error("Cannot access file {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Storage host rejected the multipart upload
    #[error("Upload failed with status {status}: {body:?}")]
    Upload { status: u16, body: Bytes },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// HTTP status carried by the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } | Self::Upload { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Raw response body carried by the error
    pub fn body(&self) -> Option<&Bytes> {
        match self {
            Self::Transport { body, .. } | Self::Upload { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Check if the API rejected the key
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display_includes_body() {
        let error = ClientError::Transport {
            status: 400,
            body: Bytes::from_static(br#"{"error":"Invalid API key"}"#),
        };

        assert_eq!(error.status(), Some(400));
        assert!(error.to_string().contains("Invalid API key"));
        assert!(!error.is_unauthorized());
    }

    #[test]
    fn test_unauthorized() {
        let error = ClientError::Upload {
            status: 403,
            body: Bytes::new(),
        };
        assert!(error.is_unauthorized());
        assert_eq!(error.body().map(|b| b.len()), Some(0));
    }

    #[test]
    fn test_file_access_display() {
        let error = ClientError::file_access(
            "missing.pdf",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(error.to_string().contains("missing.pdf"));
        assert_eq!(error.status(), None);
    }
}
