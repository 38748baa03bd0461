//! Error types for detectview

use thiserror::Error;

use crate::upload::MAX_UPLOAD_BYTES;

/// Problems caught locally, before anything reaches the network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("not an image: please select an image file (got {mime_type})")]
    NotAnImage { mime_type: String },

    #[error("too large: file size must be less than 10MB ({size} bytes, max {max} bytes)", max = MAX_UPLOAD_BYTES)]
    TooLarge { size: u64 },

    #[error("please select an image file")]
    NoSelection,

    #[error("a detection is already in progress")]
    Busy,

    #[error("could not read file: {0}")]
    Unreadable(String),
}

/// Failures talking to the detection service.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Non-success HTTP status. The message is the server's `detail` when it sent one.
    #[error("{message}")]
    Server {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// 2xx response whose body still reports `success: false`.
    #[error("Detection failed")]
    Rejected,

    #[error("invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_reasons() {
        let err = ValidationError::NotAnImage {
            mime_type: "text/plain".to_string(),
        };
        assert!(err.to_string().starts_with("not an image"));
        assert!(err.to_string().contains("text/plain"));

        let err = ValidationError::TooLarge { size: 11 * 1024 * 1024 };
        assert!(err.to_string().starts_with("too large"));
    }

    #[test]
    fn test_server_error_is_verbatim() {
        let err = ClientError::Server {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            message: "model unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "model unavailable");
    }

    #[test]
    fn test_client_error_from_url() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err: ClientError = parse_err.into();
        match err {
            ClientError::InvalidUrl(_) => {}
            _ => panic!("Expected InvalidUrl error"),
        }
    }
}
