//! Error types for the Matrix API client.
//!
//! # Design
//! `Forbidden` gets a dedicated variant because callers frequently
//! distinguish "the credentials were rejected" from "the server returned an
//! unexpected status," and a 403 carries a structured Matrix error body
//! worth decoding. All other non-2xx responses land in `HttpError` with the
//! raw status code and body for debugging.

use std::fmt;

use unjson::UnmarshalError;

use crate::types::MatrixError;

/// Errors returned by `MatrixClient` build and parse methods.
#[derive(Debug)]
pub enum ApiError {
    /// The server returned 403 — credentials or login type rejected. The
    /// Matrix error body is decoded best-effort.
    Forbidden(MatrixError),

    /// The server returned a non-2xx status other than 403.
    HttpError { status: u16, body: String },

    /// The response body was not valid JSON.
    InvalidJson(String),

    /// The response body was JSON but its shape did not match the expected
    /// type (strict unmarshal).
    Mismatch(UnmarshalError),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Forbidden(err) => {
                write!(f, "forbidden ({}): {}", err.errcode, err.message)
            }
            ApiError::HttpError { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::InvalidJson(msg) => {
                write!(f, "response body is not JSON: {msg}")
            }
            ApiError::Mismatch(err) => {
                write!(f, "response shape mismatch: {err}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Mismatch(err) => Some(err),
            _ => None,
        }
    }
}
