//! Error types for the client.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The login handshake was rejected. 401 means bad credentials, 403
    /// means the server demands an interactive login (captcha).
    #[error("authentication failed with status {status}")]
    Auth { status: u16 },

    #[error(transparent)]
    Rest(#[from] RestError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("dispatched operation did not complete: {0}")]
    Dispatch(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Non-2xx outcome of a single REST round trip. Fatal only to the one
/// operation that produced it.
#[derive(Error, Debug)]
#[error("REST call failed: {status} {reason}")]
pub struct RestError {
    pub status: u16,
    pub reason: String,
    pub body: ErrorBody,
}

/// Structured server error payload. Absent or unparseable bodies decode to
/// the empty default; the failure is still surfaced.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorBody {
    pub error_messages: Vec<String>,
    pub errors: BTreeMap<String, String>,
}

/// A field value that did not match its resolved shape. Collected per issue
/// decode and returned alongside the partial result; never aborts the
/// document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("field `{field}`: expected {expected}")]
pub struct FieldDecodeError {
    pub field: String,
    pub expected: &'static str,
}

/// A duplicate field id in the server's field listing. The first occurrence
/// is kept and the duplicate dropped; never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("duplicate field id `{id}` in field listing, first occurrence kept")]
pub struct SchemaBuildError {
    pub id: String,
}
