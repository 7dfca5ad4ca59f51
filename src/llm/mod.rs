mod client;

pub use client::*;

use reqwest::StatusCode;
use thiserror::Error;

/// Failures of a single completion round-trip. The client never retries;
/// callers decide whether to re-invoke.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("completion endpoint returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("completion response contained no message content")]
    NoContent,
}
