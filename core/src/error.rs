//! Error types for the monitor API client.
//!
//! # Design
//! `Unauthorized` gets a dedicated variant because it carries meaning beyond
//! the status code: the agent considers the session invalid and the embedder
//! is expected to send the user back through login. Every other non-2xx
//! response lands in `Api` with the status code and the server's status
//! text. Serialization problems keep `String` payloads so the enum stays
//! cheap to move across threads.

use thiserror::Error;

/// A failure reported by the HTTP layer itself: the request could not be
/// sent or the response could not be read. Not retried, not wrapped further.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Errors returned by `MonitorClient` parse methods and `Session::fetch`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The agent answered 401 or 302 — the session is no longer valid.
    #[error("unauthorized")]
    Unauthorized,

    /// The agent answered with a non-2xx status other than 401/302.
    #[error("API error: {status_text}")]
    Api { status: u16, status_text: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The underlying transport failed before a response was available.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
