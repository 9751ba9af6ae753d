//! Error types for the remote order source.

use thiserror::Error;

/// Failures while talking to the order source.
///
/// "The order has no items" is not an error: it is `Ok(vec![])`.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No session cookie is available. The user has to sign in first.
    #[error("No session credentials: sign in to the order source and try again")]
    MissingCredentials,

    /// Requests are only ever sent to the configured source host.
    #[error("Refusing to fetch outside the order source: {0}")]
    ForeignHost(String),

    #[error("Invalid URL {0}: {1}")]
    InvalidUrl(String, url::ParseError),

    #[error("HTTP {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Scripted failure from [`MockOrderSource`](super::MockOrderSource).
    #[error("Mock failure: {0}")]
    Mock(String),
}
