//! Error types for the perks client library.

/// All errors that can occur when using the perks client or search view.
#[derive(Debug, thiserror::Error)]
pub enum PerksError {
    /// The HTTP transport failed (connection, TLS, body read).
    #[cfg(any(feature = "async", feature = "blocking"))]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL could not be joined with an endpoint path.
    #[cfg(any(feature = "async", feature = "blocking"))]
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// The server answered with a non-success status.
    #[error("api error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Human-readable `message` field from the error body, if any.
        message: Option<String>,
    },

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An authenticated endpoint was called without a bearer token.
    #[error("this endpoint requires an access token")]
    MissingToken,

    /// A perk source backend failed.
    #[error("perk source error: {0}")]
    Source(Box<dyn core::error::Error + Send + Sync>),
}

impl PerksError {
    /// Returns the server-provided message, if the server sent one.
    ///
    /// Only [`PerksError::Api`] carries a server message; every other
    /// variant returns `None` so callers fall back to a generic text.
    #[inline]
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match *self {
            Self::Api { ref message, .. } => message.as_deref().filter(|msg| !msg.trim().is_empty()),
            #[cfg(any(feature = "async", feature = "blocking"))]
            Self::Http(_) | Self::Url(_) => None,
            Self::Serialization(_) | Self::MissingToken | Self::Source(_) => None,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, PerksError>;
