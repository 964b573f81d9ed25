//! Error types for comic-wall-poster
//!
//! Every failure of a remote collaborator (comic archive, VK API, VK upload server)
//! is a [`RemoteError`]. Local failures are limited to configuration and file I/O.
//! Nothing is recovered locally: the first error aborts the run.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for comic-wall-poster operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for comic-wall-poster
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The environment key that caused the error (e.g., "VK_GROUP_ID")
        key: Option<String>,
    },

    /// A remote call failed
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// I/O error while writing or reading the local image
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error tied to an environment key
    pub(crate) fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}

/// Failure reported by, or while talking to, a remote service
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Connection, timeout, or body decoding failure
    #[error("network error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-success HTTP status
    #[error("HTTP {status} from {url}: {body}")]
    Status {
        /// Request URL without query string
        url: String,
        /// Status code returned
        status: StatusCode,
        /// Response body, possibly empty
        body: String,
    },

    /// VK returned an error envelope inside a 200 response
    #[error("VK method {method} failed with code {code}: {message}")]
    Api {
        /// API method name (e.g., "photos.saveWallPhoto")
        method: String,
        /// VK error code
        code: i64,
        /// VK error message
        message: String,
    },

    /// The response did not have the expected structure
    #[error("malformed {what}: {reason}")]
    Malformed {
        /// What was being parsed
        what: String,
        /// Why it was rejected
        reason: String,
    },

    /// Requested comic is outside the published range
    #[error("comic {id} is outside the published range 1..={latest}")]
    ComicOutOfRange {
        /// Requested comic number
        id: u32,
        /// Latest published comic number
        latest: u32,
    },
}

// VK takes the access token as a query parameter, so request URLs never end up in messages
impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        RemoteError::Transport(e.without_url())
    }
}

impl RemoteError {
    pub(crate) fn malformed(what: impl Into<String>, reason: impl ToString) -> Self {
        RemoteError::Malformed {
            what: what.into(),
            reason: reason.to_string(),
        }
    }
}
