use thiserror::Error;

/// Result type alias for drover operations
pub type Result<T> = std::result::Result<T, DroverError>;

/// Errors that can occur while bootstrapping trust or fetching resources
#[derive(Error, Debug)]
pub enum DroverError {
    /// Server address is not an absolute http(s) URL
    #[error("invalid server URL: {0}")]
    InvalidUrl(String),

    /// The system CSPRNG failed to produce a nonce
    #[error("nonce generation failed")]
    Nonce,

    /// HTTP request failed at the transport level
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Server answered with a non-success status
    #[error("response {status} from {url}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
        /// Truncated response body
        body: String,
    },

    /// Bootstrap response failed the keyed-hash integrity check
    #[error("response hash ({received}) does not match ({computed})")]
    HashMismatch {
        /// Hash the server sent
        received: String,
        /// Hash computed locally
        computed: String,
    },

    /// A verified bundle could not be loaded as trust roots
    #[error("invalid CA bundle: {0}")]
    InvalidCaBundle(String),

    /// Hardware token channel reported an error
    #[error("hardware token error: {0}")]
    Hardware(String),
}

impl DroverError {
    /// Returns true if the error is a transport-level failure
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    /// Returns true if the error is a failed integrity check.
    ///
    /// Integrity failures are fatal: the response body has been discarded
    /// and the attempt must not be downgraded or retried with the same
    /// nonce.
    #[must_use]
    pub const fn is_integrity_violation(&self) -> bool {
        matches!(self, Self::HashMismatch { .. })
    }

    /// Returns the HTTP status code if the server answered with one
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
