use thiserror::Error;

/// Top-level error type for the `picfg-api` crate.
///
/// Covers every failure mode of a single API call: transport, the
/// status-code classification of the response, and body decoding.
/// `picfg-core` decides per workflow stage whether these are fatal.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Authentication / authorization ──────────────────────────────
    /// Credentials rejected (HTTP 302 redirect to login, or 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Authenticated, but not allowed to use the REST API (HTTP 403).
    #[error("Authorization failed: {message}")]
    Authorization { message: String },

    // ── Request / protocol ──────────────────────────────────────────
    /// The resource does not exist (HTTP 404).
    #[error("URL not found: {url}")]
    NotFound { url: String },

    /// The server rejected the request (HTTP 400), with the message
    /// taken from the `errorDocument` envelope.
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Content negotiation failed (HTTP 406 / 415).
    #[error("Protocol error (HTTP {status}): {message}")]
    Protocol { status: u16, message: String },

    // ── Server ──────────────────────────────────────────────────────
    /// Server-side failure (HTTP 500 / 502 / 503). Never retried.
    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// Any status code outside the documented set.
    #[error("Unknown response, return code is {status}")]
    UnknownResponse { status: u16 },

    // ── Data ────────────────────────────────────────────────────────
    /// The body could not be decoded in the requested format.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` for failures below the HTTP layer (no response).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout { .. })
    }

    /// Returns `true` if the credentials were rejected.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::Authorization { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The HTTP status code that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::InvalidRequest { .. } => Some(400),
            Self::Protocol { status, .. }
            | Self::Server { status, .. }
            | Self::UnknownResponse { status } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
