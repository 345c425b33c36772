//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use picfg_config::ConfigError;
use picfg_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const IO: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Fatal run wrapper ────────────────────────────────────────────
    #[error("An unexpected error occurred while extracting configurations")]
    #[diagnostic(
        code(picfg::extraction_failed),
        help("See the log file for details: {log_file}")
    )]
    ExtractionFailed {
        log_file: String,
        #[source]
        source: Box<CliError>,
    },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to Prime Infrastructure at {url}")]
    #[diagnostic(
        code(picfg::connection_failed),
        help("Check that the server is reachable and the URL is correct.")
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(picfg::tls_error),
        help("Check the ca_cert path, or drop --strict-tls for self-signed servers.")
    )]
    TlsError { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(picfg::auth_failed),
        help("Verify the username and password for the Prime REST API.")
    )]
    AuthFailed { message: String },

    #[error("Access denied: {message}")]
    #[diagnostic(
        code(picfg::permission_denied),
        help("The account needs a role with NBI read access.")
    )]
    PermissionDenied { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Resource not found: {url}")]
    #[diagnostic(code(picfg::not_found))]
    NotFound { url: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(picfg::api_error))]
    ApiError { message: String },

    #[error("Unexpected response from Prime Infrastructure: {message}")]
    #[diagnostic(code(picfg::unexpected_response))]
    UnexpectedResponse { message: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(picfg::timeout),
        help("Increase timeout with --timeout or check server responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Validation / input ───────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(picfg::validation))]
    Validation { field: String, reason: String },

    #[error("No {field} given")]
    #[diagnostic(
        code(picfg::missing_value),
        help("Pass {flag}, set it in a profile, or run interactively.")
    )]
    MissingValue { field: String, flag: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(code(picfg::profile_not_found), help("Available profiles: {available}"))]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(picfg::config))]
    Config(Box<figment::Error>),

    // ── IO ───────────────────────────────────────────────────────────
    #[error("Could not write {path}")]
    #[diagnostic(code(picfg::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ExtractionFailed { source, .. } => source.exit_code(),
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::MissingValue { .. } | Self::ProfileNotFound { .. } => {
                exit_code::USAGE
            }
            Self::Io { .. } => exit_code::IO,
            Self::ApiError { .. } | Self::UnexpectedResponse { .. } | Self::Config(_) => {
                exit_code::GENERAL
            }
        }
    }

    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Wrap a failure of the extraction run itself.
    pub fn extraction_failed(self, log_file: &std::path::Path) -> Self {
        Self::ExtractionFailed {
            log_file: log_file.display().to_string(),
            source: Box::new(self),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api(api) => api.into(),

            err @ CoreError::MissingField { .. } => CliError::UnexpectedResponse {
                message: err.to_string(),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "configuration".into(),
                reason: message,
            },
        }
    }
}

impl From<picfg_api::Error> for CliError {
    fn from(err: picfg_api::Error) -> Self {
        use picfg_api::Error as Api;

        match err {
            Api::Transport(source) => CliError::ConnectionFailed {
                url: source
                    .url()
                    .map_or_else(|| "(unknown)".into(), ToString::to_string),
                source: Box::new(source),
            },

            Api::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            Api::InvalidUrl(e) => CliError::Validation {
                field: "url".into(),
                reason: e.to_string(),
            },

            Api::Tls(message) => CliError::TlsError { message },

            Api::Authentication { message } => CliError::AuthFailed { message },

            Api::Authorization { message } => CliError::PermissionDenied { message },

            Api::NotFound { url } => CliError::NotFound { url },

            err @ Api::Deserialization { .. } => CliError::UnexpectedResponse {
                message: err.to_string(),
            },

            other => CliError::ApiError {
                message: other.to_string(),
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name, available } => CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            },
            ConfigError::Figment(err) => CliError::Config(err),
        }
    }
}
