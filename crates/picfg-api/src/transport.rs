// Shared transport configuration for building reqwest::Client instances.
//
// Holds TLS, timeout, and throttling settings for the Prime client. Every
// request goes out with `Cache-Control: no-cache` and `Connection: close`,
// and idle connections are never kept around.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{CACHE_CONTROL, CONNECTION, HeaderMap, HeaderValue};
use tracing::warn;

/// Fixed per-request timeout of the Prime API.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause after every API call.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(100);

/// TLS verification mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (Prime appliances ship self-signed certs).
    #[default]
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    /// Sleep applied after each response, whatever its status.
    pub request_delay: Duration,
    /// Log a warning when a client is built with certificate checks off.
    ///
    /// Scoped to the client being built; other clients are unaffected.
    pub warn_insecure: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::DangerAcceptInvalid,
            timeout: DEFAULT_TIMEOUT,
            request_delay: DEFAULT_REQUEST_DELAY,
            warn_insecure: false,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(CONNECTION, HeaderValue::from_static("close"));

        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("picfg/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::none())
            .pool_max_idle_per_host(0);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path).map_err(|e| {
                    crate::error::Error::Tls(format!("failed to read CA cert: {e}"))
                })?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| crate::error::Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                if self.warn_insecure {
                    warn!("TLS certificate verification is disabled for this client");
                }
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| crate::error::Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    /// Override the post-request delay (tests use `Duration::ZERO`).
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }
}
