// ── Runtime extraction configuration ──
//
// Describes *where* to extract from and *how hard* to push the server.
// Carries credentials but never touches disk; the CLI builds one and
// hands it to `Extractor::connect`.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use picfg_api::transport::{DEFAULT_REQUEST_DELAY, DEFAULT_TIMEOUT};
use picfg_api::{TlsMode, TransportConfig};

/// Records requested per listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification. Default: Prime ships self-signed certificates.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for one extraction run against a single Prime server.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Prime server URL (e.g., `https://prime.example.com`).
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Pause after every request.
    pub request_delay: Duration,
    /// Records requested per listing page.
    pub page_size: u32,
}

impl ExtractorConfig {
    pub fn new(url: Url, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            url,
            username: username.into(),
            password,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            request_delay: DEFAULT_REQUEST_DELAY,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Translate into the api crate's transport settings.
    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
            request_delay: self.request_delay,
            warn_insecure: true,
        }
    }
}
