// Prime API HTTP client
//
// Wraps `reqwest::Client` with the `/webacs/api/v1/` URL prefix, Basic auth,
// status classification, body decoding, and the fixed post-request pause.
// One call is one fresh GET; nothing is cached or retried.

use std::time::Duration;

use bytes::Bytes;
use secrecy::ExposeSecret;
use tracing::{debug, trace};
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::models::{ApiResponse, ResponseFormat};
use crate::status::classify_status;
use crate::transport::TransportConfig;
use crate::xml::Element;

/// Path prefix of every Prime REST resource.
pub const API_PREFIX: &str = "/webacs/api/v1/";

/// HTTP client for the Prime Infrastructure REST API.
///
/// Immutable after construction: base URL, credentials, timeout and
/// request delay are fixed for the lifetime of the client.
#[derive(Debug)]
pub struct PrimeClient {
    http: reqwest::Client,
    api_url: Url,
    credentials: Credentials,
    timeout: Duration,
    request_delay: Duration,
}

impl PrimeClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `server_url` is the Prime root (e.g. `https://prime.example.com`);
    /// any path it carries is replaced by [`API_PREFIX`].
    pub fn new(
        server_url: &Url,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, server_url, credentials, transport)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Timeout and delay are still taken from `transport`; the timeout is
    /// only used to report `Error::Timeout`, the client's own setting wins.
    pub fn with_client(
        http: reqwest::Client,
        server_url: &Url,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let api_url = server_url.join(API_PREFIX)?;
        debug!(%api_url, username = %credentials.username, "prime client created");
        Ok(Self {
            http,
            api_url,
            credentials,
            timeout: transport.timeout,
            request_delay: transport.request_delay,
        })
    }

    /// The absolute API base, always ending in `/webacs/api/v1/`.
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Build the absolute URL for a resource path such as
    /// `data/ConfigVersions.xml?.maxResults=100&.firstResult=0`.
    pub fn resource_url(&self, resource: &str) -> Result<Url, Error> {
        let full = format!("{}{}", self.api_url, resource.trim_start_matches('/'));
        Ok(Url::parse(&full)?)
    }

    // ── Request execution ────────────────────────────────────────────

    /// Send one authenticated GET and decode the body as `format`.
    ///
    /// The request delay is applied once a response has arrived, before
    /// classification errors are returned.
    pub async fn execute(&self, resource: &str, format: ResponseFormat) -> Result<ApiResponse, Error> {
        let url = self.resource_url(resource)?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url.clone())
            .basic_auth(
                &self.credentials.username,
                Some(self.credentials.password.expose_secret()),
            )
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(|e| self.transport_error(e));

        self.throttle().await;

        let body = body?;
        trace!(status, bytes = body.len(), "response received");
        classify_status(status, url.as_str(), &String::from_utf8_lossy(&body))?;
        decode(body, format)
    }

    /// `execute` with [`ResponseFormat::Json`].
    pub async fn get_json(&self, resource: &str) -> Result<serde_json::Value, Error> {
        self.execute(resource, ResponseFormat::Json)
            .await?
            .into_json()
            .ok_or_else(|| unexpected_variant(ResponseFormat::Json))
    }

    /// `execute` with [`ResponseFormat::Xml`], returning the root element.
    pub async fn get_xml(&self, resource: &str) -> Result<Element, Error> {
        self.execute(resource, ResponseFormat::Xml)
            .await?
            .into_xml()
            .ok_or_else(|| unexpected_variant(ResponseFormat::Xml))
    }

    /// `execute` with [`ResponseFormat::Raw`].
    pub async fn get_raw(&self, resource: &str) -> Result<Bytes, Error> {
        self.execute(resource, ResponseFormat::Raw)
            .await?
            .into_raw()
            .ok_or_else(|| unexpected_variant(ResponseFormat::Raw))
    }

    async fn throttle(&self) {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }
}

fn decode(body: Bytes, format: ResponseFormat) -> Result<ApiResponse, Error> {
    match format {
        ResponseFormat::Json => serde_json::from_slice(&body)
            .map(ApiResponse::Json)
            .map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: String::from_utf8_lossy(&body).into_owned(),
            }),
        ResponseFormat::Xml => {
            let text = std::str::from_utf8(&body).map_err(|e| Error::Deserialization {
                message: format!("XML body is not UTF-8: {e}"),
                body: String::from_utf8_lossy(&body).into_owned(),
            })?;
            Element::parse(text).map(ApiResponse::Xml)
        }
        ResponseFormat::Raw => Ok(ApiResponse::Raw(body)),
    }
}

fn unexpected_variant(requested: ResponseFormat) -> Error {
    Error::Deserialization {
        message: format!("decoder did not return a {requested:?} body"),
        body: String::new(),
    }
}
