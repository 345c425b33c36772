// Prime API request/response types
//
// Decoded response bodies and the JSON error envelope Prime returns
// alongside HTTP 400.

use bytes::Bytes;
use serde::Deserialize;

use crate::xml::Element;

/// How the body of a response should be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Json,
    Xml,
    /// Body is returned untouched.
    Raw,
}

/// A decoded response body.
#[derive(Debug, Clone)]
pub enum ApiResponse {
    Json(serde_json::Value),
    Xml(Element),
    Raw(Bytes),
}

impl ApiResponse {
    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_xml(self) -> Option<Element> {
        match self {
            Self::Xml(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_raw(self) -> Option<Bytes> {
        match self {
            Self::Raw(b) => Some(b),
            _ => None,
        }
    }
}

/// Error envelope returned with HTTP 400:
/// ```json
/// { "errorDocument": { "httpResponseCode": 400, "message": "..." } }
/// ```
/// Only `message` is read.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub error_document: ErrorDocument,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDocument {
    pub message: String,
}
