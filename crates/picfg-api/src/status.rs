// HTTP status classification
//
// Prime signals every failure through the status code. The mapping is
// fixed and total; nothing here retries.

use crate::error::Error;
use crate::models::ErrorEnvelope;

/// Map a response status to `Ok(())` (200 only) or the matching error.
///
/// `url` is echoed back in `NotFound`; `body` is only read for 400, whose
/// message lives in the JSON `errorDocument` envelope.
pub fn classify_status(status: u16, url: &str, body: &str) -> Result<(), Error> {
    match status {
        200 => Ok(()),
        302 => Err(Error::Authentication {
            message: "incorrect credentials provided".into(),
        }),
        400 => Err(Error::InvalidRequest {
            message: error_document_message(body),
        }),
        401 => Err(Error::Authentication {
            message: "unauthorized access".into(),
        }),
        403 => Err(Error::Authorization {
            message: "forbidden access to the REST API".into(),
        }),
        404 => Err(Error::NotFound { url: url.to_owned() }),
        406 => Err(Error::Protocol {
            status,
            message: "the Accept header does not match a supported type".into(),
        }),
        415 => Err(Error::Protocol {
            status,
            message: "the Content-Type header does not match a supported type".into(),
        }),
        500 => Err(Error::Server {
            status,
            message: "an error has occurred during the API invocation".into(),
        }),
        502 => Err(Error::Server {
            status,
            message: "the server is down or being upgraded".into(),
        }),
        503 => Err(Error::Server {
            status,
            message: "the server is overloaded with requests (rate limited), try again later"
                .into(),
        }),
        _ => Err(Error::UnknownResponse { status }),
    }
}

fn error_document_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body).map_or_else(
        |_| body.trim().to_owned(),
        |envelope| envelope.error_document.message,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const URL: &str = "https://prime/webacs/api/v1/data/Nope.xml";

    #[test]
    fn only_200_is_success() {
        assert!(classify_status(200, URL, "").is_ok());
        for status in [201, 204, 301, 302, 304] {
            assert!(classify_status(status, URL, "").is_err(), "{status} accepted");
        }
    }

    #[test]
    fn documented_codes_map_to_their_kind() {
        let kind = |status| match classify_status(status, URL, "") {
            Err(Error::Authentication { .. }) => "authentication",
            Err(Error::Authorization { .. }) => "authorization",
            Err(Error::InvalidRequest { .. }) => "invalid_request",
            Err(Error::NotFound { .. }) => "not_found",
            Err(Error::Protocol { .. }) => "protocol",
            Err(Error::Server { .. }) => "server",
            Err(Error::UnknownResponse { .. }) => "unknown",
            other => panic!("unexpected outcome for {status}: {other:?}"),
        };

        assert_eq!(kind(302), "authentication");
        assert_eq!(kind(400), "invalid_request");
        assert_eq!(kind(401), "authentication");
        assert_eq!(kind(403), "authorization");
        assert_eq!(kind(404), "not_found");
        assert_eq!(kind(406), "protocol");
        assert_eq!(kind(415), "protocol");
        assert_eq!(kind(500), "server");
        assert_eq!(kind(502), "server");
        assert_eq!(kind(503), "server");
        assert_eq!(kind(418), "unknown");
        assert_eq!(kind(429), "unknown");
    }

    #[test]
    fn bad_request_carries_error_document_message() {
        let body = r#"{"errorDocument":{"httpResponseCode":400,"message":"Invalid firstResult"}}"#;
        match classify_status(400, URL, body) {
            Err(Error::InvalidRequest { message }) => assert_eq!(message, "Invalid firstResult"),
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }

    #[test]
    fn bad_request_without_envelope_keeps_raw_body() {
        match classify_status(400, URL, "  plain failure \n") {
            Err(Error::InvalidRequest { message }) => assert_eq!(message, "plain failure"),
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }

    #[test]
    fn not_found_includes_url() {
        match classify_status(404, URL, "") {
            Err(Error::NotFound { url }) => assert_eq!(url, URL),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn unknown_keeps_numeric_code() {
        match classify_status(418, URL, "") {
            Err(Error::UnknownResponse { status }) => assert_eq!(status, 418),
            other => panic!("expected UnknownResponse, got {other:?}"),
        }
        assert_eq!(classify_status(599, URL, "").unwrap_err().status(), Some(599));
    }

    #[test]
    fn rate_limit_is_a_server_error_with_503() {
        let err = classify_status(503, URL, "").unwrap_err();
        assert!(matches!(err, Error::Server { status: 503, .. }));
        assert_eq!(err.status(), Some(503));
    }
}
