//! Map an `HttpResponse` to a decoded value or an `ApiError`.
//!
//! # Design
//! Classification is a pure function of the response. The status decides the
//! branch in a fixed order, and the body is only handed to the codec when the
//! status is in `200..400`. Every other branch returns the response as error
//! context without touching the codec. Any `u16` is a status here; a reply
//! with no parseable status never reaches this module (the transport reports
//! it as `TransportError::Malformed`).

use serde::de::DeserializeOwned;

use crate::codec::BodyCodec;
use crate::error::ApiError;
use crate::http::HttpResponse;

/// The branch a status code falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// `200..400`: the body is decoded.
    Success,
    /// `400..500`.
    Client,
    /// `500` and above.
    Server,
    /// Anything below 200.
    Unknown,
}

impl StatusClass {
    pub fn of(status: u16) -> Self {
        match status {
            200..=399 => StatusClass::Success,
            400..=499 => StatusClass::Client,
            500..=u16::MAX => StatusClass::Server,
            _ => StatusClass::Unknown,
        }
    }
}

/// Classify `response` and, for success statuses, decode its body as `T`.
pub fn classify_response<T, C>(codec: &C, response: HttpResponse) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    C: BodyCodec,
{
    let class = StatusClass::of(response.status);
    tracing::debug!(status = response.status, ?class, "classified response");
    match class {
        StatusClass::Client => Err(ApiError::ClientError(response)),
        StatusClass::Server => Err(ApiError::ServerError(response)),
        StatusClass::Unknown => Err(ApiError::UnknownRequestError(response)),
        StatusClass::Success => match codec.decode(&response.body) {
            Some(value) => Ok(value),
            None => Err(ApiError::NonDecodable(response)),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::codec::JsonCodec;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Item {
        id: u32,
        name: String,
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn status_boundaries() {
        for status in [200, 201, 204, 301, 399] {
            assert_eq!(StatusClass::of(status), StatusClass::Success, "{status}");
        }
        for status in [400, 404, 499] {
            assert_eq!(StatusClass::of(status), StatusClass::Client, "{status}");
        }
        for status in [500, 503, 599, 999, 1000, u16::MAX] {
            assert_eq!(StatusClass::of(status), StatusClass::Server, "{status}");
        }
        for status in [0, 50, 99, 100, 101, 199] {
            assert_eq!(StatusClass::of(status), StatusClass::Unknown, "{status}");
        }
    }

    #[test]
    fn success_decodes_body() {
        let item: Item = classify_response(&JsonCodec, response(200, r#"{"id":1,"name":"a"}"#)).unwrap();
        assert_eq!(
            item,
            Item {
                id: 1,
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn redirect_status_still_decodes() {
        let item: Item = classify_response(&JsonCodec, response(304, r#"{"id":2,"name":"b"}"#)).unwrap();
        assert_eq!(item.id, 2);
    }

    #[test]
    fn success_with_bad_body_is_non_decodable() {
        let err = classify_response::<Item, _>(&JsonCodec, response(200, "not json")).unwrap_err();
        match err {
            ApiError::NonDecodable(r) => assert_eq!(r.body, b"not json"),
            other => panic!("expected NonDecodable, got {other:?}"),
        }
    }

    #[test]
    fn client_error_carries_body() {
        let err = classify_response::<Item, _>(&JsonCodec, response(404, r#"{"error":"not found"}"#))
            .unwrap_err();
        match err {
            ApiError::ClientError(r) => {
                assert_eq!(r.status, 404);
                assert_eq!(r.body_text(), r#"{"error":"not found"}"#);
            }
            other => panic!("expected ClientError, got {other:?}"),
        }
    }

    #[test]
    fn server_error_ignores_decodable_body() {
        let err = classify_response::<Item, _>(&JsonCodec, response(500, r#"{"id":1,"name":"a"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::ServerError(_)));
    }

    #[test]
    fn informational_status_is_unknown_request_error() {
        let err = classify_response::<Item, _>(&JsonCodec, response(100, "")).unwrap_err();
        assert!(matches!(err, ApiError::UnknownRequestError(_)));
    }

    #[test]
    fn unusual_statuses_follow_the_ranges() {
        let err = classify_response::<Item, _>(&JsonCodec, response(50, "garbage")).unwrap_err();
        assert!(matches!(err, ApiError::UnknownRequestError(_)));

        let err = classify_response::<Item, _>(&JsonCodec, response(1000, "")).unwrap_err();
        assert!(matches!(err, ApiError::ServerError(_)));
    }

    #[test]
    fn empty_success_body_is_non_decodable() {
        let err = classify_response::<Option<Item>, _>(&JsonCodec, response(200, "")).unwrap_err();
        assert!(matches!(err, ApiError::NonDecodable(_)));
    }
}
