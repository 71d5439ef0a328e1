//! Response classification for the HTTP client.
//!
//! Decides, for a received response, whether the call resolves with a body,
//! resolves by saving a file, or rejects. The rules are applied in order:
//!
//! 1. non-2xx status rejects with a server error
//! 2. a `Blob` request whose content type is in the file family is a download,
//!    unless the content type also declares JSON and the body parses as JSON,
//!    in which case the parsed object is the rejection reason
//! 3. anything else resolves with the body
//!
//! Nothing outside this module inspects content types.

use serde_json::Value;

use super::disposition::filename_from_disposition;
use super::payload::Payload;
use crate::ports::{HttpError, HttpResponse};

/// Content type fragments that mark a response as a file.
const FILE_CONTENT_TYPES: &[&str] = &[
    "multipart/form-data",
    "application/octet-stream",
    "application/pdf",
    "application/zip",
    "application/msword",
    "application/vnd",
];

/// How the caller expects the body to be handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    /// Parse the body as JSON.
    #[default]
    Json,
    /// Keep the raw bytes; file responses are saved instead.
    Blob,
}

/// Outcome of classifying one response.
#[derive(Debug)]
pub enum Classification {
    /// Resolve the call with this payload.
    Resolved(Payload),
    /// Save `bytes` as `filename`, then resolve with a download receipt.
    Download { filename: String, bytes: Vec<u8> },
    /// Reject the call.
    Rejected(HttpError),
}

/// Classifies a response according to the ordered rules above.
pub fn classify(response: HttpResponse, response_type: ResponseType) -> Classification {
    if !response.status.is_success() {
        let body = serde_json::from_slice::<Value>(&response.body).ok();
        return Classification::Rejected(HttpError::server(response.status.as_u16(), body));
    }

    let content_type = response.content_type().to_ascii_lowercase();

    if response_type == ResponseType::Blob && is_file_content_type(&content_type) {
        if declares_json(&content_type) {
            if let Ok(body) = serde_json::from_slice::<Value>(&response.body) {
                return Classification::Rejected(HttpError::structured(body));
            }
        }

        let filename = filename_from_disposition(response.content_disposition());
        return Classification::Download {
            filename,
            bytes: response.body,
        };
    }

    match response_type {
        ResponseType::Blob => Classification::Resolved(Payload::Bytes(response.body)),
        ResponseType::Json => parse_body(response.body, declares_json(&content_type)),
    }
}

/// Returns true if the (lowercased) content type belongs to the file family.
pub fn is_file_content_type(content_type: &str) -> bool {
    FILE_CONTENT_TYPES
        .iter()
        .any(|family| content_type.contains(family))
}

fn declares_json(content_type: &str) -> bool {
    content_type.contains("application/json")
}

fn parse_body(body: Vec<u8>, json_declared: bool) -> Classification {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Classification::Resolved(Payload::Json(Value::Null));
    }

    match serde_json::from_slice::<Value>(&body) {
        Ok(value) => Classification::Resolved(Payload::Json(value)),
        Err(e) if json_declared => {
            Classification::Rejected(HttpError::parse(format!("invalid JSON body: {}", e)))
        }
        Err(_) => {
            Classification::Resolved(Payload::Text(String::from_utf8_lossy(&body).into_owned()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
    use http::StatusCode;
    use serde_json::json;

    fn ok(content_type: &str, body: &[u8]) -> HttpResponse {
        HttpResponse::new(StatusCode::OK, body.to_vec()).with_header(CONTENT_TYPE, content_type)
    }

    mod failures {
        use super::*;

        #[test]
        fn non_success_status_rejects_with_body_message() {
            let response = HttpResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                br#"{"message":"server error"}"#.to_vec(),
            );
            match classify(response, ResponseType::Json) {
                Classification::Rejected(HttpError::Server { status, message, .. }) => {
                    assert_eq!(status, 500);
                    assert_eq!(message, "server error");
                }
                other => panic!("expected server rejection, got {:?}", other),
            }
        }

        #[test]
        fn non_success_without_json_uses_generic_message() {
            let response = HttpResponse::new(StatusCode::BAD_GATEWAY, b"<html>".to_vec());
            match classify(response, ResponseType::Json) {
                Classification::Rejected(err) => {
                    assert_eq!(err.to_string(), "request failed (status 502)")
                }
                other => panic!("expected rejection, got {:?}", other),
            }
        }

        #[test]
        fn non_success_wins_over_file_classification() {
            let response = HttpResponse::new(StatusCode::NOT_FOUND, b"missing".to_vec())
                .with_header(CONTENT_TYPE, "application/pdf");
            assert!(matches!(
                classify(response, ResponseType::Blob),
                Classification::Rejected(HttpError::Server { status: 404, .. })
            ));
        }
    }

    mod files {
        use super::*;

        #[test]
        fn octet_stream_blob_is_download_with_disposition_name() {
            let response = ok("application/octet-stream", b"%PDF-1.7")
                .with_header(CONTENT_DISPOSITION, r#"attachment; filename="report.pdf""#);

            match classify(response, ResponseType::Blob) {
                Classification::Download { filename, bytes } => {
                    assert_eq!(filename, "report.pdf");
                    assert_eq!(bytes, b"%PDF-1.7");
                }
                other => panic!("expected download, got {:?}", other),
            }
        }

        #[test]
        fn office_formats_match_vnd_family() {
            assert!(is_file_content_type(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            ));
            assert!(is_file_content_type("application/msword"));
            assert!(is_file_content_type("multipart/form-data; boundary=x"));
            assert!(!is_file_content_type("application/json"));
            assert!(!is_file_content_type("text/plain"));
        }

        #[test]
        fn content_type_match_is_case_insensitive() {
            let response = ok("Application/PDF", b"bytes");
            assert!(matches!(
                classify(response, ResponseType::Blob),
                Classification::Download { .. }
            ));
        }

        #[test]
        fn file_content_type_without_blob_request_resolves_body() {
            let response = ok("application/octet-stream", br#"{"a":1}"#);
            match classify(response, ResponseType::Json) {
                Classification::Resolved(Payload::Json(value)) => assert_eq!(value, json!({"a": 1})),
                other => panic!("expected json body, got {:?}", other),
            }
        }

        #[test]
        fn json_in_disguise_rejects_with_parsed_object() {
            let response = ok(
                "application/octet-stream, application/json",
                br#"{"message":"bad request"}"#,
            );
            match classify(response, ResponseType::Blob) {
                Classification::Rejected(HttpError::Structured { body }) => {
                    assert_eq!(body, json!({"message": "bad request"}))
                }
                other => panic!("expected structured rejection, got {:?}", other),
            }
        }

        #[test]
        fn json_declared_but_unparseable_falls_through_to_download() {
            let response = ok("application/zip; application/json", b"PK\x03\x04");
            match classify(response, ResponseType::Blob) {
                Classification::Download { filename, .. } => assert_eq!(filename, "download"),
                other => panic!("expected download, got {:?}", other),
            }
        }
    }

    mod bodies {
        use super::*;

        #[test]
        fn json_body_resolves_parsed() {
            match classify(ok("application/json", br#"{"hello":"world"}"#), ResponseType::Json) {
                Classification::Resolved(Payload::Json(value)) => {
                    assert_eq!(value, json!({"hello": "world"}))
                }
                other => panic!("expected json, got {:?}", other),
            }
        }

        #[test]
        fn empty_body_resolves_null() {
            assert!(matches!(
                classify(ok("application/json", b""), ResponseType::Json),
                Classification::Resolved(Payload::Json(Value::Null))
            ));
        }

        #[test]
        fn malformed_declared_json_is_parse_error() {
            assert!(matches!(
                classify(ok("application/json; charset=utf-8", b"{oops"), ResponseType::Json),
                Classification::Rejected(HttpError::Parse(_))
            ));
        }

        #[test]
        fn undeclared_text_resolves_as_text() {
            match classify(ok("text/plain", b"pong"), ResponseType::Json) {
                Classification::Resolved(Payload::Text(text)) => assert_eq!(text, "pong"),
                other => panic!("expected text, got {:?}", other),
            }
        }

        #[test]
        fn blob_request_for_non_file_keeps_bytes() {
            match classify(ok("image/png", &[0x89, 0x50]), ResponseType::Blob) {
                Classification::Resolved(Payload::Bytes(bytes)) => assert_eq!(bytes, vec![0x89, 0x50]),
                other => panic!("expected bytes, got {:?}", other),
            }
        }
    }
}
