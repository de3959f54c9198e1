// API module: the JSON shapes spoken by paste.sr.ht and a small blocking
// HTTP client to send them. Kept synchronous; one request per paste.
//
// The HTTP round trip sits behind the `HttpClient` trait so tests can
// answer with canned responses instead of touching the network.

use crate::error::{PasteError, Result};
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where pastes are created unless overridden.
pub const DEFAULT_ENDPOINT: &str = "https://paste.sr.ht/api/pastes";

/// Every paste is created with this visibility.
pub const VISIBILITY: &str = "unlisted";

/// One thing to upload: who uploads it, what it is called and its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paste {
    pub token: String,
    pub name: String,
    pub content: Vec<u8>,
}

/// Body of `POST /api/pastes`.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct CreatePaste {
    pub visibility: String,
    pub files: Vec<PasteFile>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct PasteFile {
    pub filename: String,
    pub contents: String,
}

/// What the service answers with once the paste exists. Other fields the
/// service sends are ignored.
#[derive(Serialize, Deserialize, Debug)]
pub struct CreatedPaste {
    pub files: Vec<CreatedFile>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreatedFile {
    pub filename: Option<String>,
    pub blob_id: String,
}

/// Serialize a paste as the request body. Content that is not UTF-8 is
/// sent with the offending bytes replaced by U+FFFD.
pub fn encode_payload(paste: &Paste) -> Result<Vec<u8>> {
    let body = CreatePaste {
        visibility: VISIBILITY.to_string(),
        files: vec![PasteFile {
            filename: paste.name.clone(),
            contents: String::from_utf8_lossy(&paste.content).into_owned(),
        }],
    };
    serde_json::to_vec(&body).map_err(PasteError::Encoding)
}

/// Pull the blob id of the first file out of a creation response.
pub fn decode_blob_id(body: &[u8]) -> Result<String> {
    let created: CreatedPaste = serde_json::from_slice(body).map_err(PasteError::Decode)?;
    match created.files.into_iter().next() {
        Some(file) => Ok(file.blob_id),
        None => Err(PasteError::UnknownScheme(
            String::from_utf8_lossy(body).into_owned(),
        )),
    }
}

/// A request as handed to an `HttpClient`. Always a POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Status and fully read body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Minimal request in, response out interface over the network.
pub trait HttpClient {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// POST an encoded paste to `endpoint` and return the body of the
/// `201 Created` response.
pub fn post_paste(
    client: &dyn HttpClient,
    endpoint: &str,
    body: Vec<u8>,
    token: &str,
) -> Result<Vec<u8>> {
    if token.is_empty() {
        return Err(PasteError::MissingToken);
    }
    let request = HttpRequest {
        url: endpoint.to_string(),
        headers: vec![
            ("Authorization".into(), format!("token {}", token)),
            ("Content-Type".into(), "application/json".into()),
            ("Accept".into(), "application/json".into()),
        ],
        body,
    };

    debug!("POST {} ({} bytes)", request.url, request.body.len());
    let response = client.send(&request)?;
    debug!("{} answered {}", request.url, response.status);

    if response.status != 201 {
        return Err(PasteError::ServerRejected {
            status: response.status,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        });
    }
    Ok(response.body)
}

/// `HttpClient` backed by a reqwest blocking client. The client keeps its
/// connection pool, so several pastes in one run share connections.
#[derive(Clone)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Build the client, optionally with a per-request timeout.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| PasteError::Transport(format!("building HTTP client: {}", e)))?;
        Ok(ReqwestClient { client })
    }

    fn header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| PasteError::Transport(format!("invalid header name {:?}: {}", name, e)))?;
            // Header values are never echoed since one of them carries the token.
            let value = HeaderValue::from_str(value)
                .map_err(|_| PasteError::Transport(format!("invalid value for header {}", name)))?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

impl HttpClient for ReqwestClient {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let headers = Self::header_map(&request.headers)?;
        let res = self
            .client
            .post(&request.url)
            .headers(headers)
            .body(request.body.clone())
            .send()
            .map_err(|e| PasteError::Transport(e.to_string()))?;
        let status = res.status().as_u16();
        let body = res
            .bytes()
            .map_err(|e| PasteError::Transport(format!("reading response body: {}", e)))?;
        Ok(HttpResponse { status, body: body.to_vec() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct CannedClient {
        status: u16,
        body: &'static str,
        seen: RefCell<Option<HttpRequest>>,
    }

    impl CannedClient {
        fn new(status: u16, body: &'static str) -> Self {
            CannedClient { status, body, seen: RefCell::new(None) }
        }
    }

    impl HttpClient for CannedClient {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
            *self.seen.borrow_mut() = Some(request.clone());
            Ok(HttpResponse { status: self.status, body: self.body.as_bytes().to_vec() })
        }
    }

    fn paste(name: &str, content: &[u8]) -> Paste {
        Paste { token: "42424242".into(), name: name.into(), content: content.to_vec() }
    }

    #[test]
    fn payload_has_one_unlisted_file() {
        let body = encode_payload(&paste("notes.txt", b"hello\nworld")).unwrap();
        let decoded: CreatePaste = serde_json::from_slice(&body).unwrap();
        assert_eq!(decoded.visibility, "unlisted");
        assert_eq!(
            decoded.files,
            vec![PasteFile { filename: "notes.txt".into(), contents: "hello\nworld".into() }]
        );
    }

    #[test]
    fn payload_matches_wire_shape() {
        let body = encode_payload(&paste("<stdin>", b"hi")).unwrap();
        assert_eq!(
            String::from_utf8(body).unwrap(),
            r#"{"visibility":"unlisted","files":[{"filename":"<stdin>","contents":"hi"}]}"#
        );
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let body = encode_payload(&paste("bin", &[b'a', 0xff, b'b'])).unwrap();
        let decoded: CreatePaste = serde_json::from_slice(&body).unwrap();
        assert_eq!(decoded.files[0].contents, "a\u{fffd}b");
    }

    #[test]
    fn decodes_first_blob_id() {
        let id = decode_blob_id(br#"{"files":[{"filename":"f","blob_id":"abc123"}]}"#).unwrap();
        assert_eq!(id, "abc123");
    }

    #[test]
    fn extra_response_fields_are_ignored() {
        let body = br#"{"created":"2020-01-01T00:00:00Z","visibility":"unlisted","sha":"x",
            "files":[{"filename":null,"blob_id":"b1"},{"filename":"g","blob_id":"b2"}]}"#;
        assert_eq!(decode_blob_id(body).unwrap(), "b1");
    }

    #[test]
    fn empty_files_is_unknown_scheme() {
        let err = decode_blob_id(br#"{"files":[]}"#).unwrap_err();
        match err {
            PasteError::UnknownScheme(body) => assert_eq!(body, r#"{"files":[]}"#),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(decode_blob_id(b"<html>"), Err(PasteError::Decode(_))));
        assert!(matches!(decode_blob_id(br#"{"nope":1}"#), Err(PasteError::Decode(_))));
    }

    #[test]
    fn request_carries_auth_and_json_headers() {
        let client = CannedClient::new(201, r#"{"files":[]}"#);
        post_paste(&client, DEFAULT_ENDPOINT, b"{}".to_vec(), "42424242").unwrap();

        let seen = client.seen.borrow().clone().unwrap();
        assert_eq!(seen.url, "https://paste.sr.ht/api/pastes");
        assert_eq!(seen.body, b"{}");
        assert!(seen.headers.contains(&("Authorization".into(), "token 42424242".into())));
        assert!(seen.headers.contains(&("Content-Type".into(), "application/json".into())));
        assert!(seen.headers.contains(&("Accept".into(), "application/json".into())));
    }

    #[test]
    fn non_created_status_is_rejected_with_body() {
        let client = CannedClient::new(403, "forbidden");
        let err = post_paste(&client, DEFAULT_ENDPOINT, Vec::new(), "t").unwrap_err();
        match &err {
            PasteError::ServerRejected { status, body } => {
                assert_eq!(*status, 403);
                assert_eq!(body, "forbidden");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("forbidden"));
    }

    #[test]
    fn ok_is_not_created() {
        let client = CannedClient::new(200, "{}");
        let err = post_paste(&client, DEFAULT_ENDPOINT, Vec::new(), "t").unwrap_err();
        assert!(matches!(err, PasteError::ServerRejected { status: 200, .. }));
    }

    #[test]
    fn empty_token_sends_nothing() {
        let client = CannedClient::new(201, "{}");
        let err = post_paste(&client, DEFAULT_ENDPOINT, Vec::new(), "").unwrap_err();
        assert!(matches!(err, PasteError::MissingToken));
        assert!(client.seen.borrow().is_none());
    }

    #[test]
    fn newline_in_token_is_not_a_valid_header() {
        let headers = vec![("Authorization".to_string(), "token abc\n".to_string())];
        let err = ReqwestClient::header_map(&headers).unwrap_err();
        assert!(matches!(err, PasteError::Transport(_)));
        assert!(!err.to_string().contains("abc"));
    }
}
