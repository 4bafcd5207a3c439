//! HTTP Transport
//!
//! A request is described as plain data (`ApiRequest`) and handed to a
//! `Transport` together with the caller identity. The transport attaches the
//! caller's attribution header and returns the raw status and body; it never
//! interprets them.

mod http;
pub mod mock;


pub use http::HttpTransport;
pub use mock::{MockTransport, RecordedRequest};

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use vaakku_core::CallerIdentity;

/// Header carrying the anonymous caller identifier
pub const ANONYMOUS_ID_HEADER: &str = "X-Anonymous-Id";

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PATCH
    Patch,
}

impl Method {
    /// Upper-case method name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
        }
    }
}

/// One file in a multipart upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name
    pub field: String,
    /// File name reported to the server
    pub file_name: String,
    /// MIME type
    pub mime: String,
    /// File content
    pub bytes: Vec<u8>,
}

/// Multipart form body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    /// File parts, sent first
    pub files: Vec<FilePart>,
    /// Text fields
    pub fields: Vec<(String, String)>,
}

impl MultipartForm {
    /// Empty form
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file part
    #[must_use]
    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }

    /// Add a text field
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Value of a text field
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Request body
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body
    Empty,
    /// JSON document
    Json(serde_json::Value),
    /// Multipart form
    Multipart(MultipartForm),
}

/// Transport-independent description of an API call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path below the API base URL, starting with `/`
    pub path: String,
    /// Query parameters
    pub query: Vec<(String, String)>,
    /// Body
    pub body: RequestBody,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body,
        }
    }

    /// GET without body
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path, RequestBody::Empty)
    }

    /// POST with a JSON body
    pub fn post_json<T: Serialize>(path: impl Into<String>, body: &T) -> Result<Self> {
        Ok(Self::new(Method::Post, path, RequestBody::Json(to_json(body)?)))
    }

    /// PATCH with a JSON body
    pub fn patch_json<T: Serialize>(path: impl Into<String>, body: &T) -> Result<Self> {
        Ok(Self::new(Method::Patch, path, RequestBody::Json(to_json(body)?)))
    }

    /// POST with a multipart body
    #[must_use]
    pub fn post_multipart(path: impl Into<String>, form: MultipartForm) -> Self {
        Self::new(Method::Post, path, RequestBody::Multipart(form))
    }

    /// Add a query parameter
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// JSON body, if any
    #[must_use]
    pub fn json_body(&self) -> Option<&serde_json::Value> {
        match &self.body {
            RequestBody::Json(v) => Some(v),
            _ => None,
        }
    }
}

fn to_json<T: Serialize>(body: &T) -> Result<serde_json::Value> {
    serde_json::to_value(body).map_err(|e| Error::InvalidInput(e.to_string()))
}

/// Status and body of an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl RawResponse {
    /// Response with a JSON body
    #[must_use]
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

/// Sends API requests with caller attribution
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` on behalf of `caller`
    ///
    /// Authenticated callers are sent as `Authorization: Bearer <token>`,
    /// anonymous callers as `X-Anonymous-Id: <id>`. Only connection-level
    /// failures are errors; any HTTP status is returned as a response.
    async fn send(&self, request: &ApiRequest, caller: &CallerIdentity) -> Result<RawResponse>;
}
