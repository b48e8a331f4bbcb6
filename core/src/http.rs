//! HTTP request/response types shared by gateways and the executor.
//!
//! # Design
//! Requests and responses are described as plain data. Gateways build
//! `HttpRequest` values and parse `HttpResponse` values without touching the
//! network; the async `Executor` performs the actual round-trip. This keeps
//! every request shape and every response parser testable without a server.
//!
//! All fields use owned types (`String`, `Vec`) so built requests can be
//! freely moved into the executor or inspected by tests.

use std::fmt;

/// HTTP method for a request. The LUMINA contract only uses reads and posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// One value of a multipart form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File {
        filename: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

/// A named multipart form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub value: FormValue,
}

/// Body of an outbound request.
///
/// JSON bodies carry a `content-type: application/json` header when executed.
/// Multipart bodies never set a content-type here — the transport populates
/// the boundary when it encodes the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Json(String),
    Form(Vec<FormPart>),
}

/// An HTTP request described as plain data.
///
/// Built by gateway `build_*` methods. The `url` is absolute — the base URL
/// from `ApiConfig` is already baked in.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

/// An HTTP response described as plain data, passed to gateway `parse_*`
/// methods for status interpretation and deserialization.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}
