//! Async request executor over reqwest.
//!
//! Runs the `HttpRequest` values built by gateways and hands back plain
//! `HttpResponse` data. Transport-level failures never escape as reqwest
//! errors — they are folded into `ApiError::Connection` carrying the
//! resolved base URL, the only connectivity diagnostic the caller can show.
//! No retries, no explicit timeout (the transport default applies), no
//! caching.

use reqwest::multipart;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::http::{FormPart, FormValue, HttpMethod, HttpRequest, HttpResponse, RequestBody};

/// Executes built requests against the network.
#[derive(Debug, Clone)]
pub struct Executor {
    http: reqwest::Client,
    base_url: String,
}

impl Executor {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url().to_string(),
        }
    }

    /// Perform one round-trip. Non-2xx statuses are returned as data; status
    /// interpretation belongs to the gateway `parse_*` methods.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "dispatching request");

        let mut builder = match request.method {
            HttpMethod::Get => self.http.get(&request.url),
            HttpMethod::Post => self.http.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            Some(RequestBody::Json(json)) => builder
                .header("content-type", "application/json")
                .body(json),
            Some(RequestBody::Form(parts)) => builder.multipart(into_form(parts)?),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|err| self.connection_error(&err))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| self.connection_error(&err))?;

        Ok(HttpResponse { status, body })
    }

    fn connection_error(&self, err: &reqwest::Error) -> ApiError {
        ApiError::Connection {
            base_url: self.base_url.clone(),
            detail: err.to_string(),
        }
    }
}

/// Assemble a reqwest multipart form. The boundary and the overall
/// content-type header are left to reqwest.
fn into_form(parts: Vec<FormPart>) -> Result<multipart::Form> {
    let mut form = multipart::Form::new();
    for part in parts {
        form = match part.value {
            FormValue::Text(text) => form.text(part.name, text),
            FormValue::File {
                filename,
                content_type,
                bytes,
            } => {
                let file = multipart::Part::bytes(bytes)
                    .file_name(filename)
                    .mime_str(&content_type)
                    .map_err(|err| {
                        ApiError::Serialization(format!("invalid content type: {err}"))
                    })?;
                form.part(part.name, file)
            }
        };
    }
    Ok(form)
}
