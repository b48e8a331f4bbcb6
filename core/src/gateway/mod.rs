//! Domain gateways: typed operations mapping one backend resource each.
//!
//! Every operation follows the same split: a `build_*` method producing an
//! `HttpRequest` (no I/O), a `parse_*` method consuming an `HttpResponse`,
//! and an async method composing build → execute → parse through the
//! client's executor. Tests exercise build/parse directly; integration tests
//! drive the async methods against the mock server.

mod auth;
mod student;
mod teacher;

pub use auth::AuthGateway;
pub use student::StudentGateway;
pub use teacher::TeacherGateway;

use serde::de::DeserializeOwned;

use crate::error::{self, ApiError, Result};
use crate::http::HttpResponse;

/// Shared success-path parsing: any 2xx body deserializes into `T`; anything
/// else becomes the uniform status error with an extracted message.
pub(crate) fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T> {
    if !(200..300).contains(&response.status) {
        return Err(error::status_error(response.status, &response.body));
    }
    serde_json::from_str(&response.body).map_err(|err| ApiError::Deserialization(err.to_string()))
}
