//! API client core for the LUMINA academic platform.
//!
//! # Overview
//! Four layers, leaf to root:
//! - endpoint resolution (`config`): one absolute base URL ending in `/api`,
//!   resolved from override → stored value → environment → preview-domain
//!   inference → localhost fallback;
//! - session persistence (`session` over `storage`): bearer token and user
//!   profile written and cleared together in durable key-value storage;
//! - request execution (`http` + `executor`): gateways build plain-data
//!   requests and parse plain-data responses, the async executor performs
//!   the round-trip and folds every failure into one `ApiError`;
//! - domain gateways (`gateway`): typed auth/student/teacher operations,
//!   each unwrapping the backend's `{success, <key>: [...]}` envelope.
//!
//! Everything is dependency-injected through `ApiClient`; there is no
//! process-wide state, and concurrent gateway calls are independent.

pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod gateway;
pub mod http;
pub mod session;
pub mod storage;
pub mod types;

pub use client::ApiClient;
pub use config::{resolve_base_url, ApiConfig, EndpointSources};
pub use error::{ApiError, Result};
pub use executor::Executor;
pub use gateway::{AuthGateway, StudentGateway, TeacherGateway};
pub use http::{FormPart, FormValue, HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use session::SessionStore;
pub use storage::{FileStore, MemoryStore, Storage};
pub use types::{
    Ack, AuthResponse, Class, GradeSubmission, Health, LoginRequest, Material, MaterialUpload,
    Message, MessageSubmission, RegisterRequest, Role, Session, StudentRecord, Subject, User,
};
