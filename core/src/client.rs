//! The API client: resolved config, session store, and executor wired
//! together, with gateway accessors.
//!
//! # Design
//! `ApiClient` owns no domain logic of its own — gateways borrow it for the
//! base URL, credentials, and transport. Everything is constructed
//! explicitly at startup (no globals), so tests can run several clients with
//! different configs and storages in one process.

use std::sync::Arc;

use crate::config::ApiConfig;
use crate::error::Result;
use crate::executor::Executor;
use crate::gateway::{AuthGateway, StudentGateway, TeacherGateway};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::session::SessionStore;
use crate::storage::Storage;
use crate::types::Health;

/// Entry point for all backend operations.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub(crate) config: ApiConfig,
    pub(crate) session: SessionStore,
    pub(crate) executor: Executor,
}

impl ApiClient {
    /// Wire a client from a resolved config and a storage backend. The same
    /// storage should be the one `ApiConfig::resolve` consulted, so a
    /// persisted override and the session live side by side.
    pub fn new(config: ApiConfig, storage: Arc<dyn Storage>) -> Self {
        let executor = Executor::new(&config);
        Self {
            config,
            session: SessionStore::new(storage),
            executor,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn auth(&self) -> AuthGateway<'_> {
        AuthGateway { client: self }
    }

    pub fn student(&self) -> StudentGateway<'_> {
        StudentGateway { client: self }
    }

    pub fn teacher(&self) -> TeacherGateway<'_> {
        TeacherGateway { client: self }
    }

    /// The health probe lives at the host root, outside the `/api` prefix.
    pub fn build_health(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/health", self.config.host_root()),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_health(response: HttpResponse) -> Result<Health> {
        crate::gateway::parse_json(response)
    }

    /// Startup connectivity check. A failure here is a warning for the
    /// caller to surface, not a hard error — no state depends on it.
    pub async fn check_health(&self) -> Result<Health> {
        let response = self.executor.execute(self.build_health()).await?;
        Self::parse_health(response)
    }
}
