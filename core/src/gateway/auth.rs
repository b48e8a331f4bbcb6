//! Authentication gateway: register, login, logout.

use crate::client::ApiClient;
use crate::error::{ApiError, Result};
use crate::gateway::parse_json;
use crate::http::{HttpMethod, HttpRequest, RequestBody};
use crate::types::{AuthResponse, LoginRequest, RegisterRequest, Role, Session, User};

/// Operations on `/auth/*`. Neither request carries a bearer header; a
/// successful response is what creates the session.
#[derive(Debug, Clone, Copy)]
pub struct AuthGateway<'a> {
    pub(crate) client: &'a ApiClient,
}

impl AuthGateway<'_> {
    pub fn build_register(&self, input: &RegisterRequest) -> Result<HttpRequest> {
        self.build_auth_post("/auth/register", input)
    }

    pub fn build_login(&self, input: &LoginRequest) -> Result<HttpRequest> {
        self.build_auth_post("/auth/login", input)
    }

    fn build_auth_post<T: serde::Serialize>(&self, path: &str, input: &T) -> Result<HttpRequest> {
        let body =
            serde_json::to_string(input).map_err(|err| ApiError::Serialization(err.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.client.config.endpoint(path),
            headers: Vec::new(),
            body: Some(RequestBody::Json(body)),
        })
    }

    /// Parse a register/login response into the raw auth payload.
    pub fn parse_auth(response: crate::http::HttpResponse) -> Result<AuthResponse> {
        parse_json(response)
    }

    /// Create an account. The issued session is persisted before returning.
    pub async fn register(&self, input: &RegisterRequest) -> Result<Session> {
        let request = self.build_register(input)?;
        let response = self.client.executor.execute(request).await?;
        let auth = Self::parse_auth(response)?;
        Ok(self.commit(auth))
    }

    /// Authenticate. The issued session is persisted before returning;
    /// callers that need a role check should use `login_as` instead.
    pub async fn login(&self, input: &LoginRequest) -> Result<Session> {
        let request = self.build_login(input)?;
        let response = self.client.executor.execute(request).await?;
        let auth = Self::parse_auth(response)?;
        Ok(self.commit(auth))
    }

    /// Authenticate and require the account to have `expected` role. On a
    /// mismatch nothing is persisted — the issued token is discarded rather
    /// than left as an unused credential in storage.
    pub async fn login_as(&self, input: &LoginRequest, expected: Role) -> Result<Session> {
        let request = self.build_login(input)?;
        let response = self.client.executor.execute(request).await?;
        let auth = Self::parse_auth(response)?;
        if auth.user.role != expected {
            return Err(ApiError::RoleMismatch {
                expected,
                actual: auth.user.role,
            });
        }
        Ok(self.commit(auth))
    }

    fn commit(&self, auth: AuthResponse) -> Session {
        let session = Session {
            token: auth.access_token,
            user: auth.user,
        };
        self.client.session.save(&session);
        session
    }

    /// Local only: drop token and user from storage. No backend call.
    pub fn logout(&self) {
        self.client.session.clear();
    }

    /// The persisted user profile, if a session exists.
    pub fn current_user(&self) -> Option<User> {
        self.client.session.current()
    }
}
