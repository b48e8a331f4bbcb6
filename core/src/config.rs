//! Backend endpoint resolution.
//!
//! # Design
//! `resolve_base_url` is a pure function over an explicit `EndpointSources`
//! record, so every resolution rule is testable without touching storage or
//! the process environment. `ApiConfig::resolve` is the side-effectful
//! entry point: it persists a runtime override, consults durable storage and
//! the environment, and logs the final value once. The resulting `ApiConfig`
//! is an immutable value handed to the executor and gateways at startup —
//! there is no module-level global, and several configs can coexist in one
//! test process.

use tracing::info;

use crate::storage::{Storage, BASE_URL_KEY};

/// Environment variable consulted when no override or stored value exists.
pub const ENV_VAR: &str = "LUMINA_API_URL";

/// Hostname suffixes of hosted code-workspace preview domains. The segment
/// before the suffix ends in `-<forwarded-port>`.
const PREVIEW_SUFFIXES: &[&str] = &[".app.github.dev", ".githubpreview.dev"];

/// Well-known backend port substituted into preview hostnames.
const BACKEND_PORT: &str = "8000";

const LOCAL_FALLBACK: &str = "http://localhost:8000";

/// Inputs to base-URL resolution, in priority order.
#[derive(Debug, Clone, Default)]
pub struct EndpointSources<'a> {
    /// Explicit runtime override (e.g. a `?api=` query value).
    pub override_url: Option<&'a str>,
    /// Value persisted from a previous override.
    pub stored: Option<String>,
    /// Deployment-injected value (`LUMINA_API_URL`).
    pub env: Option<String>,
    /// Hostname the client itself is served from, when known.
    pub hostname: Option<&'a str>,
}

/// Resolve the backend base URL. Always terminates with a value; the
/// result has no trailing slash and exactly one trailing `/api`.
pub fn resolve_base_url(sources: &EndpointSources<'_>) -> String {
    let explicit = [
        sources.override_url.map(str::to_string),
        sources.stored.clone(),
        sources.env.clone(),
    ]
    .into_iter()
    .flatten()
    .find(|url| !url.trim().is_empty());
    if let Some(url) = explicit {
        return normalize(&url);
    }
    if let Some(url) = sources.hostname.and_then(preview_url) {
        return url;
    }
    normalize(LOCAL_FALLBACK)
}

/// Strip trailing slashes and append `/api` unless already present.
fn normalize(raw: &str) -> String {
    let mut base = raw.trim().trim_end_matches('/').to_string();
    if !base.ends_with("/api") {
        base.push_str("/api");
    }
    base
}

/// For a preview hostname like `name-3000.app.github.dev`, rewrite the
/// embedded forwarded port to the backend port and synthesize an HTTPS URL.
fn preview_url(hostname: &str) -> Option<String> {
    for suffix in PREVIEW_SUFFIXES {
        let Some(stem) = hostname.strip_suffix(suffix) else {
            continue;
        };
        let api_host = match stem.rsplit_once('-') {
            Some((prefix, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {
                format!("{prefix}-{BACKEND_PORT}{suffix}")
            }
            // No port segment to rewrite; keep the hostname as-is.
            _ => hostname.to_string(),
        };
        return Some(format!("https://{api_host}/api"));
    }
    None
}

/// The resolved backend location, read-only for the life of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Resolve against durable storage and the process environment. An
    /// override is normalized (trailing slash stripped) and persisted for
    /// future runs before resolution.
    pub fn resolve(storage: &dyn Storage, override_url: Option<&str>) -> Self {
        Self::resolve_with_hostname(storage, override_url, None)
    }

    /// Like `resolve`, with a known serving hostname for preview-domain
    /// inference.
    pub fn resolve_with_hostname(
        storage: &dyn Storage,
        override_url: Option<&str>,
        hostname: Option<&str>,
    ) -> Self {
        if let Some(url) = override_url {
            let clean = url.trim().trim_end_matches('/');
            if !clean.is_empty() {
                storage.set(BASE_URL_KEY, clean);
            }
        }
        let sources = EndpointSources {
            override_url,
            stored: storage.get(BASE_URL_KEY),
            env: std::env::var(ENV_VAR).ok(),
            hostname,
        };
        Self::from_sources(&sources)
    }

    /// Resolve from explicit sources only. No storage or environment reads.
    pub fn from_sources(sources: &EndpointSources<'_>) -> Self {
        let base_url = resolve_base_url(sources);
        info!(%base_url, "resolved API base URL");
        Self { base_url }
    }

    /// Wrap a known base URL, applying the usual normalization.
    pub fn from_base_url(url: &str) -> Self {
        Self {
            base_url: normalize(url),
        }
    }

    /// The absolute base URL, ending in `/api`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The base URL without the `/api` suffix, for endpoints outside the
    /// API prefix such as the health probe.
    pub fn host_root(&self) -> &str {
        self.base_url.strip_suffix("/api").unwrap_or(&self.base_url)
    }

    /// Absolute URL for an API path (`path` starts with `/`).
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    fn sources() -> EndpointSources<'static> {
        EndpointSources::default()
    }

    #[test]
    fn override_is_normalized() {
        let resolved = resolve_base_url(&EndpointSources {
            override_url: Some("https://api.example.com///"),
            ..sources()
        });
        assert_eq!(resolved, "https://api.example.com/api");
    }

    #[test]
    fn existing_api_suffix_is_not_doubled() {
        let resolved = resolve_base_url(&EndpointSources {
            override_url: Some("https://api.example.com/api/"),
            ..sources()
        });
        assert_eq!(resolved, "https://api.example.com/api");
    }

    #[test]
    fn override_wins_over_stored_and_env() {
        let resolved = resolve_base_url(&EndpointSources {
            override_url: Some("https://a.example.com"),
            stored: Some("https://b.example.com".to_string()),
            env: Some("https://c.example.com".to_string()),
            hostname: None,
        });
        assert_eq!(resolved, "https://a.example.com/api");
    }

    #[test]
    fn stored_wins_over_env() {
        let resolved = resolve_base_url(&EndpointSources {
            stored: Some("https://b.example.com".to_string()),
            env: Some("https://c.example.com".to_string()),
            ..sources()
        });
        assert_eq!(resolved, "https://b.example.com/api");
    }

    #[test]
    fn env_is_used_when_nothing_else_is_set() {
        let resolved = resolve_base_url(&EndpointSources {
            env: Some("https://c.example.com".to_string()),
            ..sources()
        });
        assert_eq!(resolved, "https://c.example.com/api");
    }

    #[test]
    fn blank_sources_are_skipped() {
        let resolved = resolve_base_url(&EndpointSources {
            override_url: Some("   "),
            stored: Some(String::new()),
            ..sources()
        });
        assert_eq!(resolved, "http://localhost:8000/api");
    }

    #[test]
    fn blank_override_falls_through_to_stored() {
        let resolved = resolve_base_url(&EndpointSources {
            override_url: Some(""),
            stored: Some("https://b.example.com".to_string()),
            ..sources()
        });
        assert_eq!(resolved, "https://b.example.com/api");
    }

    #[test]
    fn codespaces_hostname_rewrites_port() {
        let resolved = resolve_base_url(&EndpointSources {
            hostname: Some("shiny-robot-5173.app.github.dev"),
            ..sources()
        });
        assert_eq!(resolved, "https://shiny-robot-8000.app.github.dev/api");
    }

    #[test]
    fn githubpreview_hostname_rewrites_port() {
        let resolved = resolve_base_url(&EndpointSources {
            hostname: Some("my-space-3000.githubpreview.dev"),
            ..sources()
        });
        assert_eq!(resolved, "https://my-space-8000.githubpreview.dev/api");
    }

    #[test]
    fn preview_hostname_without_port_is_kept() {
        let resolved = resolve_base_url(&EndpointSources {
            hostname: Some("noport.app.github.dev"),
            ..sources()
        });
        assert_eq!(resolved, "https://noport.app.github.dev/api");
    }

    #[test]
    fn unknown_hostname_falls_back_to_localhost() {
        let resolved = resolve_base_url(&EndpointSources {
            hostname: Some("app.example.com"),
            ..sources()
        });
        assert_eq!(resolved, "http://localhost:8000/api");
    }

    #[test]
    fn resolve_persists_override_for_future_runs() {
        let storage = Arc::new(MemoryStore::new());
        let config = ApiConfig::resolve(storage.as_ref(), Some("https://api.example.com/"));
        assert_eq!(config.base_url(), "https://api.example.com/api");
        assert_eq!(
            storage.get(BASE_URL_KEY),
            Some("https://api.example.com".to_string())
        );

        // A later run without the override picks up the persisted value.
        let config = ApiConfig::resolve(storage.as_ref(), None);
        assert_eq!(config.base_url(), "https://api.example.com/api");
    }

    #[test]
    fn host_root_strips_api_suffix() {
        let config = ApiConfig::from_base_url("http://localhost:9000");
        assert_eq!(config.base_url(), "http://localhost:9000/api");
        assert_eq!(config.host_root(), "http://localhost:9000");
        assert_eq!(config.endpoint("/auth/login"), "http://localhost:9000/api/auth/login");
    }

    #[test]
    fn independent_configs_coexist() {
        let a = ApiConfig::from_base_url("http://localhost:1111");
        let b = ApiConfig::from_base_url("http://localhost:2222");
        assert_ne!(a.base_url(), b.base_url());
    }
}
