//! Route guard: synchronous admission check against the session.
//!
//! Thin consumer of [`SessionStore`]; it cannot suspend, so it reads
//! the synchronous token check rather than the broadcast stream.

use std::sync::Arc;

use tracing::debug;

use crate::session::SessionStore;

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Route entry is admitted.
    Allow,
    /// Route entry is rejected; navigation should go to login and come
    /// back to the requested path afterwards.
    RedirectToLogin { return_to: String },
}

/// Admits or rejects route entry based on the session.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: Arc<SessionStore>,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
        }
    }

    /// Synchronous admission check for a route path.
    pub fn check(&self, path: &str) -> GuardDecision {
        if self.session.is_authenticated() {
            debug!("Access granted to {path}");
            return GuardDecision::Allow;
        }

        debug!("Access denied, redirecting to login from {path}");
        GuardDecision::RedirectToLogin {
            return_to: path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::config::Config;
    use crate::session::store::CredentialStore;

    fn session(root: &std::path::Path) -> Arc<SessionStore> {
        let store = Arc::new(CredentialStore::with_root(root));
        let config = Config {
            api_base_url: "http://localhost:1/api".to_string(),
            ..Config::default()
        };
        let api = ApiClient::new(&config, Arc::clone(&store)).unwrap();
        Arc::new(SessionStore::new(api, store))
    }

    /// Test: a stored token admits the route even before the user has
    /// been rehydrated into the broadcast value.
    #[test]
    fn test_guard_admits_with_token_only() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(dir.path());
        session.credential_store().write_token("tok").unwrap();

        let guard = RouteGuard::new(Arc::clone(&session));
        assert_eq!(guard.check("/feed"), GuardDecision::Allow);
    }

    /// Test: no token redirects to login with the requested path.
    #[test]
    fn test_guard_redirects_without_token() {
        let dir = tempfile::tempdir().unwrap();
        let guard = RouteGuard::new(session(dir.path()));

        assert_eq!(
            guard.check("/feed"),
            GuardDecision::RedirectToLogin {
                return_to: "/feed".to_string()
            }
        );
    }
}
