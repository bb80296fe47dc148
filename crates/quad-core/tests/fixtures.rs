//! Shared harness for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use quad_core::api::ApiClient;
use quad_core::config::Config;
use quad_core::feed::FeedController;
use quad_core::feed::attachment::PreviewRegistry;
use quad_core::session::SessionStore;
use quad_core::session::store::CredentialStore;
use quad_types::AuthUser;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::MockServer;

/// Everything a test needs: a mock server, a temp session home, and
/// the wired-up components.
pub struct Harness {
    pub server: MockServer,
    pub home: TempDir,
    pub store: Arc<CredentialStore>,
    pub api: ApiClient,
    pub session: Arc<SessionStore>,
    pub previews: Arc<PreviewRegistry>,
}

impl Harness {
    pub fn feed(&self) -> FeedController {
        FeedController::new(
            self.api.clone(),
            Arc::clone(&self.session),
            Arc::clone(&self.previews),
        )
    }

    /// Persists a signed-in user with valid numeric ids.
    pub fn seed_logged_in_user(&self) {
        self.store
            .save_session("tok-123", &sample_auth_user())
            .unwrap();
    }
}

pub async fn harness() -> Harness {
    let server = MockServer::start().await;
    build_harness(server.uri(), server)
}

/// Harness pointed at an address nothing listens on, for transport
/// failure paths. The mock server is still started so the struct is
/// fully populated; it receives no requests.
pub async fn unreachable_harness() -> Harness {
    let server = MockServer::start().await;
    build_harness("http://127.0.0.1:9".to_string(), server)
}

fn build_harness(base_url: String, server: MockServer) -> Harness {
    let home = tempfile::tempdir().unwrap();
    let store = Arc::new(CredentialStore::with_root(home.path()));
    let config = Config {
        api_base_url: base_url,
        request_timeout_secs: 5,
    };
    let api = ApiClient::new(&config, Arc::clone(&store)).unwrap();
    let session = Arc::new(SessionStore::new(api.clone(), Arc::clone(&store)));
    let previews = Arc::new(PreviewRegistry::new());

    Harness {
        server,
        home,
        store,
        api,
        session,
        previews,
    }
}

pub fn sample_auth_user() -> AuthUser {
    AuthUser {
        user_id: Some(7),
        email: Some("ada@campus.edu".to_string()),
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        role: Some("student".to_string()),
        campus_id: Some(2),
        ..AuthUser::default()
    }
}

/// The user as the boundary serializes it.
pub fn user_json() -> Value {
    json!({
        "user_id": 7,
        "email": "ada@campus.edu",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "role": "student",
        "campus": "2"
    })
}

/// A feed post with a plain id and flattened author fields.
pub fn post_json(id: u64, content: &str) -> Value {
    json!({
        "id": id,
        "content": content,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "created_at": "2025-03-01T10:00:00Z",
        "heart_count": 1
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_user_resolves_numeric_ids() {
        let user = sample_auth_user();
        assert_eq!(user.user_id, Some(7));
        assert_eq!(user.campus_id(), Some(2));
    }
}
