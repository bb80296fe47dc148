//! Session lifecycle against a mocked authentication boundary.

mod fixtures;

use fixtures::{harness, user_json};
use quad_types::{LoginRequest, ProfileUpdate};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn credentials() -> LoginRequest {
    LoginRequest {
        email: "ada@campus.edu".to_string(),
        password: "hunter42".to_string(),
    }
}

#[tokio::test]
async fn test_login_persists_and_broadcasts() {
    let h = harness().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "email": "ada@campus.edu",
            "password": "hunter42"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Login successful",
            "user": user_json(),
            "token": "tok-123"
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let subscriber = h.session.subscribe();
    let response = h.session.login(&credentials()).await.unwrap();

    assert_eq!(response.message, "Login successful");
    assert_eq!(response.token, "tok-123");
    assert!(h.session.is_authenticated());
    assert_eq!(h.session.current_user().unwrap().user_id, Some(7));

    // Durable storage and the broadcast value agree.
    assert_eq!(h.store.read_token().as_deref(), Some("tok-123"));
    assert_eq!(h.store.read_user().unwrap().user_id, Some(7));
    assert_eq!(subscriber.borrow().as_ref().unwrap().user_id, Some(7));
}

#[tokio::test]
async fn test_login_failure_propagates_and_persists_nothing() {
    let h = harness().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h.session.login(&credentials()).await.unwrap_err();
    assert_eq!(err.server_message.as_deref(), Some("Invalid credentials"));
    assert_eq!(
        err.user_message("Login failed. Please try again."),
        "Invalid credentials"
    );

    assert!(!h.session.is_authenticated());
    assert_eq!(h.session.current_user(), None);
    assert_eq!(h.store.read_token(), None);
    assert_eq!(h.store.read_user(), None);
}

#[tokio::test]
async fn test_logout_after_login_clears_both_entries() {
    let h = harness().await;
    h.seed_logged_in_user();
    h.session.initialize();
    assert!(h.session.is_authenticated());

    h.session.logout();

    assert!(!h.session.is_authenticated());
    assert_eq!(h.session.current_user(), None);
    assert_eq!(h.store.read_token(), None);
    assert_eq!(h.store.read_user(), None);
}

#[tokio::test]
async fn test_profile_fetch_carries_token_and_updates_state() {
    let h = harness().await;
    h.seed_logged_in_user();
    h.session.initialize();

    let mut updated = user_json();
    updated["first_name"] = json!("Adele");
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .expect(1)
        .mount(&h.server)
        .await;

    let user = h.session.fetch_profile().await.unwrap();
    assert_eq!(user.first_name.as_deref(), Some("Adele"));

    assert_eq!(
        h.session.current_user().unwrap().first_name.as_deref(),
        Some("Adele")
    );
    assert_eq!(h.store.read_user().unwrap().first_name.as_deref(), Some("Adele"));
}

#[tokio::test]
async fn test_profile_update_failure_leaves_prior_state() {
    let h = harness().await;
    h.seed_logged_in_user();
    h.session.initialize();

    Mock::given(method("PUT"))
        .and(path("/auth/profile"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "Profile locked" })),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let update = ProfileUpdate {
        first_name: Some("Adele".to_string()),
        ..ProfileUpdate::default()
    };
    let err = h.session.update_profile(&update).await.unwrap_err();
    assert_eq!(err.server_message.as_deref(), Some("Profile locked"));

    // Prior state untouched on both sides.
    assert_eq!(
        h.session.current_user().unwrap().first_name.as_deref(),
        Some("Ada")
    );
    assert_eq!(h.store.read_user().unwrap().first_name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn test_profile_update_success_broadcasts() {
    let h = harness().await;
    h.seed_logged_in_user();
    h.session.initialize();

    let mut updated = user_json();
    updated["last_name"] = json!("Byron");
    Mock::given(method("PUT"))
        .and(path("/auth/profile"))
        .and(body_json(json!({ "last_name": "Byron" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .expect(1)
        .mount(&h.server)
        .await;

    let update = ProfileUpdate {
        last_name: Some("Byron".to_string()),
        ..ProfileUpdate::default()
    };
    h.session.update_profile(&update).await.unwrap();

    let subscriber = h.session.subscribe();
    assert_eq!(
        subscriber.borrow().as_ref().unwrap().last_name.as_deref(),
        Some("Byron")
    );
}
