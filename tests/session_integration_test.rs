use anyhow::Result;
use httpmock::prelude::*;
use roadready::app::account::{sign_up, SignupForm};
use roadready::core::routing::{Access, Route};
use roadready::domain::model::Role;
use roadready::domain::ports::KeyValueStore;
use roadready::{App, LocalStorage, RoadReadyError, SessionStorage, TomlConfig};
use serde_json::json;
use tempfile::TempDir;

fn config_for(server: &MockServer) -> TomlConfig {
    let mut config = TomlConfig::default();
    config.api.base_url = server.url("/api/");
    config.api.timeout_seconds = 5;
    config
}

fn app_with_file(server: &MockServer, dir: &TempDir) -> Result<App> {
    let file = dir.path().join("session.json");
    Ok(App::with_stores(
        &config_for(server),
        Box::new(LocalStorage::new(file)),
        Box::new(SessionStorage::new()),
    )?)
}

#[tokio::test]
async fn test_remembered_login_survives_restart() -> Result<()> {
    let server = MockServer::start();
    let dir = TempDir::new()?;

    let login = server.mock(|when, then| {
        when.method(POST)
            .path("/api/Authentication/login")
            .json_body(json!({"email": "admin@rr.test", "password": "secret"}));
        then.status(200).json_body(json!({"token": "jwt-admin"}));
    });
    let me = server.mock(|when, then| {
        when.method(GET)
            .path("/api/Users/me")
            .header("Authorization", "Bearer jwt-admin");
        then.status(200)
            .json_body(json!({"userId": 1, "firstName": "Ada", "roleName": "Admin"}));
    });

    let app = app_with_file(&server, &dir)?;
    let outcome = app.session.login("admin@rr.test", "secret", true).await?;

    login.assert();
    me.assert();
    assert_eq!(outcome.token, "jwt-admin");
    assert_eq!(outcome.landing, Route::AdminDashboard);

    let stored = LocalStorage::new(dir.path().join("session.json"));
    assert_eq!(stored.get("token")?.as_deref(), Some("jwt-admin"));

    // A fresh process reads the same file and is already signed in.
    let restarted = app_with_file(&server, &dir)?;
    assert!(restarted.session.is_authenticated());
    assert_eq!(restarted.session.role(), Some(Role::Admin));
    assert_eq!(restarted.session.greeting("User"), "Welcome, Ada");
    assert_eq!(restarted.session.guard(Route::AdminDashboard), Access::Allow);
    assert_eq!(
        restarted.session.api().token().as_deref(),
        Some("jwt-admin")
    );

    restarted.session.logout()?;
    assert!(!restarted.session.is_authenticated());
    assert_eq!(stored.get("token")?, None);
    Ok(())
}

#[tokio::test]
async fn test_session_only_login_is_not_written_to_disk() -> Result<()> {
    let server = MockServer::start();
    let dir = TempDir::new()?;

    server.mock(|when, then| {
        when.method(POST).path("/api/Authentication/login");
        then.status(200).json_body(json!({"accessToken": "jwt-cust"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/Users/me");
        then.status(200)
            .json_body(json!({"id": "c-9", "roleName": "Customer"}));
    });

    let app = app_with_file(&server, &dir)?;
    let outcome = app.session.login("c@rr.test", "pw", false).await?;

    assert_eq!(outcome.landing, Route::CustomerDashboard);
    assert!(app.session.is_authenticated());
    assert_eq!(app.session.user_id().as_deref(), Some("c-9"));

    let stored = LocalStorage::new(dir.path().join("session.json"));
    assert_eq!(stored.get("token")?, None);
    assert!(app.customer_dashboard().is_ok());
    assert!(app.admin_fleet().is_err());
    Ok(())
}

#[tokio::test]
async fn test_corrupt_session_file_does_not_lock_out() -> Result<()> {
    let server = MockServer::start();
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join("session.json"), "{garbage")?;

    server.mock(|when, then| {
        when.method(POST).path("/api/Authentication/login");
        then.status(200).json_body(json!({"token": "jwt-new"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/Users/me");
        then.status(200).json_body(json!({"roleName": "Customer"}));
    });

    let app = app_with_file(&server, &dir)?;
    assert!(!app.session.is_authenticated());
    app.session.logout()?;
    app.session.login("c@rr.test", "pw", true).await?;

    let stored = LocalStorage::new(dir.path().join("session.json"));
    assert_eq!(stored.get("token")?.as_deref(), Some("jwt-new"));
    Ok(())
}

#[tokio::test]
async fn test_login_404_explains_route() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/Authentication/login");
        then.status(404);
    });

    let app = App::with_stores(
        &config_for(&server),
        Box::new(SessionStorage::new()),
        Box::new(SessionStorage::new()),
    )?;
    let err = app.session.login("a@b.c", "pw", true).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(
        err.user_friendly_message(),
        "Login endpoint not found (404). Check baseUrl & route."
    );
    assert!(!app.session.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn test_login_without_token_fails() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/Authentication/login");
        then.status(200).json_body(json!({"ok": true}));
    });
    let me = server.mock(|when, then| {
        when.method(GET).path("/api/Users/me");
        then.status(200).json_body(json!({}));
    });

    let app = App::with_stores(
        &config_for(&server),
        Box::new(SessionStorage::new()),
        Box::new(SessionStorage::new()),
    )?;
    let err = app.session.login("a@b.c", "pw", true).await.unwrap_err();

    assert!(matches!(err, RoadReadyError::AuthError { .. }));
    assert!(err.to_string().contains("Token missing in response"));
    assert_eq!(me.hits(), 0);
    Ok(())
}

#[tokio::test]
async fn test_profile_failure_still_signs_in() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/Authentication/login");
        then.status(200).json_body(json!({"jwt": "jwt-x"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/Users/me");
        then.status(500);
    });

    let app = App::with_stores(
        &config_for(&server),
        Box::new(SessionStorage::new()),
        Box::new(SessionStorage::new()),
    )?;
    let outcome = app.session.login("a@b.c", "pw", true).await?;

    assert_eq!(outcome.profile, None);
    assert_eq!(outcome.landing, Route::Home);
    assert!(app.session.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn test_profile_without_role_lands_on_customer_dashboard() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/Authentication/login");
        then.status(200).json_body(json!({"token": "jwt-plain"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/Users/me");
        then.status(200).json_body(json!({"email": "a@b.c"}));
    });

    let app = App::with_stores(
        &config_for(&server),
        Box::new(SessionStorage::new()),
        Box::new(SessionStorage::new()),
    )?;
    let outcome = app.session.login("a@b.c", "pw", false).await?;

    assert!(outcome.profile.is_some());
    assert_eq!(outcome.landing, Route::CustomerDashboard);
    Ok(())
}

#[tokio::test]
async fn test_empty_credentials_send_nothing() -> Result<()> {
    let server = MockServer::start();
    let login = server.mock(|when, then| {
        when.method(POST).path("/api/Authentication/login");
        then.status(200).json_body(json!({"token": "t"}));
    });

    let app = App::with_stores(
        &config_for(&server),
        Box::new(SessionStorage::new()),
        Box::new(SessionStorage::new()),
    )?;
    let err = app.session.login("", "pw", true).await.unwrap_err();

    assert_eq!(err.to_string(), "Email and password are required.");
    assert_eq!(login.hits(), 0);
    Ok(())
}

#[tokio::test]
async fn test_signup_posts_register_request() -> Result<()> {
    let server = MockServer::start();
    let register = server.mock(|when, then| {
        when.method(POST)
            .path("/api/Authentication/register")
            .json_body(json!({
                "firstName": "Sam",
                "lastName": "Lee",
                "email": "sam@rr.test",
                "phoneNumber": "555",
                "password": "pw1"
            }));
        then.status(201).json_body(json!({"userId": 12}));
    });

    let app = App::with_stores(
        &config_for(&server),
        Box::new(SessionStorage::new()),
        Box::new(SessionStorage::new()),
    )?;
    let form = SignupForm {
        first_name: "Sam".to_string(),
        last_name: "Lee".to_string(),
        email: "sam@rr.test".to_string(),
        phone_number: "555".to_string(),
        password: "pw1".to_string(),
        confirm: "pw1".to_string(),
    };
    sign_up(&app.auth, &form).await?;

    register.assert();
    Ok(())
}
