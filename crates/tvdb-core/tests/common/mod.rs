//! Shared fixtures for the mock-server tests

#![allow(dead_code)]

use tempfile::TempDir;
use tvdb_core::{ClientConfig, CredentialStore, Credentials, TvdbSession};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USERNAME: &str = "me@example.com";
pub const PASSWORD: &str = "hunter2";

pub const LOGIN_PAGE: &str = r#"
    <html><body>
      <form method="post" action="/auth/login">
        <input type="hidden" name="_token" value="tok123">
        <input type="email" name="email">
        <input type="password" name="password">
        <input type="checkbox" name="remember">
      </form>
    </body></html>
"#;

/// Session against the mock server with its credential file in a temp dir
pub fn session_for(server: &MockServer, dir: &TempDir) -> TvdbSession {
    let config = ClientConfig {
        base_url: server.uri(),
        requests_per_second: 0.0,
        ..ClientConfig::default()
    };
    let store = CredentialStore::new(dir.path().join("account.json"));
    TvdbSession::with_config(config, store, Credentials::new(USERNAME, PASSWORD)).unwrap()
}

/// Login page GET, expected `hits` times
pub async fn mount_login_page(server: &MockServer, hits: u64) {
    Mock::given(method("GET"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .expect(hits)
        .mount(server)
        .await;
}

/// Login POST that sets the auth cookie and redirects to the dashboard
pub async fn mount_login_accepted(server: &MockServer, hits: u64) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "/dashboard")
                .insert_header("Set-Cookie", "TVDB_AUTHENTICATED=1; Path=/"),
        )
        .expect(hits)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>welcome</html>"))
        .mount(server)
        .await;
}

/// Login POST that renders the login page again without any cookie
pub async fn mount_login_refused(server: &MockServer, hits: u64) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .expect(hits)
        .mount(server)
        .await;
}
