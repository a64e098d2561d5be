//! End-to-end tests for the HTTP surface, run against an in-memory SQLite
//! database seeded by the bootstrap script.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::extract::connect_info::ConnectInfo;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;
use tracing::Level;
use web_lib::adapters::SqliteAdapter;
use web_lib::config::Config;
use web_lib::credentials;
use web_lib::web::{router, AppState};

struct TestApp {
    app: Router,
    db: Arc<SqliteAdapter>,
    _docs: tempfile::TempDir,
}

async fn spawn_app() -> TestApp {
    let docs = tempfile::tempdir().expect("tempdir");
    std::fs::write(docs.path().join("hello.txt"), b"hello there").expect("fixture file");

    // One connection: every handle must see the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");

    let db = Arc::new(SqliteAdapter::new(pool));
    db.bootstrap_if_needed().await.expect("bootstrap");
    credentials::migrate_plaintext_passwords(db.as_ref())
        .await
        .expect("password migration");

    let config = Arc::new(Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: "sqlite::memory:".to_string(),
        log_level: Level::WARN,
        public_host: "localhost:8080".to_string(),
        docs_dir: PathBuf::from(docs.path()),
        session_ttl_hours: 24,
        login_max_attempts: 5,
        login_window_secs: 60,
    });

    let state = AppState::new(db.clone(), config);
    TestApp {
        app: router(state),
        db,
        _docs: docs,
    }
}

fn get(path: &str) -> Request<Body> {
    with_client_addr(Request::get(path).body(Body::empty()).unwrap(), 1)
}

fn get_with_cookie(path: &str, cookie: &str) -> Request<Body> {
    with_client_addr(
        Request::get(path)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap(),
        1,
    )
}

fn form_post(path: &str, body: &str, client: u8) -> Request<Body> {
    with_client_addr(
        Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap(),
        client,
    )
}

fn with_client_addr(mut req: Request<Body>, client: u8) -> Request<Body> {
    let addr: SocketAddr = format!("127.0.0.{client}:4000").parse().unwrap();
    req.extensions_mut().insert(ConnectInfo(addr));
    req
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Logs in and returns the session cookie value.
async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(form_post(
            "/login",
            &format!("username={username}&password={password}"),
            9,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .unwrap();
    set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}

#[tokio::test]
async fn landing_page_renders() {
    let t = spawn_app().await;
    let response = t.app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn static_pages_render() {
    let t = spawn_app().await;
    for path in ["/quotes", "/sitemap", "/forum", "/downloads"] {
        let response = t.app.clone().oneshot(get(path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{path}");
    }
}

#[tokio::test]
async fn login_with_correct_credentials_sets_session() {
    let t = spawn_app().await;
    let response = t
        .app
        .clone()
        .oneshot(form_post("/login", "username=alice&password=wonderland", 2))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/profile/2"
    );
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn login_failure_is_rendered_inline() {
    let t = spawn_app().await;
    let response = t
        .app
        .clone()
        .oneshot(form_post("/login", "username=alice&password=nope", 3))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Invalid Credentials. Please try again."));
}

#[tokio::test]
async fn unknown_user_gets_the_same_message() {
    let t = spawn_app().await;
    let response = t
        .app
        .clone()
        .oneshot(form_post("/login", "username=mallory&password=x", 4))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Invalid Credentials. Please try again."));
}

#[tokio::test]
async fn sixth_login_attempt_is_rate_limited() {
    let t = spawn_app().await;
    for _ in 0..5 {
        let response = t
            .app
            .clone()
            .oneshot(form_post("/login", "username=alice&password=bad", 5))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Correct credentials do not matter once the cap is hit.
    let response = t
        .app
        .clone()
        .oneshot(form_post("/login", "username=alice&password=wonderland", 5))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // A different client address is unaffected.
    let response = t
        .app
        .clone()
        .oneshot(form_post("/login", "username=alice&password=wonderland", 6))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn profile_requires_a_session() {
    let t = spawn_app().await;
    let response = t.app.clone().oneshot(get("/profile/2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
}

#[tokio::test]
async fn profile_is_visible_to_its_owner() {
    let t = spawn_app().await;
    let cookie = login(&t.app, "alice", "wonderland").await;
    let response = t
        .app
        .clone()
        .oneshot(get_with_cookie("/profile/2", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("alice"));
    assert!(body.contains("4111-1111-1111-1111"));
}

#[tokio::test]
async fn profile_of_another_user_is_forbidden() {
    let t = spawn_app().await;
    let cookie = login(&t.app, "alice", "wonderland").await;
    let response = t
        .app
        .clone()
        .oneshot(get_with_cookie("/profile/1", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_panel_is_admin_only() {
    let t = spawn_app().await;

    let admin_cookie = login(&t.app, "admin", "admin123").await;
    let response = t
        .app
        .clone()
        .oneshot(get_with_cookie("/admin_panel", &admin_cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let alice_cookie = login(&t.app, "alice", "wonderland").await;
    let response = t
        .app
        .clone()
        .oneshot(get_with_cookie("/admin_panel", &alice_cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let t = spawn_app().await;
    let cookie = login(&t.app, "alice", "wonderland").await;

    let response = t
        .app
        .clone()
        .oneshot(get_with_cookie("/logout", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = t
        .app
        .clone()
        .oneshot(get_with_cookie("/profile/2", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
}

#[tokio::test]
async fn redirect_allows_same_origin_only() {
    let t = spawn_app().await;

    let response = t
        .app
        .clone()
        .oneshot(get("/redirect?destination=/foo"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "http://localhost:8080/foo"
    );

    let response = t
        .app
        .clone()
        .oneshot(get("/redirect?destination=https://evil.example/x"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = t
        .app
        .clone()
        .oneshot(get("/redirect?destination=javascript:alert(1)"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = t.app.clone().oneshot(get("/redirect")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn comment_markup_is_escaped_when_listed() {
    let t = spawn_app().await;

    let response = t
        .app
        .clone()
        .oneshot(form_post(
            "/comments",
            "username=%3Cb%3Ea%3C%2Fb%3E&comment=hi",
            7,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = t.app.clone().oneshot(get("/comments")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("&lt;b&gt;a&lt;/b&gt;"));
    assert!(!body.contains("<b>a</b>"));
}

#[tokio::test]
async fn comments_keep_insertion_order() {
    let t = spawn_app().await;
    for text in ["first", "second", "third"] {
        let response = t
            .app
            .clone()
            .oneshot(form_post(
                "/comments",
                &format!("username=visitor&comment={text}"),
                7,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    let body = body_string(t.app.clone().oneshot(get("/comments")).await.unwrap()).await;
    let first = body.find("first").unwrap();
    let second = body.find("second").unwrap();
    let third = body.find("third").unwrap();
    assert!(first < second && second < third);
}

#[tokio::test]
async fn empty_comment_is_rejected() {
    let t = spawn_app().await;
    let response = t
        .app
        .clone()
        .oneshot(form_post("/comments", "username=visitor&comment=", 7))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn download_serves_files_under_the_base() {
    let t = spawn_app().await;
    let response = t
        .app
        .clone()
        .oneshot(get("/download?file=hello.txt"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(disposition, "attachment; filename=\"hello.txt\"");
    assert_eq!(body_string(response).await, "hello there");
}

#[tokio::test]
async fn download_rejects_path_traversal() {
    let t = spawn_app().await;
    let response = t
        .app
        .clone()
        .oneshot(get("/download?file=..%2F..%2F..%2F..%2Fetc%2Fpasswd"))
        .await
        .unwrap();
    assert!(
        response.status() == StatusCode::FORBIDDEN || response.status() == StatusCode::NOT_FOUND
    );
    let response = t
        .app
        .clone()
        .oneshot(get("/download?file=missing.txt"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_echo_is_escaped() {
    let t = spawn_app().await;
    let response = t
        .app
        .clone()
        .oneshot(get("/search?query=%3Cscript%3Ealert(1)%3C%2Fscript%3E"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("&lt;script&gt;"));
    assert!(!body.contains("<script>alert"));
}

#[tokio::test]
async fn password_migration_runs_exactly_once() {
    let t = spawn_app().await;

    // spawn_app already migrated; a second run must be a no-op.
    let migrated = credentials::migrate_plaintext_passwords(t.db.as_ref())
        .await
        .unwrap();
    assert_eq!(migrated, 0);

    // Credentials still verify after the repeated run.
    let response = t
        .app
        .clone()
        .oneshot(form_post("/login", "username=bob&password=fixit", 8))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}
