use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, MockConfig, ERROR_BAD_CREDENTIALS};
use serde_json::Value;
use tower::ServiceExt;

async fn get(app: &Router, uri: &str) -> Value {
    let resp = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes: bytes::Bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn error_code(body: &Value) -> i64 {
    assert_eq!(body["success"], false);
    body["error"]["code"].as_i64().unwrap()
}

async fn login(app: &Router) -> String {
    let body = get(
        app,
        "/webapi/auth.cgi?api=SYNO.API.Auth&version=3&method=login&account=admin&passwd=admin&format=sid",
    )
    .await;
    assert_eq!(body["success"], true);
    body["data"]["sid"].as_str().unwrap().to_string()
}

// --- auth ---

#[tokio::test]
async fn login_returns_sid() {
    let app = app(MockConfig::default());
    let sid = login(&app).await;
    assert!(!sid.is_empty());
}

#[tokio::test]
async fn login_bad_password() {
    let app = app(MockConfig::default());
    let body = get(
        &app,
        "/webapi/auth.cgi?api=SYNO.API.Auth&version=3&method=login&account=admin&passwd=nope",
    )
    .await;
    assert_eq!(error_code(&body), i64::from(ERROR_BAD_CREDENTIALS));
}

#[tokio::test]
async fn auth_wrong_api() {
    let app = app(MockConfig::default());
    let body = get(&app, "/webapi/auth.cgi?api=SYNO.Nope&version=3&method=login").await;
    assert_eq!(error_code(&body), 102);
}

#[tokio::test]
async fn auth_unsupported_version() {
    let app = app(MockConfig::default());
    let body = get(&app, "/webapi/auth.cgi?api=SYNO.API.Auth&version=9&method=login").await;
    assert_eq!(error_code(&body), 104);
}

#[tokio::test]
async fn auth_unknown_method() {
    let app = app(MockConfig::default());
    let body = get(&app, "/webapi/auth.cgi?api=SYNO.API.Auth&version=3&method=dance").await;
    assert_eq!(error_code(&body), 103);
}

#[tokio::test]
async fn logout_invalidates_session() {
    let app = app(MockConfig::default());
    let sid = login(&app).await;
    let body = get(
        &app,
        &format!("/webapi/auth.cgi?api=SYNO.API.Auth&version=3&method=logout&_sid={sid}"),
    )
    .await;
    assert_eq!(body["success"], true);

    let body = get(
        &app,
        &format!("/webapi/DownloadStation/task.cgi?api=SYNO.DownloadStation.Task&version=1&method=list&_sid={sid}"),
    )
    .await;
    assert_eq!(error_code(&body), 105);
}

// --- tasks ---

#[tokio::test]
async fn task_list_requires_session() {
    let app = app(MockConfig::default());
    let body = get(
        &app,
        "/webapi/DownloadStation/task.cgi?api=SYNO.DownloadStation.Task&version=1&method=list",
    )
    .await;
    assert_eq!(error_code(&body), 105);
}

#[tokio::test]
async fn task_create_requires_uri() {
    let app = app(MockConfig::default());
    let sid = login(&app).await;
    let body = get(
        &app,
        &format!("/webapi/DownloadStation/task.cgi?api=SYNO.DownloadStation.Task&version=1&method=create&_sid={sid}"),
    )
    .await;
    assert_eq!(error_code(&body), 101);
}

#[tokio::test]
async fn task_create_then_list() {
    let app = app(MockConfig::default());
    let sid = login(&app).await;
    let base = format!(
        "/webapi/DownloadStation/task.cgi?api=SYNO.DownloadStation.Task&version=1&_sid={sid}"
    );

    let body = get(&app, &format!("{base}&method=list")).await;
    assert_eq!(body["data"]["total"], 0);

    for uri in ["http%3A%2F%2Fhost%2Fa.iso", "magnet%3A%3Fxt%3Durn%3Abtih%3Aabc"] {
        let body = get(&app, &format!("{base}&method=create&uri={uri}")).await;
        assert_eq!(body, serde_json::json!({"success": true}));
    }

    let body = get(&app, &format!("{base}&method=list")).await;
    assert_eq!(body["data"]["total"], 2);
    let tasks = body["data"]["tasks"].as_array().unwrap();
    assert_eq!(tasks[0]["id"], "dbid_1");
    assert_eq!(tasks[0]["type"], "http");
    assert_eq!(tasks[0]["title"], "a.iso");
    assert_eq!(tasks[0]["status"], "waiting");
    assert_eq!(tasks[1]["type"], "bt");

    let body = get(&app, &format!("{base}&method=list&offset=1&limit=1")).await;
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["offset"], 1);
    let tasks = body["data"]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], "dbid_2");
}

#[tokio::test]
async fn task_unsupported_version() {
    let app = app(MockConfig::default());
    let body = get(
        &app,
        "/webapi/DownloadStation/task.cgi?api=SYNO.DownloadStation.Task&version=2&method=list",
    )
    .await;
    assert_eq!(error_code(&body), 104);
}
