mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use parking_reservation_api::routes::create_app;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> anyhow::Result<Router> {
    let (state, _mailer) = common::setup_state().await?;
    Ok(create_app(state))
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn register_and_login(app: &Router, username: &str) -> (String, String) {
    let (status, _) = send(
        app,
        json_request(
            "POST",
            "/api/register",
            None,
            json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": "secret123",
                "phone": format!("99890{}", username.len() * 1_111_111),
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/login",
            None,
            json!({ "username": username, "password": "secret123" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    (
        body["data"]["access"].as_str().unwrap().to_string(),
        body["data"]["refresh"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn health_reports_database() -> anyhow::Result<()> {
    let app = app().await?;
    let (status, body) = send(&app, get_request("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Health check");
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "up");
    Ok(())
}

#[tokio::test]
async fn unknown_path_is_json_not_found() -> anyhow::Result<()> {
    let app = app().await?;
    let (status, body) = send(&app, get_request("/api/nowhere", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["path"], "/api/nowhere");
    Ok(())
}

#[tokio::test]
async fn register_validates_payload() -> anyhow::Result<()> {
    let app = app().await?;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/register",
            None,
            json!({
                "username": "driver",
                "email": "not-an-email",
                "password": "123",
                "phone": "998901234567",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["fields"]["email"].is_array());
    assert!(body["data"]["fields"]["password"].is_array());

    let request = Request::builder()
        .method("POST")
        .uri("/api/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn protected_routes_need_an_access_token() -> anyhow::Result<()> {
    let app = app().await?;

    let (status, _) = send(&app, get_request("/api/profile/about", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (access, refresh) = register_and_login(&app, "driver").await;

    let (status, body) = send(&app, get_request("/api/profile/about", Some(&access))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "driver");
    assert!(body["data"].get("password_hash").is_none());

    let (status, _) = send(&app, get_request("/api/profile/about", Some(&refresh))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        json_request("POST", "/api/token-refresh", None, json!({ "refresh": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["access"].is_string());
    Ok(())
}

#[tokio::test]
async fn regular_user_cannot_create_zone() -> anyhow::Result<()> {
    let app = app().await?;
    let (access, _) = register_and_login(&app, "driver").await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/parking-zones",
            Some(&access),
            json!({
                "name": "Central",
                "address": "Amir Temur 1",
                "coordinates": "41.3,69.2",
                "total_spots": 10,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["data"]["error"],
        "You do not have permission to perform this action"
    );
    Ok(())
}

#[tokio::test]
async fn reservation_endpoints_return_client_errors() -> anyhow::Result<()> {
    let app = app().await?;
    let (access, _) = register_and_login(&app, "driver").await;

    let (status, _) = send(
        &app,
        get_request(
            "/api/reservations/7d3c4b9e-0000-4000-8000-000000000000",
            Some(&access),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/reservations",
            Some(&access),
            json!({ "spot_id": "7d3c4b9e-0000-4000-8000-000000000000" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["fields"]["spot_id"].is_array());

    let (status, body) = send(&app, get_request("/api/reservations", Some(&access))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 0);
    Ok(())
}

#[tokio::test]
async fn huge_page_number_returns_an_empty_page() -> anyhow::Result<()> {
    let app = app().await?;
    let (access, _) = register_and_login(&app, "driver").await;

    let (status, body) = send(
        &app,
        get_request("/api/parking-zones?page=9223372036854775807", Some(&access)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"], json!([]));
    assert_eq!(body["meta"]["total"], 0);
    Ok(())
}
