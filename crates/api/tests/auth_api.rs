//! Identity extraction: Bearer header, cookie fallback, and role checks.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, build_test_app, get, get_auth, test_config, token_for};
use jsonwebtoken::{encode, EncodingKey, Header};
use questline_api::auth::jwt::Claims;
use tower::ServiceExt;

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = build_test_app();
    let response = get(app.app(), "/api/v1/user/me").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = build_test_app();
    let response = get_auth(app.app(), "/api/v1/user/me", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let app = build_test_app();
    let user = app.student("ada").await;
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user,
        role: "student".to_string(),
        exp: now - 300,
        iat: Some(now - 600),
        jti: None,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(test_config().jwt.secret.as_bytes()),
    )
    .unwrap();

    let response = get_auth(app.app(), "/api/v1/user/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_bearer_scheme_is_unauthorized() {
    let app = build_test_app();
    let request = Request::builder()
        .uri("/api/v1/user/me")
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();

    let response = app.app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn auth_cookie_is_accepted() {
    let app = build_test_app();
    let user = app.student("ada").await;
    let token = token_for(user, "student");

    let request = Request::builder()
        .uri("/api/v1/user/me")
        .header("Cookie", format!("theme=dark; auth_token={token}"))
        .body(Body::empty())
        .unwrap();

    let response = app.app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], user);
    assert_eq!(json["data"]["username"], "ada");
    assert_eq!(json["data"]["completed_tasks_count"], 0);
}

#[tokio::test]
async fn student_cannot_reach_admin_routes() {
    let app = build_test_app();
    let user = app.student("ada").await;
    let token = token_for(user, "student");

    let response = get_auth(app.app(), "/api/v1/admin/users", &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn token_for_deleted_user_is_not_found_on_profile() {
    let app = build_test_app();
    let token = token_for(4242, "student");

    let response = get_auth(app.app(), "/api/v1/user/me", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
