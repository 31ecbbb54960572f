use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use registrar::router::init_router;
use registrar::state::AppState;
use registrar_config::{CorsConfig, JwtConfig};
use registrar_core::{Privilege, generate_salt, hash_password};
use registrar_models::UserId;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

#[allow(dead_code)]
pub const PASSWORD: &str = "password123";

#[allow(dead_code)]
pub fn jwt_config() -> JwtConfig {
    JwtConfig::from_vars(|key| match key {
        "JWT_SECRET" => Some("integration-test-secret".to_string()),
        _ => None,
    })
}

pub fn setup_test_app(pool: PgPool) -> Router {
    let state = AppState::new(pool, jwt_config(), CorsConfig::from_vars(|_| None));
    init_router(state)
}

#[allow(dead_code)]
/// Inserts a user directly so tests can pick the privilege level.
pub async fn create_test_user(pool: &PgPool, login: &str, privilege: Privilege) -> UserId {
    let salt = generate_salt();
    let hashed = hash_password(PASSWORD, &salt).unwrap();

    sqlx::query_scalar::<_, UserId>(
        r#"INSERT INTO users (login, password, salt, name, surname, privilege)
           VALUES ($1, $2, $3, 'Test', 'User', $4)
           RETURNING id"#,
    )
    .bind(login)
    .bind(hashed)
    .bind(salt)
    .bind(privilege)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

#[allow(dead_code)]
pub async fn get_auth_token(app: &Router, login: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "login": login, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["access_token"].as_str().unwrap().to_string()
}

#[allow(dead_code)]
/// Creates a user with `privilege` and returns its id and a session token.
pub async fn login_as(app: &Router, pool: &PgPool, login: &str, privilege: Privilege) -> (UserId, String) {
    let id = create_test_user(pool, login, privilege).await;
    let token = get_auth_token(app, login).await;
    (id, token)
}
