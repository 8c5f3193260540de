//! HTTP API 集成测试
//!
//! 走完整的路由栈 (认证中间件 + 角色检查) 验证公开路由、
//! 角色门禁和订单生命周期。

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use tempfile::TempDir;
use tower::ServiceExt;

use shared::models::Role;
use taproom_server::auth::{JwtConfig, JwtService};
use taproom_server::core::server::build_router;
use taproom_server::core::{Config, ServerState};
use taproom_server::db::DbService;
use taproom_server::db::repository::user;
use taproom_server::utils::password::hash_password;

struct TestApp {
    router: Router,
    state: ServerState,
    // Held so the database file outlives the test
    _work_dir: TempDir,
}

async fn spawn_app() -> TestApp {
    let work_dir = TempDir::new().expect("create temp work dir");
    let db_path = work_dir.path().join("taproom.db");

    let db = DbService::new(&db_path.to_string_lossy())
        .await
        .expect("open test database");

    let jwt = JwtService::with_config(JwtConfig {
        secret: "integration-test-secret-of-enough-length".to_string(),
        expiration_minutes: 60,
        issuer: "taproom-server".to_string(),
        audience: "taproom-clients".to_string(),
    });

    let config = Config::with_overrides(work_dir.path().to_string_lossy(), 0);
    let state = ServerState::new(config, db.pool, Arc::new(jwt));
    let router = build_router(state.clone());

    TestApp {
        router,
        state,
        _work_dir: work_dir,
    }
}

async fn seed_user(app: &TestApp, username: &str, role: Role) -> i64 {
    let hash = hash_password("password123").expect("hash password");
    let created = user::create(&app.state.pool, username, &hash, role)
        .await
        .expect("seed user");
    created.id
}

fn token_for(app: &TestApp, id: i64, username: &str, role: Role) -> String {
    app.state
        .jwt_service
        .generate_token(id, username, role)
        .expect("generate token")
}

fn get(path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    builder.body(Body::empty()).expect("build request")
}

fn post_json(path: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("build request")
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json body")
}

#[tokio::test]
async fn public_routes_skip_auth() {
    let app = spawn_app().await;

    let health = app.router.clone().oneshot(get("/health", None)).await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);

    let tables = app
        .router
        .clone()
        .oneshot(get("/api/tables/count", None))
        .await
        .unwrap();
    assert_eq!(tables.status(), StatusCode::OK);
    let body = json_body(tables).await;
    assert_eq!(body["table_count"], 20);
}

#[tokio::test]
async fn protected_routes_require_token() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(get("/api/users/profile", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .router
        .clone()
        .oneshot(get("/api/orders/pending", Some("not-a-jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn staff_routes_reject_customers() {
    let app = spawn_app().await;
    let customer_id = seed_user(&app, "carla", Role::Customer).await;
    let token = token_for(&app, customer_id, "carla", Role::Customer);

    let response = app
        .router
        .clone()
        .oneshot(get("/api/orders/pending", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .router
        .clone()
        .oneshot(get("/api/admin/users", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_routes_reject_staff() {
    let app = spawn_app().await;
    let staff_id = seed_user(&app, "sam", Role::Staff).await;
    let token = token_for(&app, staff_id, "sam", Role::Staff);

    let pending = app
        .router
        .clone()
        .oneshot(get("/api/orders/pending", Some(&token)))
        .await
        .unwrap();
    assert_eq!(pending.status(), StatusCode::OK);

    let admin_only = app
        .router
        .clone()
        .oneshot(get("/api/admin/purchases", Some(&token)))
        .await
        .unwrap();
    assert_eq!(admin_only.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn order_lifecycle_over_http() {
    let app = spawn_app().await;
    let customer_id = seed_user(&app, "carla", Role::Customer).await;
    let staff_id = seed_user(&app, "sam", Role::Staff).await;
    let customer = token_for(&app, customer_id, "carla", Role::Customer);
    let staff = token_for(&app, staff_id, "sam", Role::Staff);

    // Submit
    let submit = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/orders",
            Some(&customer),
            serde_json::json!({"table_number": 4, "quantity": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(submit.status(), StatusCode::OK);
    let receipt = json_body(submit).await;
    let order_id = receipt["order_id"].as_i64().unwrap();

    // Visible in the staff queue
    let pending = app
        .router
        .clone()
        .oneshot(get("/api/orders/pending", Some(&staff)))
        .await
        .unwrap();
    let queue = json_body(pending).await;
    assert_eq!(queue.as_array().unwrap().len(), 1);

    // Approve
    let approve = app
        .router
        .clone()
        .oneshot(post_json(
            &format!("/api/orders/{order_id}/approve"),
            Some(&staff),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(approve.status(), StatusCode::OK);
    let decided = json_body(approve).await;
    assert_eq!(decided["order"]["status"], "approved");
    assert_eq!(decided["beer_count"], 2);

    // Owner sees the decision
    let status = app
        .router
        .clone()
        .oneshot(get(
            &format!("/api/orders/{order_id}/status"),
            Some(&customer),
        ))
        .await
        .unwrap();
    assert_eq!(status.status(), StatusCode::OK);
    assert_eq!(json_body(status).await, serde_json::json!("approved"));

    // A second customer cannot read it
    let other_id = seed_user(&app, "dave", Role::Customer).await;
    let other = token_for(&app, other_id, "dave", Role::Customer);
    let status = app
        .router
        .clone()
        .oneshot(get(&format!("/api/orders/{order_id}/status"), Some(&other)))
        .await
        .unwrap();
    assert_eq!(status.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_locks_after_five_failures() {
    let app = spawn_app().await;
    seed_user(&app, "carla", Role::Customer).await;

    for _ in 0..5 {
        let response = app
            .router
            .clone()
            .oneshot(post_json(
                "/api/auth/login",
                None,
                serde_json::json!({"username": "carla", "password": "wrong"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // The right password no longer helps while the lock holds
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            None,
            serde_json::json!({"username": "carla", "password": "password123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn login_success_resets_failure_counter() {
    let app = spawn_app().await;
    seed_user(&app, "carla", Role::Customer).await;

    for _ in 0..4 {
        let response = app
            .router
            .clone()
            .oneshot(post_json(
                "/api/auth/login",
                None,
                serde_json::json!({"username": "carla", "password": "wrong"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            None,
            serde_json::json!({"username": "carla", "password": "password123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["user"]["username"], "carla");

    // Counter was reset: four more misses do not lock
    for _ in 0..4 {
        app.router
            .clone()
            .oneshot(post_json(
                "/api/auth/login",
                None,
                serde_json::json!({"username": "carla", "password": "wrong"}),
            ))
            .await
            .unwrap();
    }
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            None,
            serde_json::json!({"username": "carla", "password": "password123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn registration_waits_for_approval() {
    let app = spawn_app().await;
    let staff_id = seed_user(&app, "sam", Role::Staff).await;
    let staff = token_for(&app, staff_id, "sam", Role::Staff);

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/auth/register",
            None,
            serde_json::json!({"username": "newbie", "password": "secret"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let pending = json_body(response).await;
    let pending_id = pending["id"].as_i64().unwrap();
    assert!(pending.get("password_hash").is_none());

    // Not yet a real account
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            None,
            serde_json::json!({"username": "newbie", "password": "secret"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Approval moves the row into users; login now works
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            &format!("/api/auth/pending-users/{pending_id}/approve"),
            Some(&staff),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let profile = json_body(response).await;
    assert_eq!(profile["role"], "customer");
    assert_eq!(profile["beer_count"], 0);

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            None,
            serde_json::json!({"username": "newbie", "password": "secret"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn registration_rejects_taken_username() {
    let app = spawn_app().await;
    seed_user(&app, "carla", Role::Customer).await;

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/auth/register",
            None,
            serde_json::json!({"username": "carla", "password": "secret"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_table_number_rejected() {
    let app = spawn_app().await;
    let customer_id = seed_user(&app, "carla", Role::Customer).await;
    let token = token_for(&app, customer_id, "carla", Role::Customer);

    // Default table count is 20
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/orders",
            Some(&token),
            serde_json::json!({"table_number": 21, "quantity": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
