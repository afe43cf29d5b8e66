//! End-to-end tests — ephemeral PostgreSQL, real router, in-process requests.
//!
//! Each test boots its own throwaway PostgreSQL instance. When no PostgreSQL
//! installation is on PATH the DB-backed tests skip with a note instead of
//! failing the suite.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use mealshare_api::config::ApiConfig;
use mealshare_api::{AppState, router};
use mealshare_core::db::{DbError, LocalPostgres};

fn test_config(database_url: &str) -> ApiConfig {
    ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        database_url: database_url.into(),
        jwt_secret: "test-secret".into(),
        max_connections: 5,
        acquire_timeout_secs: 5,
    }
}

/// Boot an ephemeral PostgreSQL and build the app on it. `None` when no
/// PostgreSQL installation is available.
async fn start_app() -> Option<(LocalPostgres, sqlx::PgPool, Router)> {
    let mut db = match LocalPostgres::ephemeral().await {
        Ok(db) => db,
        Err(DbError::PgConfigNotFound) => {
            eprintln!("skipping: no PostgreSQL installation on PATH");
            return None;
        }
        Err(e) => panic!("LocalPostgres::ephemeral: {e}"),
    };
    db.start().await.expect("db start");

    let config = test_config(&db.connection_url());
    let pool = mealshare_core::store::connect(&config.store_config())
        .await
        .expect("connect to ephemeral PG");
    mealshare_api::migrate(&pool).await.expect("migrations");

    let state = AppState {
        pool: pool.clone(),
        config,
    };
    Some((db, pool, router(state)))
}

/// The app with a lazy pool that never connects; for paths rejected before
/// any store access (missing credential, malformed input).
fn app_without_db() -> Router {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://localhost:5432/unreachable")
        .expect("lazy pool");
    router(AppState {
        pool,
        config: test_config("postgres://localhost:5432/unreachable"),
    })
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn register_body(first_name: &str, email: &str) -> Value {
    json!({
        "firstName": first_name,
        "lastName": "Tester",
        "street": "Teststreet 1",
        "city": "Testcity",
        "emailAddress": email,
        "password": "Secret123",
        "phoneNumber": "06-12345678",
    })
}

async fn register_and_login(app: &Router, first_name: &str, email: &str) -> (i64, String) {
    let (status, body) = send(
        app,
        "POST",
        "/api/users",
        None,
        Some(register_body(first_name, email)),
    )
    .await;
    assert_eq!(StatusCode::CREATED, status, "register: {body}");
    let user_id = body["data"]["id"].as_i64().expect("user id");

    let (status, body) = send(
        app,
        "POST",
        "/api/login",
        None,
        Some(json!({"emailAddress": email, "password": "Secret123"})),
    )
    .await;
    assert_eq!(StatusCode::OK, status, "login: {body}");
    let token = body["data"]["token"].as_str().expect("token").to_string();
    (user_id, token)
}

#[tokio::test]
async fn rejections_happen_before_any_store_access() {
    let app = app_without_db();

    // Protected operation without a credential.
    let (status, body) = send(&app, "POST", "/api/meals", None, Some(json!({}))).await;
    assert_eq!(StatusCode::UNAUTHORIZED, status);
    assert_eq!(401, body["status"]);
    assert_eq!(json!({}), body["data"]);

    // Garbage bearer token.
    let (status, _) = send(&app, "POST", "/api/meals", Some("garbage"), Some(json!({}))).await;
    assert_eq!(StatusCode::UNAUTHORIZED, status);

    // Non-numeric path id must be a validation failure, not a crash.
    let (status, body) = send(&app, "GET", "/api/meals/abc", None, None).await;
    assert_eq!(StatusCode::BAD_REQUEST, status);
    assert_eq!(400, body["status"]);

    // Malformed registration payload.
    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        None,
        Some(json!({
            "firstName": "Bad",
            "lastName": "Email",
            "emailAddress": "not-an-email",
            "password": "Secret123",
        })),
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status);
    assert_eq!("Email address is not valid", body["message"]);

    // Login with a password failing the input rules.
    let (status, _) = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({"emailAddress": "a.tester@test.com", "password": "weak"})),
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status);
}

#[tokio::test]
async fn meal_lifecycle_end_to_end() {
    let Some((mut db, _pool, app)) = start_app().await else {
        return;
    };

    let (cook_id, cook_token) = register_and_login(&app, "Ann", "a.cook@test.com").await;
    let (guest_id, guest_token) = register_and_login(&app, "Bob", "b.guest@test.com").await;

    // Duplicate email registration conflicts.
    let (status, _) = send(
        &app,
        "POST",
        "/api/users",
        None,
        Some(register_body("Ann2", "a.cook@test.com")),
    )
    .await;
    assert_eq!(StatusCode::CONFLICT, status);

    // Login answers never carry the credential digest.
    let (_, body) = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({"emailAddress": "a.cook@test.com", "password": "Secret123"})),
    )
    .await;
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("passwordHash").is_none());

    // Wrong password and unknown email stay distinct.
    let (status, _) = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({"emailAddress": "a.cook@test.com", "password": "Wrong1234"})),
    )
    .await;
    assert_eq!(StatusCode::UNAUTHORIZED, status);
    let (status, _) = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({"emailAddress": "n.obody@test.com", "password": "Secret123"})),
    )
    .await;
    assert_eq!(StatusCode::NOT_FOUND, status);

    // Create a meal; flags arrive as 0/1 and come back as booleans.
    let (status, body) = send(
        &app,
        "POST",
        "/api/meals",
        Some(&cook_token),
        Some(json!({
            "name": "Spaghetti night",
            "description": "Homemade pasta",
            "price": 15.99,
            "maxAmountOfParticipants": 5,
            "imageUrl": "https://example.com/pasta.jpg",
            "allergenes": ["gluten"],
            "isVega": 1,
            "isToTakeHome": 0,
        })),
    )
    .await;
    assert_eq!(StatusCode::CREATED, status, "create meal: {body}");
    let meal_id = body["data"]["id"].as_i64().expect("meal id");
    assert_eq!(json!(true), body["data"]["isVega"]);
    assert_eq!(json!(false), body["data"]["isToTakeHome"]);
    assert_eq!(json!(true), body["data"]["isActive"]);
    assert_eq!(json!(15.99), body["data"]["price"]);
    assert_eq!(cook_id, body["data"]["cookId"].as_i64().unwrap());

    // Round trip through the aggregated read.
    let (status, body) = send(&app, "GET", &format!("/api/meals/{meal_id}"), None, None).await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(json!(15.99), body["data"]["meal"]["price"]);
    assert_eq!(json!(["gluten"]), body["data"]["meal"]["allergenes"]);
    assert_eq!(cook_id, body["data"]["cook"]["id"].as_i64().unwrap());
    assert!(body["data"]["cook"].get("password").is_none());
    assert_eq!(json!([]), body["data"]["participants"]);

    // The guest signs up; a second sign-up conflicts and the roster holds.
    let participate_uri = format!("/api/meals/{meal_id}/participate");
    let (status, _) = send(&app, "POST", &participate_uri, Some(&guest_token), None).await;
    assert_eq!(StatusCode::OK, status);
    let (status, _) = send(&app, "POST", &participate_uri, Some(&guest_token), None).await;
    assert_eq!(StatusCode::CONFLICT, status);

    let roster_uri = format!("/api/meals/{meal_id}/participants");
    let (status, body) = send(&app, "GET", &roster_uri, None, None).await;
    assert_eq!(StatusCode::OK, status);
    let roster = body["data"].as_array().expect("roster array");
    assert_eq!(1, roster.len());
    assert_eq!(guest_id, roster[0]["id"].as_i64().unwrap());
    assert!(roster[0].get("password").is_none());
    assert!(roster[0].get("passwordHash").is_none());

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/meals/{meal_id}/participants/{guest_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!("Bob", body["data"]["firstName"]);

    // Non-owner mutations are forbidden and change nothing.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/meals/{meal_id}"),
        Some(&guest_token),
        Some(json!({"name": "Hijacked"})),
    )
    .await;
    assert_eq!(StatusCode::FORBIDDEN, status);
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/meals/{meal_id}"),
        Some(&guest_token),
        None,
    )
    .await;
    assert_eq!(StatusCode::FORBIDDEN, status);
    let (_, body) = send(&app, "GET", &format!("/api/meals/{meal_id}"), None, None).await;
    assert_eq!("Spaghetti night", body["data"]["meal"]["name"]);

    // A non-owner probing a nonexistent id learns nothing but absence.
    let (status, _) = send(
        &app,
        "PUT",
        "/api/meals/999999",
        Some(&guest_token),
        Some(json!({"name": "Ghost"})),
    )
    .await;
    assert_eq!(StatusCode::NOT_FOUND, status);

    // Owner partial update touches only the supplied fields.
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/meals/{meal_id}"),
        Some(&cook_token),
        Some(json!({"price": 12.5})),
    )
    .await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(json!(12.5), body["data"]["price"]);
    assert_eq!("Spaghetti night", body["data"]["name"]);
    assert_eq!(json!(5), body["data"]["maxAmountOfParticipants"]);

    // Unregister removes exactly the one roster row.
    let (status, _) = send(&app, "DELETE", &participate_uri, Some(&guest_token), None).await;
    assert_eq!(StatusCode::OK, status);
    let (status, body) = send(&app, "GET", &roster_uri, None, None).await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(json!([]), body["data"]);

    // A second unregister reports the missing participation, not the meal.
    let (status, body) = send(&app, "DELETE", &participate_uri, Some(&guest_token), None).await;
    assert_eq!(StatusCode::NOT_FOUND, status);
    let message = body["message"].as_str().unwrap_or_default();
    assert!(message.contains("participation"), "message: {message}");

    // The owner deletes the meal; it is gone.
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/meals/{meal_id}"),
        Some(&cook_token),
        None,
    )
    .await;
    assert_eq!(StatusCode::OK, status);
    let (status, _) = send(&app, "GET", &format!("/api/meals/{meal_id}"), None, None).await;
    assert_eq!(StatusCode::NOT_FOUND, status);

    db.stop().await.expect("db stop");
}

#[tokio::test]
async fn capacity_is_a_hard_invariant() {
    let Some((mut db, _pool, app)) = start_app().await else {
        return;
    };

    let (_, cook_token) = register_and_login(&app, "Host", "h.host@test.com").await;
    let (_, first_token) = register_and_login(&app, "First", "f.first@test.com").await;
    let (_, second_token) = register_and_login(&app, "Second", "s.second@test.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/meals",
        Some(&cook_token),
        Some(json!({
            "name": "Tiny dinner",
            "description": "One seat only",
            "price": 9.0,
            "maxAmountOfParticipants": 1,
            "imageUrl": "https://example.com/dinner.jpg",
        })),
    )
    .await;
    assert_eq!(StatusCode::CREATED, status, "create meal: {body}");
    let meal_id = body["data"]["id"].as_i64().expect("meal id");

    let participate_uri = format!("/api/meals/{meal_id}/participate");
    let (status, _) = send(&app, "POST", &participate_uri, Some(&first_token), None).await;
    assert_eq!(StatusCode::OK, status);

    // The seat is taken; the next sign-up is rejected and the roster holds.
    let (status, body) = send(&app, "POST", &participate_uri, Some(&second_token), None).await;
    assert_eq!(StatusCode::CONFLICT, status, "overflow sign-up: {body}");

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/meals/{meal_id}/participants"),
        None,
        None,
    )
    .await;
    assert_eq!(1, body["data"].as_array().expect("roster").len());

    db.stop().await.expect("db stop");
}

#[tokio::test]
async fn user_mutations_are_owner_only() {
    let Some((mut db, _pool, app)) = start_app().await else {
        return;
    };

    let (alice_id, _alice_token) = register_and_login(&app, "Alice", "a.alice@test.com").await;
    let (_bob_id, bob_token) = register_and_login(&app, "Bob", "b.bob@test.com").await;

    // Another user's account cannot be updated or deleted.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/users/{alice_id}"),
        Some(&bob_token),
        Some(json!({"city": "Elsewhere"})),
    )
    .await;
    assert_eq!(StatusCode::FORBIDDEN, status);
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/users/{alice_id}"),
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(StatusCode::FORBIDDEN, status);

    // A nonexistent account reads as absent, also for non-owners.
    let (status, _) = send(
        &app,
        "PUT",
        "/api/users/999999",
        Some(&bob_token),
        Some(json!({"city": "Elsewhere"})),
    )
    .await;
    assert_eq!(StatusCode::NOT_FOUND, status);

    // The profile endpoint answers the caller's own account.
    let (status, body) = send(&app, "GET", "/api/users/profile", Some(&bob_token), None).await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!("Bob", body["data"]["firstName"]);
    assert!(body["data"].get("passwordHash").is_none());

    db.stop().await.expect("db stop");
}

#[tokio::test]
async fn failed_statements_release_their_connections() {
    let Some((mut db, pool, app)) = start_app().await else {
        return;
    };

    // Far more failing statements than the pool has slots (capacity 5). If any
    // error path held its connection, the healthy request below would time out.
    for _ in 0..20 {
        let result = sqlx::query("SELECT no_such_column FROM users")
            .fetch_all(&pool)
            .await;
        assert!(result.is_err());
    }

    let (status, _) = send(&app, "GET", "/api/meals", None, None).await;
    assert_eq!(StatusCode::OK, status);

    db.stop().await.expect("db stop");
}
