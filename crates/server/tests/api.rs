use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine as _;
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use serde_json::{Value, json};
use tower::ServiceExt;

use migration::MigratorTrait;

async fn router_with_users() -> (Router, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for (id, name, email) in [
        ("u-alice", "Alice", "alice@example.com"),
        ("u-bob", "Bob", "bob@example.com"),
    ] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (id, name, email, password, created_at) VALUES (?, ?, ?, ?, ?)",
            vec![
                id.into(),
                name.into(),
                email.into(),
                "password".into(),
                Utc::now().into(),
            ],
        ))
        .await
        .unwrap();
    }

    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (server::router_for_state(engine, db.clone()), db)
}

fn basic_auth(email: &str, password: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{email}:{password}"));
    format!("Basic {encoded}")
}

fn request(method: &str, uri: &str, user: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(email) = user {
        builder = builder.header(header::AUTHORIZATION, basic_auth(email, "password"));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(router: &Router, req: Request<Body>) -> axum::response::Response {
    router.clone().oneshot(req).await.unwrap()
}

async fn create_project(router: &Router, owner: &str) -> String {
    let res = send(
        router,
        request(
            "POST",
            "/projects",
            Some(owner),
            Some(json!({ "name": "Runway", "description": "burn tracking", "currency": "USD" })),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = json_body(res).await;
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn requests_without_credentials_are_rejected() {
    let (router, _db) = router_with_users().await;

    let res = send(&router, request("GET", "/projects", None, None)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let mut bad = request("GET", "/projects", None, None);
    bad.headers_mut().insert(
        header::AUTHORIZATION,
        basic_auth("alice@example.com", "wrong").parse().unwrap(),
    );
    let res = send(&router, bad).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn project_lifecycle_over_http() {
    let (router, _db) = router_with_users().await;
    let project_id = create_project(&router, "alice@example.com").await;

    // Owner sees it; Bob does not until invited.
    let res = send(
        &router,
        request(
            "GET",
            &format!("/projects/{project_id}"),
            Some("alice@example.com"),
            None,
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    let project: server::types::project::ProjectView = serde_json::from_value(body).unwrap();
    assert_eq!(project.currency, api_types::Currency::Usd);
    assert!(project.budget_minor.is_none());
    assert_eq!(project.owner_id, "u-alice");

    let res = send(
        &router,
        request(
            "GET",
            &format!("/projects/{project_id}"),
            Some("bob@example.com"),
            None,
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = send(
        &router,
        request(
            "POST",
            &format!("/projects/{project_id}/members"),
            Some("alice@example.com"),
            Some(json!({ "email": "bob@example.com" })),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = send(
        &router,
        request(
            "GET",
            &format!("/projects/{project_id}/members"),
            Some("bob@example.com"),
            None,
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["members"].as_array().unwrap().len(), 2);

    // Unknown invitee: no account, 404.
    let res = send(
        &router,
        request(
            "POST",
            &format!("/projects/{project_id}/members"),
            Some("alice@example.com"),
            Some(json!({ "email": "ghost@example.com" })),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Duplicate invite conflicts.
    let res = send(
        &router,
        request(
            "POST",
            &format!("/projects/{project_id}/members"),
            Some("alice@example.com"),
            Some(json!({ "email": "bob@example.com" })),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn costs_and_stats_over_http() {
    let (router, _db) = router_with_users().await;
    let project_id = create_project(&router, "alice@example.com").await;
    let res = send(
        &router,
        request(
            "POST",
            &format!("/projects/{project_id}/members"),
            Some("alice@example.com"),
            Some(json!({ "email": "bob@example.com" })),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = send(
        &router,
        request(
            "POST",
            &format!("/projects/{project_id}/costs"),
            Some("alice@example.com"),
            Some(json!({
                "amount_minor": 10000,
                "category": "Software",
                "description": "Team licenses",
                "occurred_on": "2026-08-01",
                "split": { "mode": "equal", "participants": ["u-alice", "u-bob"] }
            })),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let cost_id = json_body(res).await["id"].as_str().unwrap().to_string();

    let res = send(
        &router,
        request(
            "POST",
            &format!("/projects/{project_id}/costs"),
            Some("bob@example.com"),
            Some(json!({
                "amount_minor": 5000,
                "category": "Marketing",
                "description": "Ads",
                "occurred_on": "2026-08-02",
                "status": "tentative",
                "split": {
                    "mode": "percentage",
                    "shares": [
                        { "user_id": "u-alice", "percent": 60.0 },
                        { "user_id": "u-bob", "percent": 40.0 }
                    ]
                }
            })),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let tentative_id = json_body(res).await["id"].as_str().unwrap().to_string();

    // Split detail: equal shares for the first cost.
    let res = send(
        &router,
        request(
            "GET",
            &format!("/projects/{project_id}/costs/{cost_id}"),
            Some("bob@example.com"),
            None,
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    let splits = body["splits"].as_array().unwrap();
    assert_eq!(splits.len(), 2);
    let total: i64 = splits
        .iter()
        .map(|s| s["amount_minor"].as_i64().unwrap())
        .sum();
    assert_eq!(total, 10000);

    // Splits that do not sum to the amount are rejected before any write.
    let res = send(
        &router,
        request(
            "POST",
            &format!("/projects/{project_id}/costs"),
            Some("alice@example.com"),
            Some(json!({
                "amount_minor": 5000,
                "category": "Legal",
                "description": "Review",
                "occurred_on": "2026-08-03",
                "split": {
                    "mode": "exact",
                    "shares": [
                        { "user_id": "u-alice", "amount_minor": 1000 },
                        { "user_id": "u-bob", "amount_minor": 1000 }
                    ]
                }
            })),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Tentative → final exactly once.
    let res = send(
        &router,
        request(
            "POST",
            &format!("/projects/{project_id}/costs/{tentative_id}/finalize"),
            Some("alice@example.com"),
            None,
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = send(
        &router,
        request(
            "POST",
            &format!("/projects/{project_id}/costs/{tentative_id}/finalize"),
            Some("alice@example.com"),
            None,
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Budget + allocations + stats.
    let res = send(
        &router,
        request(
            "PATCH",
            &format!("/projects/{project_id}/budget"),
            Some("alice@example.com"),
            Some(json!({ "budget_minor": 100000 })),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    for (name, amount) in [("MVP build", 40000), ("Compliance", 30000)] {
        let res = send(
            &router,
            request(
                "POST",
                &format!("/projects/{project_id}/allocations"),
                Some("alice@example.com"),
                Some(json!({ "name": name, "amount_minor": amount })),
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = send(
        &router,
        request(
            "GET",
            &format!("/projects/{project_id}/stats"),
            Some("alice@example.com"),
            None,
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["total_spent_minor"].as_i64().unwrap(), 15000);
    assert_eq!(body["tentative_minor"].as_i64().unwrap(), 0);
    assert_eq!(body["variance"]["allocated_minor"].as_i64().unwrap(), 70000);
    assert_eq!(body["variance"]["remaining_minor"].as_i64().unwrap(), 30000);
    assert_eq!(body["variance"]["over_budget"], false);
    assert_eq!(body["daily"].as_array().unwrap().len(), 2);

    // Costs list comes back newest first.
    let res = send(
        &router,
        request(
            "GET",
            &format!("/projects/{project_id}/costs?limit=10"),
            Some("alice@example.com"),
            None,
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    let costs = body["costs"].as_array().unwrap();
    assert_eq!(costs.len(), 2);
    assert_eq!(costs[0]["occurred_on"], "2026-08-02");
    assert_eq!(costs[1]["occurred_on"], "2026-08-01");
}
