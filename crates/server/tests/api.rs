use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine as _;
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::{CreateUserCmd, Engine, MoneyCents};
use migration::MigratorTrait;
use server::{ServerState, router};

async fn app_with_user(balance_minor: i64) -> (Router, Arc<Engine>) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Arc::new(Engine::builder().database(db).build().await.unwrap());
    engine
        .create_user(
            CreateUserCmd::new("alice", "password", "Alice")
                .initial_balance(MoneyCents::new(balance_minor)),
        )
        .await
        .unwrap();

    let app = router(ServerState {
        engine: engine.clone(),
    });
    (app, engine)
}

fn basic(username: &str, password: &str) -> String {
    let secret = base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {secret}")
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic("alice", "password"));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn wrong_credentials_are_unauthorized() {
    let (app, _engine) = app_with_user(0).await;

    let req = Request::builder()
        .uri("/user")
        .header(header::AUTHORIZATION, basic("alice", "nope"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn storage_failure_during_login_is_a_server_error() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    let app = router(ServerState {
        engine: Arc::new(engine),
    });

    let (status, _) = send(&app, request("GET", "/user", None)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn user_can_edit_details_but_not_balance() {
    let (app, engine) = app_with_user(30_00).await;
    engine
        .create_user(CreateUserCmd::new("bob", "password", "Bob"))
        .await
        .unwrap();

    let (status, user) = send(
        &app,
        request(
            "PUT",
            "/user",
            Some(json!({ "full_name": "Alice Liddell", "age": 25, "balance_minor": 999999 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["full_name"], "Alice Liddell");
    assert_eq!(user["age"], 25);
    assert_eq!(user["username"], "alice");
    assert_eq!(user["balance_minor"], 3000);

    let (status, _) = send(&app, request("PUT", "/user", Some(json!({ "username": "bob" })))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn create_list_delete_round_trip() {
    let (app, _engine) = app_with_user(100_00).await;

    let (status, created) = send(
        &app,
        request(
            "POST",
            "/transactions",
            Some(json!({
                "kind": "outcome",
                "category": "food",
                "description": "groceries",
                "items": [
                    { "item_name": "rice", "price_minor": 1000, "quantity": 2 },
                    { "item_name": "salt", "price_minor": 500, "quantity": 1 }
                ]
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["amount_minor"], 2500);
    assert_eq!(created["balance_minor"], 7500);
    assert_eq!(created["items"][0]["subtotal_minor"], 2000);
    assert_eq!(created["items"][1]["category"], "others");

    let (status, page) = send(&app, request("GET", "/transactions?page=1&limit=10", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["meta"]["totalItems"], 1);
    assert_eq!(page["meta"]["hasNextPage"], false);
    assert_eq!(page["transactions"][0]["kind"], "outcome");
    assert_eq!(page["transactions"][0]["items"].as_array().unwrap().len(), 2);

    let id = created["id"].as_i64().unwrap();
    let (status, deleted) = send(&app, request("DELETE", &format!("/transactions/{id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["balance_minor"], 10000);

    let (status, _) = send(&app, request("DELETE", &format!("/transactions/{id}"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_requires_exactly_one_amount_source() {
    let (app, _engine) = app_with_user(100_00).await;

    for body in [
        json!({ "kind": "income" }),
        json!({
            "kind": "income",
            "amount_minor": 100,
            "items": [{ "item_name": "x", "price_minor": 100, "quantity": 1 }]
        }),
    ] {
        let (status, _) = send(&app, request("POST", "/transactions", Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn insufficient_funds_is_bad_request() {
    let (app, _engine) = app_with_user(10_00).await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/transactions",
            Some(json!({ "kind": "outcome", "amount_minor": 1001 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Insufficient funds"));

    let (_, user) = send(&app, request("GET", "/user", None)).await;
    assert_eq!(user["balance_minor"], 1000);
}

#[tokio::test]
async fn deleting_someone_elses_transaction_is_forbidden() {
    let (app, engine) = app_with_user(0).await;
    let bob = engine
        .create_user(
            CreateUserCmd::new("bob", "password", "Bob").initial_balance(MoneyCents::new(50_00)),
        )
        .await
        .unwrap();
    let bob_tx = engine
        .create_transaction(engine::CreateTransactionCmd::direct(
            bob.id,
            engine::TransactionKind::Outcome,
            MoneyCents::new(5_00),
        ))
        .await
        .unwrap();

    let (status, _) = send(
        &app,
        request("DELETE", &format!("/transactions/{}", bob_tx.id), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn financial_profile_lifecycle() {
    let (app, _engine) = app_with_user(20_00).await;

    let (status, _) = send(&app, request("GET", "/financial-profile", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, profile) = send(
        &app,
        request(
            "PUT",
            "/financial-profile",
            Some(json!({
                "monthly_income_minor": 250000,
                "financial_goals": "emergency fund",
                "risk_management": "low"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["risk_management"], "low");
    assert_eq!(profile["total_income_minor"], 0);

    send(
        &app,
        request(
            "POST",
            "/transactions",
            Some(json!({ "kind": "income", "amount_minor": 4200 })),
        ),
    )
    .await;

    let (status, summary) = send(&app, request("GET", "/financial-profile/summary", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["balance_minor"], 6200);
    assert_eq!(summary["month_income_minor"], 4200);
    assert_eq!(summary["total_income_minor"], 4200);
    assert_eq!(summary["declared_monthly_income_minor"], 250000);

    let (_, user) = send(&app, request("GET", "/user", None)).await;
    assert_eq!(user["username"], "alice");
    assert_eq!(user["financial_profile"]["financial_goals"], "emergency fund");
}

#[tokio::test]
async fn history_defaults_to_five_months() {
    let (app, _engine) = app_with_user(0).await;

    let (status, history) = send(&app, request("GET", "/stats/history", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 5);

    let (status, _) = send(&app, request("GET", "/stats/history?months=0", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
