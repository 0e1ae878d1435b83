//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Datelike, NaiveDate, Utc};
use http_body_util::BodyExt;
use tally_core::models::{Category, NewBudget, NewTransaction};
use tower::ServiceExt;

fn setup_test_app() -> Router {
    let db = Database::in_memory().unwrap();
    create_router(db, None, ServerConfig::default())
}

/// Router plus a handle on its database for seeding and assertions
fn setup_test_app_with_db() -> (Router, Database) {
    let db = Database::in_memory().unwrap();
    let app = create_router(db.clone(), None, ServerConfig::default());
    (app, db)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn seed(db: &Database, amount: f64, date: &str, description: &str, category: Category) -> i64 {
    db.create_transaction(&NewTransaction {
        amount,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        description: description.to_string(),
        category,
    })
    .unwrap()
    .id
}

// ========== Health ==========

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["health"], "ok");
}

#[tokio::test]
async fn test_security_headers() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/health")).await.unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers.get("content-security-policy").is_some());
}

// ========== Transaction API Tests ==========

#[tokio::test]
async fn test_create_transaction() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "amount": 42.5,
        "date": "2025-03-14",
        "description": "Groceries",
        "category": "Food"
    });

    let response = app
        .oneshot(json_request("POST", "/api/transactions", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = get_body_json(response).await;
    let tx = &json["transaction"];
    assert!(tx["id"].as_i64().unwrap() > 0);
    assert_eq!(tx["amount"], 42.5);
    assert_eq!(tx["date"], "2025-03-14");
    assert_eq!(tx["category"], "Food");
    assert!(tx.get("createdAt").is_some());
}

#[tokio::test]
async fn test_create_transaction_defaults() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "amount": 9.99,
        "description": "Something"
    });

    let response = app
        .oneshot(json_request("POST", "/api/transactions", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = get_body_json(response).await;
    assert_eq!(json["transaction"]["category"], "Others");
    assert_eq!(
        json["transaction"]["date"],
        Utc::now().date_naive().to_string()
    );
}

#[tokio::test]
async fn test_create_transaction_accepts_timestamp_date() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "amount": 12.0,
        "date": "2025-01-05T10:30:00.000Z",
        "description": "Cinema",
        "category": "entertainment"
    });

    let response = app
        .oneshot(json_request("POST", "/api/transactions", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = get_body_json(response).await;
    assert_eq!(json["transaction"]["date"], "2025-01-05");
    assert_eq!(json["transaction"]["category"], "Entertainment");
}

#[tokio::test]
async fn test_create_transaction_validation() {
    let (app, db) = setup_test_app_with_db();

    let cases = [
        serde_json::json!({"amount": -5.0, "description": "Refund"}),
        serde_json::json!({"amount": 0.0, "description": "Nothing"}),
        serde_json::json!({"amount": 5.0, "description": "ab"}),
        serde_json::json!({"amount": 5.0, "description": "Flight", "category": "Travel"}),
        serde_json::json!({"amount": 5.0, "description": "Flight", "date": "next tuesday"}),
        serde_json::json!({"description": "No amount"}),
    ];

    for body in cases {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/transactions", body.clone()))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "expected 400 for {}",
            body
        );
        let json = get_body_json(response).await;
        assert!(json["error"].is_string());
    }

    assert_eq!(db.count_transactions().unwrap(), 0);
}

#[tokio::test]
async fn test_create_transaction_invalid_json() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/transactions")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_transactions_by_month() {
    let (app, db) = setup_test_app_with_db();
    seed(&db, 50.0, "2025-01-05", "Groceries", Category::Food);
    seed(&db, 30.0, "2025-01-10", "Takeaway", Category::Food);
    seed(&db, 20.0, "2025-02-01", "Parking", Category::Rent);

    let response = app
        .clone()
        .oneshot(get("/api/transactions?month=1&year=2025"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let transactions = json["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0]["date"], "2025-01-10");

    // Path form of the month selector
    let response = app
        .clone()
        .oneshot(get("/api/transactions/month/2?year=2025"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["transactions"].as_array().unwrap().len(), 1);

    // 0 selects everything
    let response = app
        .oneshot(get("/api/transactions/month/0"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["transactions"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_transactions_invalid_month() {
    let app = setup_test_app();

    for uri in [
        "/api/transactions/month/13",
        "/api/transactions/month/abc",
        "/api/transactions?month=-1",
        "/api/transactions?month=1&year=abc",
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let json = get_body_json(response).await;
        assert!(json["error"]
            .as_str()
            .unwrap()
            .contains("Invalid"));
    }
}

#[tokio::test]
async fn test_get_update_delete_transaction() {
    let (app, db) = setup_test_app_with_db();
    let id = seed(&db, 20.0, "2025-04-01", "Bus pass", Category::Transport);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/transactions/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["transaction"]["description"], "Bus pass");

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/transactions/{}", id),
            serde_json::json!({"amount": 25.0, "category": "Others"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["transaction"]["amount"], 25.0);
    assert_eq!(json["transaction"]["category"], "Others");
    assert_eq!(json["transaction"]["description"], "Bus pass");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/transactions/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["success"], true);

    assert!(db.get_transaction(id).unwrap().is_none());
}

#[tokio::test]
async fn test_update_transaction_rejects_invalid_merge() {
    let (app, db) = setup_test_app_with_db();
    let id = seed(&db, 20.0, "2025-04-01", "Bus pass", Category::Transport);

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/transactions/{}", id),
            serde_json::json!({"description": "x"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        db.get_transaction(id).unwrap().unwrap().description,
        "Bus pass"
    );
}

#[tokio::test]
async fn test_missing_transaction_is_404() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(get("/api/transactions/999"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/transactions/999",
            serde_json::json!({"amount": 1.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/transactions/999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = get_body_json(response).await;
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_non_numeric_transaction_id_is_json_400() {
    let app = setup_test_app();

    let requests = [
        get("/api/transactions/abc"),
        json_request(
            "PUT",
            "/api/transactions/abc",
            serde_json::json!({"amount": 1.0}),
        ),
        Request::builder()
            .method("DELETE")
            .uri("/api/transactions/abc")
            .body(Body::empty())
            .unwrap(),
    ];

    for request in requests {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        let json = get_body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("abc"));
    }
}

// ========== Summary API Tests ==========

#[tokio::test]
async fn test_summary_for_month() {
    let (app, db) = setup_test_app_with_db();
    seed(&db, 50.0, "2025-01-05", "Groceries", Category::Food);
    seed(&db, 30.0, "2025-01-10", "Takeaway", Category::Food);
    seed(&db, 20.0, "2025-02-01", "Parking", Category::Rent);

    let response = app
        .oneshot(get("/api/summary?month=1&year=2025"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["totalExpenses"], 80.0);

    let breakdown = json["categoryBreakdown"].as_array().unwrap();
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0]["category"], "Food");
    assert_eq!(breakdown[0]["total"], 80.0);

    assert_eq!(json["recentTransactions"].as_array().unwrap().len(), 2);

    let monthly = json["monthlyExpenses"].as_array().unwrap();
    assert_eq!(monthly.len(), 1);
    assert_eq!(monthly[0]["month"], 1);
    assert_eq!(monthly[0]["year"], 2025);
    assert_eq!(monthly[0]["total"], 80.0);
}

#[tokio::test]
async fn test_summary_all_time() {
    let (app, db) = setup_test_app_with_db();
    seed(&db, 50.0, "2025-01-05", "Groceries", Category::Food);
    seed(&db, 20.0, "2024-12-01", "Parking", Category::Rent);

    let response = app.oneshot(get("/api/summary")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["totalExpenses"], 70.0);

    let monthly = json["monthlyExpenses"].as_array().unwrap();
    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly[0]["year"], 2024);
    assert_eq!(monthly[0]["month"], 12);
    assert_eq!(monthly[1]["year"], 2025);
}

#[tokio::test]
async fn test_summary_empty_month_defaults_to_current_year() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/summary?month=6")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["totalExpenses"], 0.0);
    assert!(json["categoryBreakdown"].as_array().unwrap().is_empty());
    assert!(json["recentTransactions"].as_array().unwrap().is_empty());
    assert_eq!(json["monthlyExpenses"][0]["year"], Utc::now().year());
    assert_eq!(json["monthlyExpenses"][0]["total"], 0.0);
}

#[tokio::test]
async fn test_summary_invalid_month() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/summary?month=13")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Budget API Tests ==========

#[tokio::test]
async fn test_upsert_single_budget() {
    let (app, db) = setup_test_app_with_db();

    let body = serde_json::json!({
        "category": "Food",
        "limit": 100.0,
        "month": 1,
        "year": 2025
    });

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/budgets", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = get_body_json(response).await;
    assert_eq!(json["budget"]["category"], "Food");
    assert_eq!(json["budget"]["limit"], 100.0);

    // Same key replaces the limit
    let body = serde_json::json!({
        "category": "Food",
        "limit": 150.0,
        "month": 1,
        "year": 2025
    });
    let response = app
        .oneshot(json_request("POST", "/api/budgets", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let budgets = db.list_budgets(1, 2025).unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].limit, 150.0);
}

#[tokio::test]
async fn test_upsert_budget_batch() {
    let (app, db) = setup_test_app_with_db();

    let body = serde_json::json!({
        "budgets": [
            {"category": "Food", "limit": 200.0, "month": 3, "year": 2025},
            {"category": "Rent", "limit": 900.0, "month": 3, "year": 2025}
        ]
    });

    let response = app
        .oneshot(json_request("POST", "/api/budgets", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = get_body_json(response).await;
    assert_eq!(json["upserted"], 2);
    assert_eq!(json["budgets"].as_array().unwrap().len(), 2);
    assert_eq!(db.list_budgets(3, 2025).unwrap().len(), 2);
}

#[tokio::test]
async fn test_upsert_budget_batch_repeated_key() {
    let (app, db) = setup_test_app_with_db();

    let body = serde_json::json!({
        "budgets": [
            {"category": "Food", "limit": 100.0, "month": 1, "year": 2025},
            {"category": "Food", "limit": 150.0, "month": 1, "year": 2025}
        ]
    });

    let response = app
        .oneshot(json_request("POST", "/api/budgets", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = get_body_json(response).await;
    assert_eq!(json["upserted"], 1);
    assert_eq!(json["budgets"].as_array().unwrap().len(), 1);
    assert_eq!(json["budgets"][0]["limit"], 150.0);
    assert_eq!(db.count_budgets().unwrap(), 1);
}

#[tokio::test]
async fn test_upsert_budget_batch_rejects_whole_batch() {
    let (app, db) = setup_test_app_with_db();

    let body = serde_json::json!({
        "budgets": [
            {"category": "Food", "limit": 200.0, "month": 3, "year": 2025},
            {"category": "Rent", "limit": -1.0, "month": 3, "year": 2025}
        ]
    });

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/budgets", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(db.list_budgets(3, 2025).unwrap().is_empty());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/budgets",
            serde_json::json!({"budgets": []}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upsert_budget_validation() {
    let app = setup_test_app();

    let cases = [
        serde_json::json!({"category": "Food", "limit": 10.0, "month": 13, "year": 2025}),
        serde_json::json!({"category": "Travel", "limit": 10.0, "month": 1, "year": 2025}),
        serde_json::json!({"category": "Food", "limit": 10.0, "year": 2025}),
        serde_json::json!({"category": "Food", "month": 1, "year": 2025}),
    ];

    for body in cases {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/budgets", body.clone()))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "expected 400 for {}",
            body
        );
    }
}

#[tokio::test]
async fn test_budget_routes_by_path() {
    let (app, db) = setup_test_app_with_db();

    // Month and year come from the path when the body leaves them out
    let body = serde_json::json!({
        "budgets": [
            {"category": "Transport", "limit": 60.0},
            {"category": "Food", "limit": 250.0}
        ]
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/budgets/5/2025", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(db.list_budgets(5, 2025).unwrap().len(), 2);

    let response = app
        .clone()
        .oneshot(get("/api/budgets/5/2025"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let budgets = json["budgets"].as_array().unwrap();
    assert_eq!(budgets.len(), 2);
    // Ordered by category
    assert_eq!(budgets[0]["category"], "Food");
    assert_eq!(budgets[1]["category"], "Transport");

    let response = app
        .oneshot(get("/api/budgets/13/2025"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_budgets_query() {
    let (app, db) = setup_test_app_with_db();
    db.upsert_budget(&NewBudget {
        category: Category::Housing,
        limit: 300.0,
        month: 2,
        year: 2025,
    })
    .unwrap();

    let response = app
        .clone()
        .oneshot(get("/api/budgets?month=2&year=2025"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["budgets"].as_array().unwrap().len(), 1);
    assert_eq!(json["budgets"][0]["category"], "Housing");

    // Missing parameters give an empty list rather than an error
    let response = app.oneshot(get("/api/budgets?month=2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json["budgets"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_budget_comparison() {
    let (app, db) = setup_test_app_with_db();
    seed(&db, 80.0, "2025-01-12", "Dinner out", Category::Food);
    db.upsert_budget(&NewBudget {
        category: Category::Food,
        limit: 50.0,
        month: 1,
        year: 2025,
    })
    .unwrap();

    let response = app
        .clone()
        .oneshot(get("/api/budgets/comparison?month=1&year=2025"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["month"], 1);
    assert_eq!(json["year"], 2025);
    assert_eq!(json["totalLimit"], 50.0);
    assert_eq!(json["totalSpent"], 80.0);
    assert_eq!(json["remaining"], -30.0);

    let row = &json["rows"][0];
    assert_eq!(row["category"], "Food");
    assert_eq!(row["percentage"], 100.0);
    assert_eq!(row["actualPercentage"], 160.0);
    assert_eq!(row["overBudget"], true);

    let over = &json["overBudget"][0];
    assert_eq!(over["overBy"], 30.0);
    assert_eq!(over["overPercentage"], 60.0);

    let response = app
        .oneshot(get("/api/budgets/comparison?month=0&year=2025"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Error Mapping ==========

#[test]
fn test_core_errors_map_to_status_codes() {
    let err: AppError = tally_core::Error::InvalidData("bad".to_string()).into();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    let err: AppError = tally_core::Error::NotFound("transaction 1".to_string()).into();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_server_config_origins() {
    let config = ServerConfig::with_origins("http://localhost:3000, https://tally.example ,");
    assert_eq!(
        config.allowed_origins,
        vec![
            "http://localhost:3000".to_string(),
            "https://tally.example".to_string()
        ]
    );
    assert!(ServerConfig::default().allowed_origins.is_empty());
}
