use bank_core::adapters::InMemoryStore;
use bank_core::{create_app, AppState};
use bigdecimal::BigDecimal;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::str::FromStr;

async fn setup_test_app() -> (String, InMemoryStore) {
    let store = InMemoryStore::new();
    let app = create_app(AppState::in_memory(store.clone()));

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], 0));
    let server = axum::Server::bind(&addr).serve(app.into_make_service());
    let actual_addr = server.local_addr();

    tokio::spawn(async move {
        server.await.unwrap();
    });

    (format!("http://{}", actual_addr), store)
}

fn dec(value: &Value) -> BigDecimal {
    BigDecimal::from_str(value.as_str().expect("decimal serialized as string")).unwrap()
}

async fn create_account(client: &reqwest::Client, base_url: &str, body: Value) -> Value {
    let res = client
        .post(format!("{}/accounts", base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

async fn fund(client: &reqwest::Client, base_url: &str, number: i64, amount: &str) {
    let res = client
        .post(format!("{}/transaction/deposit", base_url))
        .json(&json!({ "receiver_account_number": number, "amount": amount }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

async fn balance(client: &reqwest::Client, base_url: &str, number: i64) -> BigDecimal {
    let res = client
        .get(format!("{}/accounts/{}", base_url, number))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let account: Value = res.json().await.unwrap();
    dec(&account["balance"])
}

#[tokio::test]
async fn test_health_without_dependencies() {
    let (base_url, _store) = setup_test_app().await;

    let res = reqwest::get(format!("{}/health", base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_create_account_ignores_supplied_balance() {
    let (base_url, _store) = setup_test_app().await;
    let client = reqwest::Client::new();

    let account = create_account(
        &client,
        &base_url,
        json!({ "name": "Maria", "number": 1001, "special_limit": "200", "balance": "5000" }),
    )
    .await;

    assert_eq!(dec(&account["balance"]), BigDecimal::from(0));
    assert_eq!(dec(&account["special_limit"]), BigDecimal::from(200));
    assert_eq!(account["number"], 1001);
    assert!(account["id"].is_string());
}

#[tokio::test]
async fn test_duplicate_account_number_conflicts() {
    let (base_url, _store) = setup_test_app().await;
    let client = reqwest::Client::new();
    create_account(&client, &base_url, json!({ "name": "Maria", "number": 1 })).await;

    let res = client
        .post(format!("{}/accounts", base_url))
        .json(&json!({ "name": "João", "number": 1 }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_invalid_account_payloads_are_bad_requests() {
    let (base_url, _store) = setup_test_app().await;
    let client = reqwest::Client::new();

    for body in [
        json!({ "name": "", "number": 1 }),
        json!({ "name": "Maria", "number": -1 }),
        json!({ "name": "Maria", "number": 1, "special_limit": "-10" }),
        json!({ "name": "Maria", "number": 1, "nickname": "mm" }),
    ] {
        let res = client
            .post(format!("{}/accounts", base_url))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {}", body);
    }
}

#[tokio::test]
async fn test_update_account_keeps_balance() {
    let (base_url, _store) = setup_test_app().await;
    let client = reqwest::Client::new();
    let account = create_account(&client, &base_url, json!({ "name": "Maria", "number": 7 })).await;
    fund(&client, &base_url, 7, "300").await;

    let res = client
        .put(format!("{}/accounts/{}", base_url, account["id"].as_str().unwrap()))
        .json(&json!({ "name": "Maria Clara", "number": 8, "special_limit": "50", "balance": "0" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["name"], "Maria Clara");
    assert_eq!(updated["number"], 8);
    assert_eq!(dec(&updated["balance"]), BigDecimal::from(300));

    let res = client
        .get(format!("{}/accounts/7", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_unknown_account_is_not_found() {
    let (base_url, _store) = setup_test_app().await;
    let client = reqwest::Client::new();

    let res = client
        .put(format!("{}/accounts/{}", base_url, uuid::Uuid::new_v4()))
        .json(&json!({ "name": "Ghost", "number": 9 }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_withdraw_flow() {
    let (base_url, _store) = setup_test_app().await;
    let client = reqwest::Client::new();
    let account = create_account(&client, &base_url, json!({ "name": "Maria", "number": 1 })).await;
    fund(&client, &base_url, 1, "1000").await;

    let res = client
        .post(format!("{}/transaction/withdraw", base_url))
        .json(&json!({ "source_account_number": 1, "amount": "100" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let tx: Value = res.json().await.unwrap();
    assert_eq!(tx["type"], "WITHDRAW");
    assert_eq!(dec(&tx["amount"]), BigDecimal::from(100));
    assert_eq!(tx["source_account"], account["id"]);
    assert!(tx["receiver_account"].is_null());
    assert_eq!(balance(&client, &base_url, 1).await, BigDecimal::from(900));

    let res = client
        .get(format!("{}/transactions/{}", base_url, tx["id"].as_str().unwrap()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = res.json().await.unwrap();
    assert_eq!(fetched["id"], tx["id"]);
}

#[tokio::test]
async fn test_withdraw_over_limit_is_rejected_without_side_effects() {
    let (base_url, _store) = setup_test_app().await;
    let client = reqwest::Client::new();
    create_account(
        &client,
        &base_url,
        json!({ "name": "Maria", "number": 1, "special_limit": "100" }),
    )
    .await;
    fund(&client, &base_url, 1, "50").await;

    let res = client
        .post(format!("{}/transaction/withdraw", base_url))
        .json(&json!({ "source_account_number": 1, "amount": "150.01" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], 422);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("insufficient funds in account 1"));
    assert!(!message.contains("150"));
    assert_eq!(balance(&client, &base_url, 1).await, BigDecimal::from(50));

    let history: Value = client
        .get(format!("{}/accounts/1/transactions", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_transfer_flow_conserves_money() {
    let (base_url, _store) = setup_test_app().await;
    let client = reqwest::Client::new();
    let source = create_account(&client, &base_url, json!({ "name": "Maria", "number": 1 })).await;
    let receiver = create_account(&client, &base_url, json!({ "name": "João", "number": 2 })).await;
    fund(&client, &base_url, 1, "1000").await;
    fund(&client, &base_url, 2, "500").await;

    let res = client
        .post(format!("{}/transaction/transfer", base_url))
        .json(&json!({
            "source_account_number": 1,
            "receiver_account_number": 2,
            "amount": "100"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let tx: Value = res.json().await.unwrap();
    assert_eq!(tx["type"], "TRANSFER");
    assert_eq!(tx["source_account"], source["id"]);
    assert_eq!(tx["receiver_account"], receiver["id"]);

    let source_balance = balance(&client, &base_url, 1).await;
    let receiver_balance = balance(&client, &base_url, 2).await;
    assert_eq!(source_balance, BigDecimal::from(900));
    assert_eq!(receiver_balance, BigDecimal::from(600));
    assert_eq!(source_balance + receiver_balance, BigDecimal::from(1500));
}

#[tokio::test]
async fn test_transfer_to_unknown_receiver_is_not_found() {
    let (base_url, _store) = setup_test_app().await;
    let client = reqwest::Client::new();
    create_account(&client, &base_url, json!({ "name": "Maria", "number": 1 })).await;
    fund(&client, &base_url, 1, "1000").await;

    let res = client
        .post(format!("{}/transaction/transfer", base_url))
        .json(&json!({
            "source_account_number": 1,
            "receiver_account_number": 99,
            "amount": "100"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(balance(&client, &base_url, 1).await, BigDecimal::from(1000));
}

#[tokio::test]
async fn test_malformed_transaction_requests_are_bad_requests() {
    let (base_url, _store) = setup_test_app().await;
    let client = reqwest::Client::new();
    create_account(&client, &base_url, json!({ "name": "Maria", "number": 1 })).await;

    let cases = [
        ("deposit", json!({ "receiver_account_number": 1, "amount": "0" })),
        ("deposit", json!({ "receiver_account_number": 1 })),
        ("withdraw", json!({ "source_account_number": 1, "amount": "-3" })),
        ("withdraw", json!({ "source_account_number": 1, "amount": "abc" })),
        (
            "transfer",
            json!({ "source_account_number": 1, "receiver_account_number": 1, "amount": "5" }),
        ),
        (
            "transfer",
            json!({ "source_account_number": 1, "receiver_account_number": 2, "amount": "5", "memo": "x" }),
        ),
    ];

    for (operation, body) in cases {
        let res = client
            .post(format!("{}/transaction/{}", base_url, operation))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}: {}", operation, body);
    }

    assert_eq!(balance(&client, &base_url, 1).await, BigDecimal::from(0));
}

#[tokio::test]
async fn test_over_precise_amounts_are_bad_requests() {
    let (base_url, _store) = setup_test_app().await;
    let client = reqwest::Client::new();
    create_account(&client, &base_url, json!({ "name": "Maria", "number": 1 })).await;
    create_account(&client, &base_url, json!({ "name": "Joao", "number": 2 })).await;

    let cases = [
        ("deposit", json!({ "receiver_account_number": 1, "amount": "1e-20000000" })),
        ("deposit", json!({ "receiver_account_number": 1, "amount": "0.001" })),
        ("deposit", json!({ "receiver_account_number": 1, "amount": "1e+20000000" })),
        ("withdraw", json!({ "source_account_number": 1, "amount": "0.001" })),
        (
            "transfer",
            json!({ "source_account_number": 1, "receiver_account_number": 2, "amount": "1e-20000000" }),
        ),
    ];

    for (operation, body) in cases {
        let res = client
            .post(format!("{}/transaction/{}", base_url, operation))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}: {}", operation, body);
    }

    let res = client
        .post(format!("{}/accounts", base_url))
        .json(&json!({ "name": "Ana", "number": 3, "special_limit": "1e-20000000" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    fund(&client, &base_url, 1, "10.50").await;
    assert_eq!(balance(&client, &base_url, 1).await, BigDecimal::from_str("10.5").unwrap());
}

#[tokio::test]
async fn test_storage_failure_is_server_error() {
    let (base_url, store) = setup_test_app().await;
    let client = reqwest::Client::new();
    create_account(&client, &base_url, json!({ "name": "Maria", "number": 1 })).await;
    store.fail_transaction_writes(true);

    let res = client
        .post(format!("{}/transaction/deposit", base_url))
        .json(&json!({ "receiver_account_number": 1, "amount": "10" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(balance(&client, &base_url, 1).await, BigDecimal::from(0));
}

#[tokio::test]
async fn test_list_accounts_and_history() {
    let (base_url, _store) = setup_test_app().await;
    let client = reqwest::Client::new();
    create_account(&client, &base_url, json!({ "name": "B", "number": 2 })).await;
    create_account(&client, &base_url, json!({ "name": "A", "number": 1 })).await;
    fund(&client, &base_url, 1, "10").await;
    fund(&client, &base_url, 1, "20").await;

    let accounts: Value = client
        .get(format!("{}/accounts", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let numbers: Vec<i64> = accounts
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["number"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, vec![1, 2]);

    let page: Value = client
        .get(format!("{}/accounts/1/transactions?limit=1", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let page = page.as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(dec(&page[0]["amount"]), BigDecimal::from(20));

    let res = client
        .get(format!("{}/accounts/3/transactions", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
