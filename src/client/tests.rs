use chrono::NaiveDate;
use mockito::Matcher;
use rust_decimal::Decimal;

use crate::client::{DataClient, FetchError, TransactionSource};
use crate::config::models::ApiConfig;
use crate::models::TransactionType;
use crate::query::FilterState;

const LISTING_BODY: &str = r#"{
    "success": true,
    "data": [
        {"id": 1, "type": "payment", "amount": 1500, "counterparty": "Jane Smith",
         "date": "2024-01-15", "note": "Payment of 1,500 RWF to Jane Smith"},
        {"id": 2, "transaction_type": "incoming", "amount": 20000, "sender": "Alex Doe",
         "transaction_date": "2024-01-16 10:00:00", "message_body": "You have received 20000 RWF"}
    ]
}"#;

#[tokio::test]
async fn test_fetch_transactions_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/transactions")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(LISTING_BODY)
        .expect(1)
        .create_async()
        .await;

    let client = DataClient::with_base_url(&server.url()).unwrap();
    let transactions = client
        .fetch_transactions(&FilterState::default())
        .await
        .unwrap();

    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0].kind, TransactionType::Payment);
    assert_eq!(transactions[0].amount, Some(Decimal::new(1500, 0)));
    assert_eq!(transactions[1].kind, TransactionType::Incoming);
    assert_eq!(transactions[1].counterparty.as_deref(), Some("Alex Doe"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_transactions_sends_filters_in_canonical_order() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/transactions")
        .match_query(Matcher::Exact(
            "type=airtime&start_date=2024-01-01&end_date=2024-01-31&max_amount=5000&limit=100"
                .to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"success": true, "data": []}"#)
        .expect(1)
        .create_async()
        .await;

    let client = DataClient::new(&ApiConfig {
        base_url: format!("{}/", server.url()),
        limit: Some(100),
        ..ApiConfig::default()
    })
    .unwrap();

    let filters = FilterState {
        kind: Some(TransactionType::Airtime),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        end_date: NaiveDate::from_ymd_opt(2024, 1, 31),
        min_amount: None,
        max_amount: Some(Decimal::new(5000, 0)),
    };

    let transactions = client.fetch_transactions(&filters).await.unwrap();
    assert!(transactions.is_empty());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_transactions_http_error() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/transactions")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("Internal Server Error")
        .expect(1)
        .create_async()
        .await;

    let client = DataClient::with_base_url(&server.url()).unwrap();
    let result = client.fetch_transactions(&FilterState::default()).await;

    assert_eq!(result, Err(FetchError::Status(500)));
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("HTTP error with status code: 500"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_transactions_envelope_failure() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/transactions")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"success": false, "error": "invalid date range"}"#)
        .create_async()
        .await;

    let client = DataClient::with_base_url(&server.url()).unwrap();
    let result = client.fetch_transactions(&FilterState::default()).await;

    assert_eq!(result, Err(FetchError::Api("invalid date range".to_string())));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_transactions_invalid_json() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/transactions")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("not valid json")
        .create_async()
        .await;

    let client = DataClient::with_base_url(&server.url()).unwrap();
    let result = client.fetch_transactions(&FilterState::default()).await;

    assert!(result
        .unwrap_err()
        .to_string()
        .contains("JSON parsing error"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_summary_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/summary")
        .with_status(200)
        .with_body(
            r#"{"success": true, "data": {
                "by_type": [{"type": "payment", "total": 5000}, {"type": "deposit", "total": 12000.5}],
                "monthly": [{"month": "2024-01", "total": 9000, "count": 12}, {"month": "2024-02", "total": 8000.5}]
            }}"#,
        )
        .create_async()
        .await;

    let client = DataClient::with_base_url(&server.url()).unwrap();
    let summary = client.fetch_summary().await.unwrap();

    assert_eq!(summary.by_type.len(), 2);
    assert_eq!(summary.by_type[1].kind, TransactionType::Deposit);
    assert_eq!(summary.monthly[0].month, "2024-01");
    assert_eq!(summary.monthly[0].count, Some(12));
    assert_eq!(summary.monthly[1].total, Some(8000.5));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_summary_envelope_failure() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/summary")
        .with_status(200)
        .with_body(r#"{"success": false}"#)
        .create_async()
        .await;

    let client = DataClient::with_base_url(&server.url()).unwrap();
    let result = client.fetch_summary().await;

    assert_eq!(result, Err(FetchError::Api("Unknown error".to_string())));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_search_accepts_bare_array() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::UrlEncoded("query".into(), "jane smith".into()))
        .with_status(200)
        .with_body(r#"[{"type": "payment", "amount": 1500, "party": "Jane Smith", "tx_id": "TX1"}]"#)
        .create_async()
        .await;

    let client = DataClient::with_base_url(&server.url()).unwrap();
    let results = client.search("jane smith").await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id.as_deref(), Some("TX1"));
    assert_eq!(results[0].counterparty.as_deref(), Some("Jane Smith"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_connection_error() {
    let client = DataClient::with_base_url("http://127.0.0.1:1").unwrap();
    let result = client.fetch_summary().await;

    assert!(matches!(result, Err(FetchError::Network(_))));
    assert!(result.unwrap_err().to_string().contains("Network error"));
}

#[test]
fn test_user_message_mentions_region() {
    let message = FetchError::Status(502).user_message("summary data");
    assert!(message.starts_with("Failed to load summary data."));
    assert!(message.contains("502"));
}
