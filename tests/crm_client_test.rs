use std::time::Duration;

use httpmock::prelude::*;
use leadintake::{CrmClient, CrmError, LeadCandidate};
use serde_json::{json, Map, Value};

fn lead() -> LeadCandidate {
    LeadCandidate {
        enq_id: "12345".to_string(),
        firstnm: "Rahul".to_string(),
        email: "rahul@example.com".to_string(),
        mobile: "9876543210".to_string(),
    }
}

fn client(server: &MockServer) -> CrmClient {
    CrmClient::new(
        &server.url("/EnquiryDetails/AddLead"),
        &server.url("/EnquiryDetails/UpdateLead"),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_add_lead_posts_wire_names() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/EnquiryDetails/AddLead")
                .header("content-type", "application/json")
                .json_body(json!({
                    "Enq_Id": "12345",
                    "firstnm": "Rahul",
                    "email": "rahul@example.com",
                    "mobile": "9876543210"
                }));
            then.status(200).json_body(json!({"status": "Success"}));
        })
        .await;

    let response = client(&server).add_lead(&lead()).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, json!({"status": "Success"}));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_json_success_body_is_kept_as_text() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/EnquiryDetails/AddLead");
            then.status(200).body("Saved");
        })
        .await;

    let response = client(&server).add_lead(&lead()).await.unwrap();
    assert_eq!(response.body, Value::String("Saved".to_string()));
}

#[tokio::test]
async fn test_error_status_is_upstream() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/EnquiryDetails/AddLead");
            then.status(500).body("database down");
        })
        .await;

    let err = client(&server).add_lead(&lead()).await.unwrap_err();
    match err {
        CrmError::Upstream { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "database down");
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_crm_is_unavailable() {
    let client = CrmClient::new(
        "http://127.0.0.1:1/AddLead",
        "http://127.0.0.1:1/UpdateLead",
        Duration::from_secs(2),
    )
    .unwrap();

    let err = client.add_lead(&lead()).await.unwrap_err();
    assert!(matches!(err, CrmError::Unavailable(_)));
}

#[tokio::test]
async fn test_update_lead_puts_to_id_path() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/EnquiryDetails/UpdateLead/E-77")
                .json_body(json!({"mobile": "9123456780"}));
            then.status(200).json_body(json!({"status": "Updated"}));
        })
        .await;

    let mut fields = Map::new();
    fields.insert("mobile".to_string(), json!("9123456780"));

    let response = client(&server).update_lead("E-77", &fields).await.unwrap();
    assert_eq!(response.body["status"], "Updated");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_slow_crm_times_out_as_unavailable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/EnquiryDetails/AddLead");
            then.status(200)
                .json_body(json!({"status": "Success"}))
                .delay(Duration::from_secs(3));
        })
        .await;

    let client = CrmClient::new(
        &server.url("/EnquiryDetails/AddLead"),
        &server.url("/EnquiryDetails/UpdateLead"),
        Duration::from_secs(1),
    )
    .unwrap();

    let err = client.add_lead(&lead()).await.unwrap_err();
    match err {
        CrmError::Unavailable(detail) => assert!(detail.contains("timed out"), "{}", detail),
        other => panic!("expected unavailable error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_status_with_empty_body_keeps_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/EnquiryDetails/UpdateLead/E-1");
            then.status(404);
        })
        .await;

    let err = client(&server)
        .update_lead("E-1", &Map::new())
        .await
        .unwrap_err();
    assert!(matches!(err, CrmError::Upstream { status: 404, ref body } if body.is_empty()));
}
