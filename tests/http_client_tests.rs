//! Integration tests for the HTTP transport.
//!
//! These tests run the client against a local mock server and verify the
//! default headers, status mapping, body parsing and retry behavior.

use sendgrid_contacts::clients::{HttpClient, HttpMethod, HttpRequest, RestClient};
use sendgrid_contacts::{ApiKey, BaseUrl, ContactsConfig, HttpError, RestError};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ContactsConfig {
    ContactsConfig::builder()
        .api_key(ApiKey::new("SG.test-key").unwrap())
        .base_url(BaseUrl::new(format!("{}/v3", server.uri())).unwrap())
        .user_agent_prefix("contacts-tests")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_request_sends_auth_and_json_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/contactdb/lists"))
        .and(header("Authorization", "Bearer SG.test-key"))
        .and(header("Content-Type", "application/json"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"lists": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server)).unwrap();
    let request = HttpRequest::builder(HttpMethod::Get, "contactdb/lists")
        .build()
        .unwrap();

    let response = assert_ok!(client.request(request).await);
    assert_eq!(response.code, 200);
    assert_eq!(response.body, json!({"lists": []}));
}

#[tokio::test]
async fn test_user_agent_carries_prefix() {
    let server = MockServer::start().await;
    let client = HttpClient::new(&config_for(&server)).unwrap();

    let user_agent = &client.default_headers()["User-Agent"];
    assert!(user_agent.starts_with("contacts-tests | SendGrid Contacts Library v"));
}

#[tokio::test]
async fn test_query_and_body_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/contactdb/lists"))
        .and(query_param("dry_run", "true"))
        .and(body_json(json!({"name": "newsletter"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1, "name": "newsletter"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server)).unwrap();
    let request = HttpRequest::builder(HttpMethod::Post, "contactdb/lists")
        .query_param("dry_run", "true")
        .body(json!({"name": "newsletter"}))
        .build()
        .unwrap();

    let response = assert_ok!(client.request(request).await);
    assert_eq!(response.code, 201);
}

#[tokio::test]
async fn test_error_status_maps_to_response_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/contactdb/lists"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [{"field": "name", "message": "Returned if list name is a duplicate"}]
        })))
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server)).unwrap();
    let request = HttpRequest::builder(HttpMethod::Post, "contactdb/lists")
        .body(json!({"name": "dup"}))
        .build()
        .unwrap();

    let error = assert_err!(client.request(request).await);
    assert_eq!(error.status(), Some(400));
    match error {
        HttpError::Response(e) => {
            assert_eq!(e.code, 400);
            assert!(e.message.contains("duplicate"));
        }
        other => panic!("expected response error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_error_body_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/contactdb/lists"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server)).unwrap();
    let request = HttpRequest::builder(HttpMethod::Get, "contactdb/lists")
        .build()
        .unwrap();

    let error = assert_err!(client.request(request).await);
    assert_eq!(error.status(), Some(502));
    assert!(error.to_string().contains("Bad Gateway"));
}

#[tokio::test]
async fn test_invalid_json_on_success_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/contactdb/recipients/count"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server)).unwrap();
    let request = HttpRequest::builder(HttpMethod::Get, "contactdb/recipients/count")
        .build()
        .unwrap();

    let error = assert_err!(client.request(request).await);
    assert!(matches!(error, HttpError::InvalidJson { code: 200, .. }));
}

#[tokio::test]
async fn test_empty_success_body_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v3/contactdb/lists/7"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server)).unwrap();
    let request = HttpRequest::builder(HttpMethod::Delete, "contactdb/lists/7")
        .build()
        .unwrap();

    let response = assert_ok!(client.request(request).await);
    assert!(response.body.is_null());
}

#[tokio::test]
async fn test_rate_limit_headers_are_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/contactdb/lists"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-RateLimit-Limit", "500")
                .insert_header("X-RateLimit-Remaining", "499")
                .insert_header("X-RateLimit-Reset", "1392815263")
                .set_body_json(json!({"lists": []})),
        )
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server)).unwrap();
    let request = HttpRequest::builder(HttpMethod::Get, "contactdb/lists")
        .build()
        .unwrap();

    let response = assert_ok!(client.request(request).await);
    let limit = response.rate_limit.unwrap();
    assert_eq!(limit.limit, 500);
    assert_eq!(limit.remaining, 499);
    assert_eq!(limit.reset, 1_392_815_263);
}

#[tokio::test]
async fn test_single_try_does_not_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/contactdb/lists"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "errors": [{"field": null, "message": "too many requests"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = RestClient::new(&config_for(&server)).unwrap();
    let error = assert_err!(client.get("contactdb/lists", Vec::new()).await);

    assert_eq!(error.status(), Some(429));
}

#[tokio::test]
async fn test_retries_server_error_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/contactdb/lists"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/contactdb/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"lists": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = RestClient::new(&config_for(&server)).unwrap().with_tries(2);
    let response = assert_ok!(client.get("contactdb/lists", Vec::new()).await);

    assert_eq!(response.code, 200);
}

#[tokio::test]
async fn test_retries_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/contactdb/lists"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let client = RestClient::new(&config_for(&server)).unwrap().with_tries(2);
    let error = assert_err!(client.get("contactdb/lists", Vec::new()).await);

    match error {
        RestError::Http(HttpError::MaxRetries(e)) => {
            assert_eq!(e.code, 500);
            assert_eq!(e.tries, 2);
        }
        other => panic!("expected max retries error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_client_error_is_never_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/contactdb/lists/9"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = RestClient::new(&config_for(&server)).unwrap().with_tries(3);
    let error = assert_err!(client.get("contactdb/lists/9", Vec::new()).await);

    assert_eq!(error.status(), Some(404));
}

#[tokio::test]
async fn test_empty_path_is_rejected() {
    let server = MockServer::start().await;
    let client = RestClient::new(&config_for(&server)).unwrap();

    let error = assert_err!(client.get("/", Vec::new()).await);
    assert!(matches!(error, RestError::InvalidPath { .. }));
}
