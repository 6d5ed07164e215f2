// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google Fit client behavior against a local stub server.

use chrono::DateTime;
use fit_mileage::config::FitCredentials;
use fit_mileage::error::AppError;
use fit_mileage::services::{GoogleFitClient, GoogleFitService, SessionQuery};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SESSIONS_PAGE: &str = include_str!("fixtures/sessions_page.json");
const AGGREGATE: &str = include_str!("fixtures/aggregate_response.json");

fn client(server: &MockServer) -> GoogleFitClient {
    GoogleFitClient::with_base_urls(&server.uri(), &format!("{}/token", server.uri()))
}

fn service(server: &MockServer) -> GoogleFitService {
    GoogleFitService::with_client(
        client(server),
        FitCredentials::AccessToken("ya29.static".to_string()),
    )
}

fn query() -> SessionQuery {
    SessionQuery {
        start: DateTime::from_timestamp(1_577_836_800, 0).unwrap(),
        end: None,
        activity_types: vec![16, 17],
    }
}

fn json(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/json")
}

fn one_session_listing(token: &str) -> serde_json::Value {
    serde_json::json!({
        "session": [{
            "id": "ride-1",
            "name": "Morning Ride",
            "startTimeMillis": "1589910000000",
            "endTimeMillis": "1589914500000",
            "activityType": 16
        }],
        "nextPageToken": token
    })
}

#[tokio::test]
async fn test_listing_unauthorized_is_token_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid Credentials"))
        .mount(&server)
        .await;

    let err = client(&server)
        .list_sessions("ya29.stale", &query())
        .await
        .unwrap_err();

    assert!(matches!(&err, AppError::FitApi(msg) if msg == AppError::FIT_TOKEN_ERROR));
    assert!(err.is_fit_token_error());
    assert!(!err.is_rate_limited());
}

#[tokio::test]
async fn test_aggregate_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dataset:aggregate"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
        .mount(&server)
        .await;

    let page: fit_mileage::models::fit::SessionListResponse =
        serde_json::from_str(SESSIONS_PAGE).unwrap();
    let err = client(&server)
        .aggregate_by_session("ya29.static", &page.session[0])
        .await
        .unwrap_err();

    assert!(err.is_rate_limited());
    assert!(!err.is_fit_token_error());
}

#[tokio::test]
async fn test_server_error_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend unavailable"))
        .mount(&server)
        .await;

    let err = client(&server)
        .list_sessions("ya29.static", &query())
        .await
        .unwrap_err();

    match err {
        AppError::FitApi(msg) => {
            assert!(msg.starts_with("HTTP 500"), "unexpected message: {msg}");
            assert!(msg.contains("backend unavailable"));
        }
        other => panic!("expected FitApi error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_listing_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(json(r#"{"session": [{"startTimeMillis": "soon"}]}"#))
        .mount(&server)
        .await;

    let err = client(&server)
        .list_sessions("ya29.static", &query())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::FitApi(msg) if msg.starts_with("JSON parse error")));
}

#[tokio::test]
async fn test_refresh_rejected_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"error": "invalid_grant"}"#))
        .mount(&server)
        .await;

    let err = client(&server)
        .refresh_token("client", "secret", "1//revoked")
        .await
        .unwrap_err();

    assert!(matches!(&err, AppError::Auth(msg) if msg.contains("invalid_grant")));
    assert!(err.is_fit_token_error());
}

#[tokio::test]
async fn test_refreshed_token_used_for_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=1%2F%2Fstored"))
        .respond_with(json(
            r#"{"access_token": "ya29.fresh", "expires_in": 3599, "token_type": "Bearer"}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .and(header("authorization", "Bearer ya29.fresh"))
        .respond_with(json(SESSIONS_PAGE))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/dataset:aggregate"))
        .and(header("authorization", "Bearer ya29.fresh"))
        .respond_with(json(AGGREGATE))
        .expect(2)
        .mount(&server)
        .await;

    let service = GoogleFitService::with_client(
        client(&server),
        FitCredentials::RefreshToken {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            refresh_token: "1//stored".to_string(),
        },
    );
    let records = service.fetch_records(&query()).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].session.name, "Morning Ride");
    assert_eq!(records[0].buckets.len(), 1);
}

#[tokio::test]
async fn test_sync_token_not_followed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .and(query_param("startTime", "2020-01-01T00:00:00Z"))
        .respond_with(json(&one_session_listing("1589914500000").to_string()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/dataset:aggregate"))
        .respond_with(json(AGGREGATE))
        .expect(1)
        .mount(&server)
        .await;

    let records = service(&server).fetch_records(&query()).await.unwrap();
    assert_eq!(records.len(), 1);

    let requests = server.received_requests().await.unwrap();
    assert!(requests
        .iter()
        .all(|r| !r.url.query_pairs().any(|(k, _)| k == "pageToken")));
}

#[tokio::test]
async fn test_repeated_sessions_aggregated_once() {
    let server = MockServer::start().await;
    let mut listing = one_session_listing("");
    let first = listing["session"][0].clone();
    listing["session"] = serde_json::json!([first.clone(), first]);

    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(json(&listing.to_string()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/dataset:aggregate"))
        .respond_with(json(AGGREGATE))
        .expect(1)
        .mount(&server)
        .await;

    let records = service(&server).fetch_records(&query()).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].session.id, "ride-1");
}

#[tokio::test]
async fn test_aggregate_failure_aborts_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(json(SESSIONS_PAGE))
        .mount(&server)
        .await;
    // first aggregate succeeds, the second fails
    Mock::given(method("POST"))
        .and(path("/dataset:aggregate"))
        .respond_with(json(AGGREGATE))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/dataset:aggregate"))
        .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
        .mount(&server)
        .await;

    let err = service(&server).fetch_records(&query()).await.unwrap_err();
    assert!(matches!(err, AppError::FitApi(msg) if msg.starts_with("HTTP 503")));
}
