//! Deals API client against a mock server

use serde_json::json;
use shared::{DealsListQuery, UpdateStageRequest};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::config_for;
use crate::error::PipelineError;
use crate::services::RealDealsApi;
use crate::traits::DealsApi;

#[tokio::test]
async fn test_fetch_page_sends_listing_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/customers/deals"))
        .and(query_param("page", "1"))
        .and(query_param("pageSize", "100"))
        .and(query_param("sortField", "createdAt"))
        .and(query_param("sortDir", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "id": "d1", "title": "Renewal" }],
            "total": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = RealDealsApi::new(&config_for(&server)).unwrap();
    let body = api.fetch_page(DealsListQuery::first_page(100)).await.unwrap();

    assert_eq!(body["items"][0]["id"], "d1");
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_fetch_page_rejection_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/customers/deals"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "error": "Access denied" })))
        .mount(&server)
        .await;

    let api = RealDealsApi::new(&config_for(&server)).unwrap();
    let err = api.fetch_page(DealsListQuery::default()).await.unwrap_err();

    assert!(matches!(err, PipelineError::ApiRejected { status: 403, .. }));
    assert_eq!(err.server_message(), Some("Access denied"));
}

#[tokio::test]
async fn test_non_json_error_body_has_no_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let api = RealDealsApi::new(&config_for(&server)).unwrap();
    let err = api.fetch_page(DealsListQuery::default()).await.unwrap_err();

    assert!(matches!(err, PipelineError::ApiRejected { status: 500, server_message: None }));
}

#[tokio::test]
async fn test_non_json_success_body_reads_as_null() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let api = RealDealsApi::new(&config_for(&server)).unwrap();
    assert!(api.fetch_page(DealsListQuery::default()).await.unwrap().is_null());
}

#[tokio::test]
async fn test_update_stage_puts_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/customers/deals"))
        .and(body_json(json!({ "id": "d1", "pipelineStage": "won" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = RealDealsApi::new(&config_for(&server)).unwrap();
    let request = UpdateStageRequest {
        id: "d1".to_string(),
        pipeline_stage: "won".to_string(),
    };

    api.update_stage(request).await.unwrap();
}

#[tokio::test]
async fn test_update_stage_failure() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({ "error": "  Stage is locked " })))
        .mount(&server)
        .await;

    let api = RealDealsApi::new(&config_for(&server)).unwrap();
    let err = api
        .update_stage(UpdateStageRequest {
            id: "d1".to_string(),
            pipeline_stage: "won".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.server_message(), Some("Stage is locked"));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // nothing listens on port 1
    let config = crate::config::PipelineConfig::from_lookup(|name| {
        (name == "PIPELINE_API_URL").then(|| "http://127.0.0.1:1".to_string())
    })
    .unwrap();

    let api = RealDealsApi::new(&config).unwrap();
    let err = api.fetch_page(DealsListQuery::default()).await.unwrap_err();

    assert!(matches!(err, PipelineError::NetworkError { .. }));
    assert_eq!(err.server_message(), None);
}
