//! Cloudflare adapter against a mock API

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

mod common;

use httpmock::prelude::*;
use serde_json::json;
use workdoc_provider::{DnsProvider, ProviderError};

use common::{cf_error, cf_record, cloudflare, fast_retry, DOMAIN, ZONE_ID};

#[tokio::test]
async fn test_connection_accepts_matching_zone() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/zones/{ZONE_ID}"))
                .header("authorization", "Bearer cf-test-token");
            then.status(200).json_body(json!({
                "success": true,
                "errors": [],
                "result": { "id": ZONE_ID, "name": DOMAIN, "status": "active" }
            }));
        })
        .await;

    let ok = cloudflare(&server).test_connection().await.unwrap();

    assert!(ok);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_connection_rejects_other_zone() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/zones/{ZONE_ID}"));
            then.status(200).json_body(json!({
                "success": true,
                "errors": [],
                "result": { "id": ZONE_ID, "name": "someone-else.com" }
            }));
        })
        .await;

    assert!(!cloudflare(&server).test_connection().await.unwrap());
}

#[tokio::test]
async fn test_connection_false_on_bad_token() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/zones/{ZONE_ID}"));
            then.status(400).json_body(cf_error(6003, "Invalid request headers"));
        })
        .await;

    assert!(!cloudflare(&server).test_connection().await.unwrap());
}

#[tokio::test]
async fn test_connection_false_on_non_json_forbidden() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/zones/{ZONE_ID}"));
            then.status(403).body("<html>Forbidden</html>");
        })
        .await;

    assert!(!cloudflare(&server).test_connection().await.unwrap());
}

#[tokio::test]
async fn list_subdomains_follows_pagination() {
    let server = MockServer::start_async().await;
    let page1 = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/zones/{ZONE_ID}/dns_records"))
                .query_param("type", "CNAME")
                .query_param("page", "1");
            then.status(200).json_body(json!({
                "success": true,
                "errors": [],
                "result": [cf_record("r1", "company1"), cf_record("r2", "company2")],
                "result_info": { "page": 1, "per_page": 100, "total_pages": 2, "total_count": 3 }
            }));
        })
        .await;
    let page2 = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/zones/{ZONE_ID}/dns_records"))
                .query_param("page", "2");
            then.status(200).json_body(json!({
                "success": true,
                "errors": [],
                "result": [cf_record("r3", "acme")],
                "result_info": { "page": 2, "per_page": 100, "total_pages": 2, "total_count": 3 }
            }));
        })
        .await;

    let records = cloudflare(&server).list_subdomains().await.unwrap();

    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["company1", "company2", "acme"]);
    page1.assert_async().await;
    page2.assert_async().await;
}

#[tokio::test]
async fn create_subdomain_posts_fqdn() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/zones/{ZONE_ID}/dns_records"))
                .json_body(json!({
                    "type": "CNAME",
                    "name": "company7.workdoc360.com",
                    "content": "app.workdoc360.com",
                    "ttl": 600,
                    "proxied": true
                }));
            then.status(200).json_body(json!({
                "success": true,
                "errors": [],
                "result": cf_record("rec-7", "company7")
            }));
        })
        .await;

    let record = cloudflare(&server).create_subdomain("company7").await.unwrap();

    assert_eq!(record.id, "rec-7");
    assert_eq!(record.name, "company7");
    mock.assert_async().await;
}

#[tokio::test]
async fn create_subdomain_maps_duplicate() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(format!("/zones/{ZONE_ID}/dns_records"));
            then.status(400)
                .json_body(cf_error(81053, "An A, AAAA, or CNAME record with that host already exists."));
        })
        .await;

    let err = cloudflare(&server).create_subdomain("acme").await.unwrap_err();

    assert!(
        matches!(&err, ProviderError::RecordExists { record_name, .. } if record_name == "acme"),
        "unexpected: {err:?}"
    );
}

#[tokio::test]
async fn create_subdomain_rejects_bad_label_without_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200);
        })
        .await;

    let err = cloudflare(&server).create_subdomain("Not Valid").await.unwrap_err();

    assert!(matches!(err, ProviderError::InvalidParameter { .. }));
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn delete_subdomain_looks_up_then_deletes_by_id() {
    let server = MockServer::start_async().await;
    let lookup = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/zones/{ZONE_ID}/dns_records"))
                .query_param("name", "company7.workdoc360.com");
            then.status(200).json_body(json!({
                "success": true,
                "errors": [],
                "result": [cf_record("rec-7", "company7")],
                "result_info": { "page": 1, "per_page": 100, "total_pages": 1, "total_count": 1 }
            }));
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path(format!("/zones/{ZONE_ID}/dns_records/rec-7"));
            then.status(200).json_body(json!({
                "success": true,
                "errors": [],
                "result": { "id": "rec-7" }
            }));
        })
        .await;

    cloudflare(&server).delete_subdomain("company7").await.unwrap();

    lookup.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn delete_missing_subdomain_is_record_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/zones/{ZONE_ID}/dns_records"));
            then.status(200).json_body(json!({
                "success": true,
                "errors": [],
                "result": [],
                "result_info": { "page": 1, "per_page": 100, "total_pages": 0, "total_count": 0 }
            }));
        })
        .await;

    let err = cloudflare(&server).delete_subdomain("ghost").await.unwrap_err();

    assert!(matches!(err, ProviderError::RecordNotFound { .. }));
}

#[tokio::test]
async fn transient_failures_are_retried() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/zones/{ZONE_ID}/dns_records"));
            then.status(503).body("upstream unavailable");
        })
        .await;

    let provider = cloudflare(&server).with_retry_policy(fast_retry(2));
    let err = provider.list_subdomains().await.unwrap_err();

    assert!(matches!(err, ProviderError::NetworkError { .. }));
    mock.assert_hits_async(3).await;
}
