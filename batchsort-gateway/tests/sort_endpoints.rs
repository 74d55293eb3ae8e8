//! Integration test: both sort endpoints against the canonical example batches
//! under every concurrent configuration.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use batchsort_core::{examples::example_batches, same_sequences, Sequence};
use batchsort_gateway::{
    config::{GatewayConfig, AGGREGATION_VAR, MAX_CONCURRENCY_VAR},
    routes::{create_router, SortResponse},
};
use tower::ServiceExt;

fn router_with(vars: &[(&'static str, &'static str)]) -> Router {
    let vars = vars.to_vec();
    let config = GatewayConfig::from_lookup(move |var| {
        vars.iter().find(|(k, _)| *k == var).map(|(_, v)| (*v).to_owned())
    })
    .unwrap_or_else(|e| panic!("invalid test config: {e}"));
    create_router(&config)
}

fn routers() -> Vec<(&'static str, Router)> {
    vec![
        ("unbounded-mutex", router_with(&[])),
        ("bounded-mutex", router_with(&[(MAX_CONCURRENCY_VAR, "2")])),
        ("channel", router_with(&[(AGGREGATION_VAR, "channel")])),
    ]
}

async fn sort_via(app: Router, uri: &str, input: &[Sequence]) -> SortResponse {
    let body = serde_json::json!({ "to_sort": input }).to_string();
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap_or_else(|e| panic!("failed to build request: {e}"));
    let resp = app
        .oneshot(req)
        .await
        .unwrap_or_else(|e| panic!("handler error: {e}"));
    assert_eq!(resp.status(), StatusCode::OK, "{uri} must accept a valid batch");
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        Some("application/json"),
    );
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap_or_else(|e| panic!("failed to read body: {e}"));
    serde_json::from_slice(&bytes).unwrap_or_else(|e| panic!("invalid response: {e}"))
}

#[tokio::test]
async fn process_single_matches_examples_exactly() {
    for example in example_batches() {
        let resp = sort_via(router_with(&[]), "/process-single", &example.input).await;
        assert_eq!(resp.sorted_arrays, example.expected, "example '{}'", example.name);
    }
}

#[tokio::test]
async fn process_concurrent_matches_examples_as_multiset() {
    for (config, app) in routers() {
        for example in example_batches() {
            let resp = sort_via(app.clone(), "/process-concurrent", &example.input).await;
            assert!(
                same_sequences(&example.input, &resp.sorted_arrays),
                "{config} on '{}' gave {:?}",
                example.name,
                resp.sorted_arrays
            );
        }
    }
}

#[tokio::test]
async fn process_concurrent_handles_thousand_sequence_batch() {
    let input: Vec<Sequence> = (0..1000_i64)
        .map(|i| (0..(i % 17)).map(|j| (i * 7919 + j * 104_729) % 1000 - 500).collect())
        .collect();
    for (config, app) in routers() {
        let resp = sort_via(app, "/process-concurrent", &input).await;
        assert_eq!(resp.sorted_arrays.len(), input.len(), "{config} cardinality");
        assert!(same_sequences(&input, &resp.sorted_arrays), "{config} content");
    }
}
