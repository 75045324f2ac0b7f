//! Integration tests for the aggregator client against a mock HTTP server.

use std::sync::Mutex;

use alloy::primitives::{Address, U256};
use mockito::Matcher;

use tx_orchestrator::aggregator::client::SIGNING_SECRET_ENV_VAR;
use tx_orchestrator::aggregator::{AggregatorClient, SwapRoute};
use tx_orchestrator::config::AggregatorConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn aggregator_config(url: &str) -> AggregatorConfig {
    AggregatorConfig {
        api_url: url.to_string(),
        client_id: "test-client".to_string(),
        source: "test-source".to_string(),
    }
}

const TOKEN_IN: &str = "0x039e2fB66102314Ce7b64Ce5Ce3E5183bc94aD38";
const TOKEN_OUT: &str = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE";

#[tokio::test]
async fn test_get_route_passes_raw_amount_and_parses_route() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/routes")
        .match_header("x-client-id", "test-client")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("tokenIn".to_string(), TOKEN_IN.to_string()),
            Matcher::UrlEncoded("tokenOut".to_string(), TOKEN_OUT.to_string()),
            // 100.5 of a six-decimal token in base units.
            Matcher::UrlEncoded("amountIn".to_string(), "100500000".to_string()),
            Matcher::UrlEncoded("gasInclude".to_string(), "true".to_string()),
        ]))
        .with_status(200)
        .with_body(
            r#"{
                "code": 0,
                "message": "successfully",
                "data": {
                    "routeSummary": {"amountOut": "995000000000000000", "priceImpact": "0.3"},
                    "routerAddress": "0x6131B5fae19EA4f9D964eAc0408E4408b66337b5"
                }
            }"#,
        )
        .create_async()
        .await;

    let client = AggregatorClient::new(aggregator_config(&server.url()));
    let route = client
        .get_route(
            TOKEN_IN.parse().unwrap(),
            TOKEN_OUT.parse().unwrap(),
            U256::from(100_500_000u64),
        )
        .await
        .unwrap();

    assert_eq!(
        route.router_address,
        "0x6131B5fae19EA4f9D964eAc0408E4408b66337b5".parse::<Address>().unwrap()
    );
    assert_eq!(route.amount_out(), Some("995000000000000000"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_route_nonzero_code_is_upstream_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/routes")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"code": 4011, "message": "route not found"}"#)
        .create_async()
        .await;

    let client = AggregatorClient::new(aggregator_config(&server.url()));
    let err = client
        .get_route(TOKEN_IN.parse().unwrap(), TOKEN_OUT.parse().unwrap(), U256::from(1u64))
        .await
        .unwrap_err();

    assert_eq!(err.category(), "upstream");
    assert!(err.to_string().contains("route not found"));
}

#[tokio::test]
async fn test_get_route_http_failure_is_upstream_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/routes")
        .match_query(Matcher::Any)
        .with_status(502)
        .with_body("bad gateway")
        .create_async()
        .await;

    let client = AggregatorClient::new(aggregator_config(&server.url()));
    let err = client
        .get_route(TOKEN_IN.parse().unwrap(), TOKEN_OUT.parse().unwrap(), U256::from(1u64))
        .await
        .unwrap_err();

    assert_eq!(err.category(), "upstream");
    assert!(err.to_string().contains("502"));
}

#[tokio::test]
async fn test_build_swap_data_signs_and_returns_call_data() {
    let _guard = ENV_LOCK.lock().unwrap();
    std::env::set_var(SIGNING_SECRET_ENV_VAR, "shared-secret");

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/route/build")
        .match_header("x-client-id", "test-client")
        .match_header("x-timestamp", Matcher::Regex(r"^\d+$".to_string()))
        // HMAC-SHA256 hex digest.
        .match_header("x-signature", Matcher::Regex(r"^[0-9a-f]{64}$".to_string()))
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJsonString(r#"{"slippageTolerance":50}"#.to_string()),
            Matcher::PartialJsonString(r#"{"source":"test-source"}"#.to_string()),
            Matcher::PartialJsonString(r#"{"routeSummary":{"amountOut":"1"}}"#.to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"code": 0, "data": {"data": "0xe21fd0e9", "routerAddress": "0x6131B5fae19EA4f9D964eAc0408E4408b66337b5"}}"#)
        .create_async()
        .await;

    let client = AggregatorClient::new(aggregator_config(&server.url()));
    let route = SwapRoute {
        route_summary: serde_json::json!({"amountOut": "1"}),
        router_address: Address::ZERO,
    };
    let sender = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
    let data = client.build_swap_data(&route, 50, sender).await.unwrap();

    assert_eq!(data, "0xe21fd0e9");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_build_swap_data_without_secret_is_configuration_error() {
    let _guard = ENV_LOCK.lock().unwrap();
    std::env::remove_var(SIGNING_SECRET_ENV_VAR);

    let client = AggregatorClient::new(aggregator_config("http://127.0.0.1:9"));
    let route = SwapRoute { route_summary: serde_json::json!({}), router_address: Address::ZERO };
    let err = client.build_swap_data(&route, 50, Address::ZERO).await.unwrap_err();

    assert_eq!(err.category(), "configuration");
}

#[tokio::test]
async fn test_build_swap_data_error_code_is_upstream_error() {
    let _guard = ENV_LOCK.lock().unwrap();
    std::env::set_var(SIGNING_SECRET_ENV_VAR, "shared-secret");

    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/route/build")
        .with_status(200)
        .with_body(r#"{"code": 4020, "message": "route expired"}"#)
        .create_async()
        .await;

    let client = AggregatorClient::new(aggregator_config(&server.url()));
    let route = SwapRoute { route_summary: serde_json::json!({}), router_address: Address::ZERO };
    let err = client.build_swap_data(&route, 50, Address::ZERO).await.unwrap_err();

    assert_eq!(err.category(), "upstream");
    assert!(err.to_string().contains("route expired"));
}
