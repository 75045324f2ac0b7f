//! Integration tests for the custody resolver and remote signer against a
//! mock HTTP server.

use std::sync::Mutex;

use alloy::primitives::{Address, Bytes, U256};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use mockito::Matcher;
use p256::pkcs8::EncodePrivateKey as _;

use tx_orchestrator::config::CustodyConfig;
use tx_orchestrator::custody::types::{
    APP_ID_ENV_VAR, APP_SECRET_ENV_VAR, AUTH_KEY_ENV_VAR, WALLET_ID_ENV_VAR,
};
use tx_orchestrator::custody::{RemoteSigner, WalletId, WalletResolver};
use tx_orchestrator::pipeline::UnsignedTx;

// Environment variables are process-global; serialize the tests that touch
// them.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn set_credentials() {
    std::env::set_var(APP_ID_ENV_VAR, "test-app");
    std::env::set_var(APP_SECRET_ENV_VAR, "test-secret");
    std::env::set_var(WALLET_ID_ENV_VAR, "w-default");
    std::env::set_var(AUTH_KEY_ENV_VAR, test_auth_key());
}

fn clear_credentials() {
    std::env::remove_var(APP_ID_ENV_VAR);
    std::env::remove_var(APP_SECRET_ENV_VAR);
    std::env::remove_var(WALLET_ID_ENV_VAR);
    std::env::remove_var(AUTH_KEY_ENV_VAR);
}

fn test_auth_key() -> String {
    let key = p256::ecdsa::SigningKey::from_slice(&[0x42; 32]).unwrap();
    let der = key.to_pkcs8_der().unwrap();
    format!("wallet-auth:{}", BASE64.encode(der.as_bytes()))
}

fn custody_config(url: &str) -> CustodyConfig {
    CustodyConfig { api_url: url.to_string() }
}

fn sample_tx() -> UnsignedTx {
    UnsignedTx {
        from: Address::repeat_byte(0xaa),
        to: Address::repeat_byte(0xbb),
        value: U256::from(1_000_000_000_000_000_000u128),
        data: Bytes::new(),
        nonce: 3,
        chain_id: 146,
        max_fee_per_gas: 51_000_000_000,
        max_priority_fee_per_gas: 1_000_000_000,
        gas: 25_200,
    }
}

#[tokio::test]
async fn test_resolve_returns_wallet_address() {
    let _guard = ENV_LOCK.lock().unwrap();
    set_credentials();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/wallets/w-1")
        .match_header("app-id", "test-app")
        .match_header("authorization", Matcher::Regex("^Basic ".to_string()))
        .with_status(200)
        .with_body(r#"{"id":"w-1","address":"0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"}"#)
        .create_async()
        .await;

    let resolver = WalletResolver::new(custody_config(&server.url()));
    let address = resolver.resolve(Some(&WalletId::from("w-1"))).await.unwrap();

    assert_eq!(
        address,
        "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse::<Address>().unwrap()
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_resolve_uses_default_wallet_id() {
    let _guard = ENV_LOCK.lock().unwrap();
    set_credentials();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/wallets/w-default")
        .with_status(200)
        .with_body(r#"{"address":"0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"}"#)
        .create_async()
        .await;

    let resolver = WalletResolver::new(custody_config(&server.url()));
    resolver.resolve(None).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_resolve_without_credentials_is_configuration_error() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_credentials();

    let resolver = WalletResolver::new(custody_config("http://127.0.0.1:9"));
    let err = resolver.resolve(Some(&WalletId::from("w-1"))).await.unwrap_err();

    assert_eq!(err.category(), "configuration");
}

#[tokio::test]
async fn test_resolve_upstream_failure_carries_status() {
    let _guard = ENV_LOCK.lock().unwrap();
    set_credentials();

    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/wallets/w-1")
        .with_status(403)
        .with_body(r#"{"error":"forbidden"}"#)
        .create_async()
        .await;

    let resolver = WalletResolver::new(custody_config(&server.url()));
    let err = resolver.resolve(Some(&WalletId::from("w-1"))).await.unwrap_err();

    assert_eq!(err.category(), "upstream");
    assert!(err.to_string().contains("403"));
}

#[tokio::test]
async fn test_resolve_missing_address_field_is_upstream_error() {
    let _guard = ENV_LOCK.lock().unwrap();
    set_credentials();

    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/wallets/w-1")
        .with_status(200)
        .with_body(r#"{"id":"w-1"}"#)
        .create_async()
        .await;

    let resolver = WalletResolver::new(custody_config(&server.url()));
    let err = resolver.resolve(Some(&WalletId::from("w-1"))).await.unwrap_err();

    assert_eq!(err.category(), "upstream");
    assert!(err.to_string().contains("address"));
}

#[tokio::test]
async fn test_sign_posts_envelope_and_decodes_raw_bytes() {
    let _guard = ENV_LOCK.lock().unwrap();
    set_credentials();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/wallets/w-1/rpc")
        .match_header("app-id", "test-app")
        .match_header("authorization-signature", Matcher::Regex(".+".to_string()))
        .match_header("authorization", Matcher::Regex("^Basic ".to_string()))
        // The envelope carries the signing method and the translated fields.
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJsonString(r#"{"method":"eth_signTransaction"}"#.to_string()),
            Matcher::PartialJsonString(
                r#"{"params":{"transaction":{"chain_id":146,"nonce":3,"data":"0x"}}}"#.to_string(),
            ),
        ]))
        .with_status(200)
        .with_body(r#"{"method":"eth_signTransaction","data":{"signed_transaction":"0x02f870"}}"#)
        .create_async()
        .await;

    let signer = RemoteSigner::new(custody_config(&server.url()));
    let signed = signer.sign(&sample_tx(), &WalletId::from("w-1")).await.unwrap();

    assert_eq!(signed, Bytes::from(vec![0x02, 0xf8, 0x70]));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_sign_without_auth_key_is_configuration_error() {
    let _guard = ENV_LOCK.lock().unwrap();
    set_credentials();
    std::env::remove_var(AUTH_KEY_ENV_VAR);

    let signer = RemoteSigner::new(custody_config("http://127.0.0.1:9"));
    let err = signer.sign(&sample_tx(), &WalletId::from("w-1")).await.unwrap_err();

    assert_eq!(err.category(), "configuration");
}

#[tokio::test]
async fn test_sign_upstream_failure_carries_status_and_body() {
    let _guard = ENV_LOCK.lock().unwrap();
    set_credentials();

    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/wallets/w-1/rpc")
        .with_status(500)
        .with_body("signer exploded")
        .create_async()
        .await;

    let signer = RemoteSigner::new(custody_config(&server.url()));
    let err = signer.sign(&sample_tx(), &WalletId::from("w-1")).await.unwrap_err();

    assert_eq!(err.category(), "upstream");
    let detail = err.to_string();
    assert!(detail.contains("500"));
    assert!(detail.contains("signer exploded"));
}

#[tokio::test]
async fn test_sign_response_without_payload_is_upstream_error() {
    let _guard = ENV_LOCK.lock().unwrap();
    set_credentials();

    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/wallets/w-1/rpc")
        .with_status(200)
        .with_body(r#"{"data":{}}"#)
        .create_async()
        .await;

    let signer = RemoteSigner::new(custody_config(&server.url()));
    let err = signer.sign(&sample_tx(), &WalletId::from("w-1")).await.unwrap_err();

    assert_eq!(err.category(), "upstream");
}
