//! FX cache and price conversion tests against a mocked rate endpoint.

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tienda_core::{PricingPolicy, ProductId};
use tienda_engine::{EngineError, Storefront, StorefrontConfig};
use tienda_store::JsonStore;

const FX_PATH: &str = "/v4/latest/USD";

fn rates_body() -> serde_json::Value {
    json!({
        "base": "USD",
        "rates": {
            "ARS": 1.0,
            "EUR": 0.9794,
            "MXN": 17.08
        }
    })
}

fn storefront(server: &MockServer, pricing: PricingPolicy) -> (Storefront, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonStore::open(dir.path()).unwrap());
    let config = StorefrontConfig {
        pricing,
        fx_url: format!("{}{FX_PATH}", server.uri()),
        ..StorefrontConfig::default()
    };
    let engine = Storefront::new(store, config).unwrap();
    (engine, dir)
}

#[tokio::test]
async fn fresh_rate_is_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(rates_body()))
        .expect(1)
        .mount(&server)
        .await;

    let (engine, _dir) = storefront(&server, PricingPolicy::default());

    let first = engine.convert_price(500.0, "ARS").await.unwrap();
    let second = engine.convert_price(500.0, "ARS").await.unwrap();

    assert_eq!(first, second);
    server.verify().await;
}

#[tokio::test]
async fn expired_rate_is_refetched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(rates_body()))
        .expect(2)
        .mount(&server)
        .await;

    let pricing = PricingPolicy {
        rate_ttl_secs: 0,
        ..PricingPolicy::default()
    };
    let (engine, _dir) = storefront(&server, pricing);

    engine.convert_price(500.0, "ARS").await.unwrap();
    engine.convert_price(500.0, "ARS").await.unwrap();

    server.verify().await;
}

#[tokio::test]
async fn unknown_currency_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(rates_body()))
        .mount(&server)
        .await;

    let (engine, _dir) = storefront(&server, PricingPolicy::default());

    let result = engine.convert_price(10.0, "XXX").await;
    assert!(matches!(result, Err(EngineError::UnknownCurrency(code)) if code == "XXX"));
}

#[tokio::test]
async fn upstream_failure_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FX_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (engine, _dir) = storefront(&server, PricingPolicy::default());

    let result = engine.convert_price(10.0, "ARS").await;
    assert!(matches!(result, Err(EngineError::Upstream(_))));
}

#[tokio::test]
async fn malformed_payload_is_an_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not a rate table"))
        .mount(&server)
        .await;

    let (engine, _dir) = storefront(&server, PricingPolicy::default());

    let result = engine.convert_price(10.0, "ARS").await;
    assert!(matches!(result, Err(EngineError::Upstream(_))));
}

#[tokio::test]
async fn converted_price_rounds_up_by_magnitude() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(rates_body()))
        .mount(&server)
        .await;

    let (engine, _dir) = storefront(&server, PricingPolicy::default());

    // 999 ARS at rate 1.0: below 1,000 the step is 10, so the ceiling lands
    // exactly on 1,000.
    let quote = engine.convert_price(999.0, "ARS").await.unwrap();
    assert_eq!(quote.amount, 1_000.0);
    assert!(quote.rounded);
    assert_eq!(quote.to_string(), "1000 ARS");
}

#[tokio::test]
async fn exact_currency_displays_two_decimals_unrounded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(rates_body()))
        .mount(&server)
        .await;

    let mut pricing = PricingPolicy::default();
    pricing.exact_currencies.insert("EUR".to_string());
    let (engine, _dir) = storefront(&server, pricing);

    let quote = engine.convert_price(28.0, "EUR").await.unwrap();
    assert!(!quote.rounded);
    assert_eq!(quote.to_string(), "27.42 EUR");
}

#[tokio::test]
async fn quote_product_converts_its_base_price() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(rates_body()))
        .mount(&server)
        .await;

    let (engine, _dir) = storefront(&server, PricingPolicy::default());

    // 36.99 USD * 17.08 = 631.7892, ceiling step 10 -> 640.
    let bundle = ProductId::new("bundle-5000").unwrap();
    let quote = engine.quote_product(&bundle, "MXN").await.unwrap();
    assert_eq!(quote.amount, 640.0);

    let missing = ProductId::new("bundle-999999").unwrap();
    let result = engine.quote_product(&missing, "MXN").await;
    assert!(matches!(result, Err(EngineError::UnknownProduct(_))));
}
