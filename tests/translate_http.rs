use std::collections::HashMap;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use noteboard::config::TranslationConfig;
use noteboard::translate::{
    GoogleTranslate, Language, TranslationBackend, Translator, TRANSLATION_UNAVAILABLE,
};

/// Answers like `translate_a/single`, echoing the query back in upper case,
/// split into two segments.
async fn fake_translate(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let q = params.get("q").cloned().unwrap_or_default().to_uppercase();
    let (first, second) = q.split_at(q.len() / 2);
    let tag = format!(
        "{}>{}",
        params.get("sl").map(String::as_str).unwrap_or("?"),
        params.get("tl").map(String::as_str).unwrap_or("?")
    );
    Json(json!([
        [[first, "orig", null, null], [second, "orig", null, null]],
        null,
        tag
    ]))
}

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/translate_a/single", addr)
}

fn config_for(endpoint: String) -> TranslationConfig {
    TranslationConfig {
        endpoint,
        timeout_secs: 5,
        ..TranslationConfig::default()
    }
}

#[tokio::test]
async fn test_segments_are_joined() {
    let router = Router::new().route("/translate_a/single", get(fake_translate));
    let endpoint = spawn_server(router).await;
    let client = GoogleTranslate::new(&config_for(endpoint)).unwrap();

    let text = client
        .translate("hello world", Language::English, Language::Arabic)
        .await
        .unwrap();

    assert_eq!(text, "HELLO WORLD");
}

#[tokio::test]
async fn test_language_codes_are_sent() {
    async fn tags(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        let seen = format!(
            "{}|{}|{}|{}",
            params["client"], params["sl"], params["tl"], params["dt"]
        );
        Json(json!([[[seen, "x"]]]))
    }
    let router = Router::new().route("/translate_a/single", get(tags));
    let endpoint = spawn_server(router).await;
    let client = GoogleTranslate::new(&config_for(endpoint)).unwrap();

    let text = client
        .translate("bonjour", Language::Auto, Language::German)
        .await
        .unwrap();

    assert_eq!(text, "gtx|auto|de|t");
}

#[tokio::test]
async fn test_api_key_is_appended() {
    async fn key(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        let key = params.get("key").cloned().unwrap_or_default();
        Json(json!([[[key, "x"]]]))
    }
    let router = Router::new().route("/translate_a/single", get(key));
    let endpoint = spawn_server(router).await;
    let mut config = config_for(endpoint);
    config.set_api_key("\"secret\"");
    let client = GoogleTranslate::new(&config).unwrap();

    let text = client
        .translate("x", Language::English, Language::French)
        .await
        .unwrap();

    assert_eq!(text, "secret");
}

#[tokio::test]
async fn test_server_error_is_an_error() {
    let router = Router::new().route(
        "/translate_a/single",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let endpoint = spawn_server(router).await;
    let client = GoogleTranslate::new(&config_for(endpoint)).unwrap();

    let result = client
        .translate("hello", Language::English, Language::Arabic)
        .await;
    assert!(result.is_err());

    let translator = Translator::new(client);
    let text = translator
        .translate("hello", Language::English, Language::Arabic)
        .await;
    assert_eq!(text, TRANSLATION_UNAVAILABLE);
}

#[tokio::test]
async fn test_unreachable_endpoint_gives_placeholder() {
    // Bind then drop, so nothing listens on the port.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = GoogleTranslate::new(&config_for(format!(
        "http://{}/translate_a/single",
        addr
    )))
    .unwrap();
    let translator = Translator::new(client);

    let text = translator
        .translate("hello", Language::English, Language::Arabic)
        .await;
    assert_eq!(text, TRANSLATION_UNAVAILABLE);
}

#[tokio::test]
async fn test_auto_target_is_rejected() {
    let client = GoogleTranslate::new(&config_for("http://127.0.0.1:9/".to_string())).unwrap();
    assert!(client
        .translate("hello", Language::English, Language::Auto)
        .await
        .is_err());
}
