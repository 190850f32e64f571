use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use super::{Language, TranslationBackend};
use crate::config::TranslationConfig;
use crate::error::{NoteboardError, Result};

pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Client for the public `translate_a/single` endpoint.
pub struct GoogleTranslate {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GoogleTranslate {
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl TranslationBackend for GoogleTranslate {
    async fn translate(&self, text: &str, from: Language, to: Language) -> Result<String> {
        if to == Language::Auto {
            return Err(NoteboardError::Translation(
                "target language cannot be auto".to_string(),
            ));
        }

        let mut query = vec![
            ("client", "gtx"),
            ("sl", from.code()),
            ("tl", to.code()),
            ("dt", "t"),
            ("q", text),
        ];
        if let Some(key) = self.api_key.as_deref() {
            query.push(("key", key));
        }

        debug!(endpoint = %self.endpoint, sl = from.code(), tl = to.code(), "requesting translation");
        let body: Value = self
            .client
            .get(self.endpoint.as_str())
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_response(&body)
    }
}

/// Join the translated segments of a `translate_a/single` response.
///
/// The payload is a nested array whose first element lists segments, each
/// segment starting with its translated text. A response without segments
/// translates to the empty string.
pub fn parse_response(body: &Value) -> Result<String> {
    let outer = body.as_array().ok_or_else(|| {
        NoteboardError::Translation("unexpected response from translation service".to_string())
    })?;

    let translated = outer
        .first()
        .and_then(Value::as_array)
        .map(|segments| {
            segments
                .iter()
                .filter_map(|segment| segment.get(0).and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();
    Ok(translated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_segments_are_joined() {
        let body = json!([
            [["Hello ", "مرحبا ", null, null, 10], ["world", "عالم", null, null, 10]],
            null,
            "ar"
        ]);
        assert_eq!(parse_response(&body).unwrap(), "Hello world");
    }

    #[test]
    fn test_missing_segments_translate_to_empty() {
        assert_eq!(parse_response(&json!([null, null, "en"])).unwrap(), "");
        assert_eq!(parse_response(&json!([])).unwrap(), "");
    }

    #[test]
    fn test_non_array_response_is_an_error() {
        assert!(parse_response(&json!({"error": "quota"})).is_err());
    }

    #[tokio::test]
    async fn test_auto_target_is_rejected() {
        let client = GoogleTranslate::new(&TranslationConfig::default()).unwrap();
        assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
        let result = client
            .translate("hello", Language::English, Language::Auto)
            .await;
        assert!(result.is_err());
    }
}
