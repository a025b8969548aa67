use crate::core::executor::UpstreamClient;
use crate::core::normalizer;
use crate::domain::model::{Intent, Service};
use crate::domain::ports::{ConfigProvider, DirectionCatalog};
use crate::utils::error::Result;
use crate::utils::validation;
use regex::Regex;
use std::sync::{Arc, LazyLock};

static DIRECTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z]{2,3}-[a-z]{2,3}").expect("valid direction pattern"));

/// A chat message split into its direction token and the text after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedRequest<'a> {
    pub direction: &'a str,
    pub payload: &'a str,
    pub intent: Intent,
}

/// Finds the first direction-shaped token in `text`. Anything before the
/// token is ignored; the payload is the rest of the text without
/// surrounding spaces.
pub fn parse_request(text: &str) -> Option<ParsedRequest<'_>> {
    let found = DIRECTION_PATTERN.find(text)?;
    let payload = text[found.end()..].trim_matches(' ');

    Some(ParsedRequest {
        direction: found.as_str(),
        payload,
        intent: classify_intent(payload),
    })
}

pub fn classify_intent(payload: &str) -> Intent {
    match payload.split_once(' ') {
        Some(_) => Intent::Translate,
        None => Intent::Lookup,
    }
}

/// Routes chat text to the translation or dictionary service.
#[derive(Clone)]
pub struct Translator {
    catalog: Arc<dyn DirectionCatalog>,
    upstream: UpstreamClient,
}

impl Translator {
    pub fn new(catalog: Arc<dyn DirectionCatalog>, upstream: UpstreamClient) -> Self {
        Self { catalog, upstream }
    }

    /// Returns the display string for `text`.
    ///
    /// An empty string means the message is not something the bot can
    /// answer: no direction token, an empty payload, or a direction the
    /// selected service does not support.
    pub async fn translate(&self, ctx: &dyn ConfigProvider, text: &str) -> Result<String> {
        let Some(request) = parse_request(text) else {
            return Ok(String::new());
        };
        if request.payload.is_empty() {
            tracing::debug!("Direction {} without text, nothing to do", request.direction);
            return Ok(String::new());
        }

        let service = request.intent.service();
        if !self.catalog.is_known(ctx, service, request.direction).await? {
            tracing::info!("Unsupported {} direction: {}", service, request.direction);
            return Ok(String::new());
        }

        self.fetch(ctx, service, request.direction, request.payload)
            .await
    }

    async fn fetch(
        &self,
        ctx: &dyn ConfigProvider,
        service: Service,
        direction: &str,
        text: &str,
    ) -> Result<String> {
        let timeout = validation::require_timeout("api.timeout_seconds", ctx.timeout())?;
        let params: Vec<(&str, &str)> = match service {
            Service::Translation => {
                let key =
                    validation::require_non_empty("api.translation_key", ctx.translation_key())?;
                vec![
                    ("lang", direction),
                    ("text", text),
                    ("key", key),
                    ("format", "plain"),
                ]
            }
            Service::Dictionary => {
                let key =
                    validation::require_non_empty("api.dictionary_key", ctx.dictionary_key())?;
                vec![("lang", direction), ("text", text), ("key", key)]
            }
        };

        let body = self
            .upstream
            .execute(ctx.content_url(service), &params, timeout)
            .await?;
        let reply = normalizer::decode_reply(service, &body)?;

        Ok(reply.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BotConfig, EndpointsConfig};
    use crate::utils::error::BotError;
    use async_trait::async_trait;
    use httpmock::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fixed direction lists; counts membership queries.
    struct StaticCatalog {
        translation: Vec<String>,
        dictionary: Vec<String>,
        queries: AtomicUsize,
    }

    impl StaticCatalog {
        fn new(translation: &[&str], dictionary: &[&str]) -> Self {
            let sorted = |dirs: &[&str]| {
                let mut v: Vec<String> = dirs.iter().map(|d| d.to_string()).collect();
                v.sort();
                v
            };
            Self {
                translation: sorted(translation),
                dictionary: sorted(dictionary),
                queries: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DirectionCatalog for StaticCatalog {
        async fn is_known(
            &self,
            _ctx: &dyn ConfigProvider,
            service: Service,
            direction: &str,
        ) -> Result<bool> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            let list = match service {
                Service::Translation => &self.translation,
                Service::Dictionary => &self.dictionary,
            };
            Ok(crate::core::catalog::contains_direction(list, direction))
        }
    }

    fn test_config(base_url: &str) -> BotConfig {
        let mut config = BotConfig::default();
        config.api.translation_key = "tkey".to_string();
        config.api.dictionary_key = "dkey".to_string();
        config.api.endpoints = EndpointsConfig::with_base_url(base_url);
        config
    }

    #[test]
    fn test_parse_request_intents() {
        let lookup = parse_request("en-ru dictionary").unwrap();
        assert_eq!(lookup.direction, "en-ru");
        assert_eq!(lookup.payload, "dictionary");
        assert_eq!(lookup.intent, Intent::Lookup);

        let translate = parse_request("en-ru translate some words").unwrap();
        assert_eq!(translate.payload, "translate some words");
        assert_eq!(translate.intent, Intent::Translate);
    }

    #[test]
    fn test_parse_request_without_direction() {
        assert_eq!(parse_request(""), None);
        assert_eq!(parse_request("text"), None);
        assert_eq!(parse_request("enru failed"), None);
        assert_eq!(parse_request("EN-RU upper case"), None);
    }

    #[test]
    fn test_parse_request_takes_first_token_anywhere() {
        let parsed = parse_request("please eng-rus hello world de-en").unwrap();
        assert_eq!(parsed.direction, "eng-rus");
        assert_eq!(parsed.payload, "hello world de-en");

        // a longer run of letters still yields a 2-3 letter match
        let parsed = parse_request("abcd-efgh word").unwrap();
        assert_eq!(parsed.direction, "bcd-efg");
        assert_eq!(parsed.payload, "h word");
    }

    #[test]
    fn test_parse_request_trims_payload() {
        let parsed = parse_request("en-ru    ").unwrap();
        assert_eq!(parsed.payload, "");
        assert_eq!(parsed.intent, Intent::Lookup);

        let parsed = parse_request("en-ru   word  ").unwrap();
        assert_eq!(parsed.payload, "word");
        assert_eq!(parsed.intent, Intent::Lookup);
    }

    #[tokio::test]
    async fn test_translate_without_direction_makes_no_calls() {
        let catalog = Arc::new(StaticCatalog::new(&["en-ru"], &["en-ru"]));
        let translator = Translator::new(catalog.clone(), UpstreamClient::new());
        let config = test_config("http://127.0.0.1:1");

        assert_eq!(translator.translate(&config, "").await.unwrap(), "");
        assert_eq!(translator.translate(&config, "text").await.unwrap(), "");
        assert_eq!(translator.translate(&config, "en-ru   ").await.unwrap(), "");
        assert_eq!(catalog.queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_direction_yields_empty_result() {
        let catalog = Arc::new(StaticCatalog::new(&["en-ru"], &["en-ru"]));
        let translator = Translator::new(catalog.clone(), UpstreamClient::new());
        // unreachable upstream: any content call would surface as an error
        let config = test_config("http://127.0.0.1:1");

        let result = translator.translate(&config, "zz-zz some text").await.unwrap();
        assert_eq!(result, "");
        assert_eq!(catalog.queries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_direction_checked_against_intent_service() {
        let server = MockServer::start_async().await;
        let lookup_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/dicservice.json/lookup");
                then.status(200).body(r#"{"head":{},"def":[]}"#);
            })
            .await;

        // ru-pl translates but has no dictionary
        let catalog = Arc::new(StaticCatalog::new(&["en-ru", "ru-pl"], &["en-ru"]));
        let translator = Translator::new(catalog, UpstreamClient::new());
        let config = test_config(&server.base_url());

        assert_eq!(translator.translate(&config, "ru-pl слово").await.unwrap(), "");
        lookup_mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_translate_sends_translation_params() {
        let server = MockServer::start_async().await;
        let translate_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/tr.json/translate")
                    .body_contains("lang=en-ru")
                    .body_contains("text=translate+hi+there")
                    .body_contains("key=tkey")
                    .body_contains("format=plain");
                then.status(200)
                    .json_body(serde_json::json!({"code": 200, "lang": "en-ru", "text": ["Hello, World!"]}));
            })
            .await;

        let catalog = Arc::new(StaticCatalog::new(&["en-ru"], &["en-ru"]));
        let translator = Translator::new(catalog, UpstreamClient::new());
        let config = test_config(&server.base_url());

        let result = translator
            .translate(&config, "en-ru translate hi there")
            .await
            .unwrap();

        translate_mock.assert_async().await;
        assert_eq!(result, "Hello, World!");
    }

    #[tokio::test]
    async fn test_lookup_sends_dictionary_params() {
        let server = MockServer::start_async().await;
        let lookup_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/dicservice.json/lookup")
                    .body_contains("lang=en-ru")
                    .body_contains("text=dictionary")
                    .body_contains("key=dkey");
                then.status(200).json_body(serde_json::json!({
                    "head": {},
                    "def": [{"text": "time", "pos": "noun",
                             "tr": [{"text": "время", "pos": "существительное"}]}]
                }));
            })
            .await;

        let catalog = Arc::new(StaticCatalog::new(&["en-ru"], &["en-ru"]));
        let translator = Translator::new(catalog, UpstreamClient::new());
        let config = test_config(&server.base_url());

        let result = translator.translate(&config, "en-ru dictionary").await.unwrap();

        lookup_mock.assert_async().await;
        assert_eq!(result, "time(noun)\nвремя (существительное)");
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/tr.json/translate");
                then.status(500);
            })
            .await;

        let catalog = Arc::new(StaticCatalog::new(&["en-ru"], &["en-ru"]));
        let translator = Translator::new(catalog, UpstreamClient::new());
        let config = test_config(&server.base_url());

        let err = translator
            .translate(&config, "en-ru two words")
            .await
            .unwrap_err();
        assert!(matches!(err, BotError::UpstreamStatus { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_missing_key_is_config_missing() {
        let catalog = Arc::new(StaticCatalog::new(&["en-ru"], &["en-ru"]));
        let translator = Translator::new(catalog, UpstreamClient::new());
        let mut config = test_config("http://127.0.0.1:1");
        config.api.translation_key.clear();

        let err = translator
            .translate(&config, "en-ru two words")
            .await
            .unwrap_err();
        assert!(matches!(err, BotError::ConfigMissing { field } if field == "api.translation_key"));
    }
}
