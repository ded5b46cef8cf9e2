//api_version_v2

use std::sync::LazyLock;

use html_escape::decode_html_entities;
use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};
use ureq::http::StatusCode;

use super::{Translate, TranslateError};

const API_URL: &str = "https://translation.googleapis.com/language/translate/v2";
const WEB_URL: &str = "https://translate.google.com/m";

static RESULT_CONTAINER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)class="(?:t0|result-container)">(.*?)<"#).expect("valid result pattern")
});

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslatedResponse {
    pub data: Data,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Data {
    pub translations: Vec<Translation>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    pub translated_text: String,
}

/// Google Cloud Translation client.
///
/// Without an api key the google translate mobile page is used instead.
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    api_key: Option<String>,
}

impl GoogleTranslator {
    /// Create a client, `None` selects the web fallback
    pub fn new(api_key: Option<String>) -> Self {
        let api_key = api_key.filter(|key| !key.is_empty());

        if api_key.is_none() {
            warn!(
                "Google API key not found in the credentials file or GOOGLE_API_KEY \
                 (service account files carry none), using the unauthenticated google translate web page"
            );
        }

        Self { api_key }
    }

    fn translate_v2(&self, key: &str, text: &str, target_lang: &str) -> Result<String, TranslateError> {
        let mut response = ureq::get(API_URL)
            .config()
            .http_status_as_error(false)
            .build()
            .query("key", key)
            .query("target", target_lang)
            .query("q", text)
            .call()?;

        if response.status() != StatusCode::OK {
            return Err(TranslateError::Status {
                status: response.status().as_u16(),
                body: response.body_mut().read_to_string().unwrap_or_default(),
            });
        }

        let data = response.body_mut().read_json::<TranslatedResponse>()?;

        parse_translation(data)
    }
}

impl Translate for GoogleTranslator {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        match &self.api_key {
            Some(key) => self.translate_v2(key, text, target_lang),
            None => google_web_translate(target_lang, text),
        }
    }
}

fn parse_translation(data: TranslatedResponse) -> Result<String, TranslateError> {
    data.data
        .translations
        .into_iter()
        .next()
        .map(|t| decode_html_entities(&t.translated_text).trim().to_string())
        .ok_or(TranslateError::MissingTranslation)
}

fn google_web_translate(target_lang: &str, q: &str) -> Result<String, TranslateError> {
    let mut response = ureq::get(WEB_URL)
        .config()
        .http_status_as_error(false)
        .build()
        .query("sl", "auto")
        .query("tl", target_lang)
        .query("q", q)
        .call()?;

    if response.status() != StatusCode::OK {
        return Err(TranslateError::Status {
            status: response.status().as_u16(),
            body: String::new(),
        });
    }

    get_translated_text(&response.body_mut().read_to_string()?)
}

fn get_translated_text(html: &str) -> Result<String, TranslateError> {
    RESULT_CONTAINER
        .captures(html)
        .map(|captures| decode_html_entities(&captures[1]).to_string())
        .ok_or(TranslateError::MissingTranslation)
}

#[test]
fn test_parse_translation() {
    let data: TranslatedResponse = serde_json::from_str(
        r#"{"data": {"translations": [{"translatedText": "Tom &amp; Jerry ", "detectedSourceLanguage": "es"}]}}"#,
    )
    .unwrap();

    assert_eq!(parse_translation(data).unwrap(), "Tom & Jerry");

    let empty: TranslatedResponse = serde_json::from_str(r#"{"data": {"translations": []}}"#).unwrap();
    assert!(matches!(
        parse_translation(empty),
        Err(TranslateError::MissingTranslation)
    ));
}

#[test]
fn test_get_translated_text() {
    let html = r#"<html><body><div class="result-container">It&#39;s raining</div></body></html>"#;
    assert_eq!(get_translated_text(html).unwrap(), "It's raining");

    assert!(matches!(
        get_translated_text("<html>captcha</html>"),
        Err(TranslateError::MissingTranslation)
    ));
}

#[test]
fn test_blank_text_skips_request() {
    let translator = GoogleTranslator::new(Some("unused".to_string()));

    assert_eq!(translator.translate("   ", "en").unwrap(), "");
}
