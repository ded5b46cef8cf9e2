//api_version_v1

//According to docs
//You can make up to 80 API calls per minute. These are bursts of up to 80 / minute.
//If you are translating non-stop, the actual limit is closer to 20 / minute (1200 / hour).

use html_escape::decode_html_entities;
use log::debug;
use serde::{Deserialize, Serialize};
use ureq::http::StatusCode;

use super::{Translate, TranslateError};
use crate::utils::translation_limiter::SyncRateLimiter;

const PUBLIC_URL: &str = "https://libretranslate.com/translate";
const LOCAL_URL: &str = "http://127.0.0.1:5001/translate";

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslationResponse {
    pub translated_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct TranslationRequestBody<'a> {
    pub q: &'a str,
    pub source: &'a str,
    pub target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<&'a str>,
}

/// LibreTranslate client, rate limited to the public instance's quota
#[derive(Debug)]
pub struct LibreTranslator {
    api_url: String,
    api_key: Option<String>,
    limiter: SyncRateLimiter,
}

impl LibreTranslator {
    /// Without an explicit url, an api key selects libretranslate.com and no
    /// key selects a local instance.
    pub fn new(api_key: Option<String>, api_url: Option<String>) -> Self {
        let api_key = api_key.filter(|key| !key.is_empty());

        let api_url = api_url.unwrap_or_else(|| {
            if api_key.is_some() {
                PUBLIC_URL.to_string()
            } else {
                LOCAL_URL.to_string()
            }
        });
        debug!("LibreTranslate endpoint: {api_url}");

        Self {
            api_url,
            api_key,
            limiter: SyncRateLimiter::new(80, 20),
        }
    }

    fn request_body<'a>(&'a self, text: &'a str, target_lang: &'a str) -> TranslationRequestBody<'a> {
        TranslationRequestBody {
            q: text,
            source: "auto",
            target: target_lang,
            api_key: self.api_key.as_deref(),
        }
    }
}

impl Translate for LibreTranslator {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let body = self.request_body(text, target_lang);

        let mut response = self.limiter.run(|| {
            ureq::post(&self.api_url)
                .config()
                .http_status_as_error(false)
                .build()
                .send_json(&body)
        })?;

        if response.status() != StatusCode::OK {
            return Err(TranslateError::Status {
                status: response.status().as_u16(),
                body: response.body_mut().read_to_string().unwrap_or_default(),
            });
        }

        let data = response.body_mut().read_json::<TranslationResponse>()?;

        Ok(decode_html_entities(&data.translated_text).trim().to_string())
    }
}

#[test]
fn test_endpoint_selection() {
    let local = LibreTranslator::new(None, None);
    assert_eq!(local.api_url, LOCAL_URL);

    let public = LibreTranslator::new(Some("key".to_string()), None);
    assert_eq!(public.api_url, PUBLIC_URL);

    let custom = LibreTranslator::new(Some(String::new()), Some("http://mirror/translate".to_string()));
    assert_eq!(custom.api_url, "http://mirror/translate");
    assert_eq!(custom.api_key, None);
}

#[test]
fn test_request_body() {
    let translator = LibreTranslator::new(Some("secret".to_string()), None);
    let body = serde_json::to_value(translator.request_body("hola", "en")).unwrap();

    assert_eq!(
        body,
        serde_json::json!({"q": "hola", "source": "auto", "target": "en", "api_key": "secret"})
    );

    let keyless = LibreTranslator::new(None, None);
    let body = serde_json::to_value(keyless.request_body("hola", "en")).unwrap();
    assert!(body.get("api_key").is_none());
}
