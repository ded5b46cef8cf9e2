//!
//! Translation providers
//!
//! Every provider translates one text per request. The source language is
//! detected by the service.
//!

use thiserror::Error;

use crate::config::{Config, Credentials, TranslationProvider};

mod google_translate;
mod libre_translate;

pub use google_translate::GoogleTranslator;
pub use libre_translate::LibreTranslator;

/// Errors returned by a translation request
#[derive(Error, Debug)]
pub enum TranslateError {
    /// Transport or body decoding failure
    #[error("translation request failed: {0}")]
    Request(#[from] ureq::Error),
    /// The service answered with a non success status
    #[error("translation service returned {status}: {body}")]
    Status {
        /// Http status code
        status: u16,
        /// Response body, usually the provider's error message
        body: String,
    },
    /// The response had no translated text
    #[error("no translation in response")]
    MissingTranslation,
}

/// A service able to translate a single text.
pub trait Translate {
    /// Translate `text` into `target_lang`
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError>;
}

impl<T: Translate + ?Sized> Translate for Box<T> {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError> {
        (**self).translate(text, target_lang)
    }
}

///
/// Creates the client of the provider selected
pub fn build_translator(config: &Config, credentials: &Credentials) -> Box<dyn Translate> {
    let api_key = credentials.api_key.clone();

    match config.provider {
        TranslationProvider::GOOGLE => Box::new(GoogleTranslator::new(api_key)),
        TranslationProvider::LIBRETRANSLATE => Box::new(LibreTranslator::new(
            api_key,
            config.libre_translate_url.clone(),
        )),
    }
}
