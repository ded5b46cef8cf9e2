//!
//! _Config builder_
//!
//! Helps build the configuration for a translation run
//!

use normpath::PathExt;
use std::path::{Path, PathBuf};

use crate::meter::MeterOptions;

mod credentials;

pub use credentials::{Credentials, CredentialsError};

/// Default location of the credentials file
pub const DEFAULT_CREDENTIALS_PATH: &str = "./creds.json";

/// Providers available for translation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TranslationProvider {
    ///Google Cloud Translation
    #[default]
    GOOGLE,
    ///LibreTranslate Translations
    LIBRETRANSLATE,
}

impl TranslationProvider {
    /// Environment variable consulted when the credentials file has no key
    pub fn api_key_var(&self) -> &'static str {
        match self {
            TranslationProvider::GOOGLE => "GOOGLE_API_KEY",
            TranslationProvider::LIBRETRANSLATE => "LIBRE_TRANSLATE_API_KEY",
        }
    }
}

/// Settings of a translation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    ///Text file to translate, one request per line
    pub input_file: PathBuf,
    ///File receiving the translated lines
    pub output_file: PathBuf,
    ///Language to translate into. Default: en
    pub target_lang: String,
    ///Translation provider
    pub provider: TranslationProvider,
    ///Credentials file. Default: ./creds.json
    pub credentials_path: PathBuf,
    ///Endpoint of a LibreTranslate instance
    pub libre_translate_url: Option<String>,
    ///Progress meter shown while translating
    pub meter: MeterOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_file: "".into(),
            output_file: "".into(),
            target_lang: "en".to_string(),
            provider: Default::default(),
            credentials_path: DEFAULT_CREDENTIALS_PATH.into(),
            libre_translate_url: None,
            meter: MeterOptions::new().label("Input Text Loop"),
        }
    }
}

impl Config {
    /// Return the defaults for the config
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the file to translate
    pub fn input_file<P: AsRef<Path>>(&mut self, p: P) -> &mut Self {
        self.input_file = normalized(p.as_ref());
        self
    }

    /// Path of the translated file, overwritten if it exists
    pub fn output_file<P: AsRef<Path>>(&mut self, p: P) -> &mut Self {
        self.output_file = normalized(p.as_ref());
        self
    }

    /// Language to translate to
    pub fn target_lang<S: Into<String>>(&mut self, lang: S) -> &mut Self {
        self.target_lang = lang.into();
        self
    }

    ///Provider to use
    pub fn translation_provider(&mut self, provider: TranslationProvider) -> &mut Self {
        self.provider = provider;
        self
    }

    /// Path to the credentials file
    pub fn credentials_path<P: AsRef<Path>>(&mut self, p: P) -> &mut Self {
        self.credentials_path = p.as_ref().to_path_buf();
        self
    }

    /// Use a self hosted or mirror LibreTranslate endpoint
    pub fn libre_translate_url<S: Into<String>>(&mut self, url: S) -> &mut Self {
        self.libre_translate_url = Some(url.into());
        self
    }

    /// Progress meter settings
    pub fn meter(&mut self, meter: MeterOptions) -> &mut Self {
        self.meter = meter;
        self
    }

    /// Build the config
    pub fn build(&self) -> Self {
        self.clone()
    }
}

/// Paths that do not exist yet are kept as given.
fn normalized(p: &Path) -> PathBuf {
    p.normalize()
        .map(|base| base.into_path_buf())
        .unwrap_or_else(|_| p.to_path_buf())
}

#[test]
fn test_config_builder() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.txt");
    std::fs::write(&input, "hola").unwrap();

    let cfg = Config::new()
        .input_file(&input)
        .output_file(dir.path().join("missing").join("out.txt"))
        .target_lang("fr")
        .translation_provider(TranslationProvider::LIBRETRANSLATE)
        .libre_translate_url("http://localhost:5000/translate")
        .build();

    assert!(cfg.input_file.is_absolute());
    assert!(cfg.input_file.ends_with("in.txt"));
    assert_eq!(cfg.output_file, dir.path().join("missing").join("out.txt"));
    assert_eq!(cfg.target_lang, "fr");
    assert_eq!(cfg.provider, TranslationProvider::LIBRETRANSLATE);
    assert_eq!(cfg.credentials_path, PathBuf::from("./creds.json"));
    assert_eq!(
        cfg.libre_translate_url.as_deref(),
        Some("http://localhost:5000/translate")
    );
}

#[test]
fn test_config_defaults() {
    let cfg = Config::new();

    assert_eq!(cfg.target_lang, "en");
    assert_eq!(cfg.provider, TranslationProvider::GOOGLE);
    assert_eq!(cfg.meter.label, "Input Text Loop");
    assert!(!cfg.meter.leave);
    assert_eq!(cfg.meter.min_iters, 1);
}
