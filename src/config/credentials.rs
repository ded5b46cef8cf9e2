use std::{env, fs, io, path::Path};

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use super::TranslationProvider;

/// Errors while reading the credentials file
#[derive(Error, Debug)]
pub enum CredentialsError {
    /// The file exists but could not be read
    #[error("could not read credentials file: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid json
    #[error("malformed credentials file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Default, Deserialize)]
struct CredentialsFile {
    #[serde(default, alias = "key")]
    api_key: Option<String>,
}

/// Credentials handed to the translation client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    ///Api key of the provider, the free endpoints are used without one
    pub api_key: Option<String>,
}

impl Credentials {
    /// Credentials with a fixed api key
    pub fn with_api_key<S: Into<String>>(key: S) -> Self {
        Self {
            api_key: Some(key.into()),
        }
    }

    /// Load the api key from `path`, falling back to the provider's
    /// environment variable (a `.env` file is honored).
    pub fn load(path: &Path, provider: &TranslationProvider) -> Result<Self, CredentialsError> {
        Self::resolve(path, provider, |var| {
            dotenvy::dotenv().ok();
            env::var(var).ok()
        })
    }

    fn resolve<F>(
        path: &Path,
        provider: &TranslationProvider,
        lookup: F,
    ) -> Result<Self, CredentialsError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        if let Some(key) = Self::from_file(path)? {
            return Ok(Self::with_api_key(key));
        }

        let api_key = lookup(provider.api_key_var())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        if api_key.is_some() {
            debug!("Using api key from {}", provider.api_key_var());
        }

        Ok(Self { api_key })
    }

    /// Api key stored in the credentials file, `None` if the file is missing
    /// or has no key.
    pub fn from_file(path: &Path) -> Result<Option<String>, CredentialsError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No credentials file at {}", path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let parsed: CredentialsFile = serde_json::from_str(&content)?;

        Ok(parsed
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty()))
    }
}

#[test]
fn test_credentials_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("creds.json");
    fs::write(&path, r#"{"api_key": " abc123 "}"#).unwrap();

    assert_eq!(
        Credentials::from_file(&path).unwrap(),
        Some("abc123".to_string())
    );

    let creds = Credentials::load(&path, &TranslationProvider::GOOGLE).unwrap();
    assert_eq!(creds, Credentials::with_api_key("abc123"));
}

#[test]
fn test_credentials_without_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("creds.json");
    fs::write(
        &path,
        r#"{"type": "service_account", "client_email": "svc@example.iam.gserviceaccount.com"}"#,
    )
    .unwrap();

    assert_eq!(Credentials::from_file(&path).unwrap(), None);
    assert_eq!(
        Credentials::from_file(&dir.path().join("missing.json")).unwrap(),
        None
    );
}

#[test]
fn test_credentials_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("creds.json");
    fs::write(&path, "{not json").unwrap();

    assert!(matches!(
        Credentials::from_file(&path),
        Err(CredentialsError::Parse(_))
    ));
}

#[test]
fn test_credentials_env_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    let keyless = dir.path().join("creds.json");
    fs::write(&keyless, r#"{"type": "service_account"}"#).unwrap();

    for path in [&missing, &keyless] {
        let creds = Credentials::resolve(path, &TranslationProvider::GOOGLE, |var| {
            assert_eq!(var, "GOOGLE_API_KEY");
            Some(" env-key ".to_string())
        })
        .unwrap();
        assert_eq!(creds, Credentials::with_api_key("env-key"));
    }

    let creds = Credentials::resolve(&missing, &TranslationProvider::LIBRETRANSLATE, |var| {
        assert_eq!(var, "LIBRE_TRANSLATE_API_KEY");
        Some("   ".to_string())
    })
    .unwrap();
    assert_eq!(creds.api_key, None);

    let creds = Credentials::resolve(&missing, &TranslationProvider::GOOGLE, |_| None).unwrap();
    assert_eq!(creds, Credentials::default());
}

#[test]
fn test_credentials_load_reads_environment() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");

    // only this test touches LIBRE_TRANSLATE_API_KEY
    unsafe { env::set_var("LIBRE_TRANSLATE_API_KEY", "libre-key") };
    let creds = Credentials::load(&missing, &TranslationProvider::LIBRETRANSLATE).unwrap();
    assert_eq!(creds, Credentials::with_api_key("libre-key"));

    unsafe { env::set_var("LIBRE_TRANSLATE_API_KEY", "  ") };
    let creds = Credentials::load(&missing, &TranslationProvider::LIBRETRANSLATE).unwrap();
    assert_eq!(creds.api_key, None);

    unsafe { env::remove_var("LIBRE_TRANSLATE_API_KEY") };
}
