#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(test, deny(warnings))]

//! # line-translate
//!
//! The `line-translate` crate translates a text file line by line through a
//! cloud translation service while a progress meter runs on stderr.
//!
//!## Features
//! - One request per line, no batching.
//! - A line that fails is split on `.` and retried sentence by sentence.
//!   Sentences failing again are left out of the output.
//! - The [`meter`] module works on any iterator and can be used on its own.
//!
//! # Current support
//!  - Google Translate (Cloud Translate - Fallback to google translate web)
//!  - LibreTranslate (public instance with an api key, self hosted otherwise)
//!
//! # Usage
//!
//! The api key is read from a credentials file, `./creds.json` by default:
//!
//! ```json
//! { "api_key": "xyz" }
//! ```
//!
//! When the file has no key the crate falls back to env variables, a `.env`
//! file is honored:
//!
//!- **GOOGLE_API_KEY = "xyz"**
//!- **LIBRE_TRANSLATE_API_KEY = "xyz"**
//!
//! ```rust,no_run
//!use line_translate::{
//!    LineTranslator,
//!    config::{Config, TranslationProvider},
//!};
//!
//!fn main() {
//!    env_logger::init();
//!
//!    let cfg = Config::new()
//!        .input_file("./input.txt")
//!        .output_file("./output.txt")
//!        .target_lang("en")
//!        .translation_provider(TranslationProvider::GOOGLE)
//!        .build();
//!
//!    LineTranslator::translate(cfg).unwrap();
//!}
//! ```
//!

use log::{debug, info};

use std::io::{self, Write};

use crate::{
    api::{Translate, build_translator},
    config::{Config, Credentials},
    meter::{MeterOptions, ProgressMeter},
    utils::{languages::normalize_lang, load_file, split_sentences, write_output},
};

pub mod api;
pub mod config;
mod error;
pub mod meter;
mod utils;

pub use error::Error;
pub use utils::languages::LanguageNormalizeError;

/// Counters of a translation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Report {
    ///Lines read from the input
    pub lines: usize,
    ///Lines that needed the per sentence fallback
    pub fallback_lines: usize,
    ///Sentences left out because they failed too
    pub dropped_sentences: usize,
}

/// Line by line file translation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineTranslator {}

impl LineTranslator {
    /// Translate `config.input_file` into `config.output_file`.
    ///
    /// The credentials file is read from `config.credentials_path`. Each line
    /// is sent on its own to the configured provider, the output file holds
    /// one translated line per input line.
    pub fn translate(config: Config) -> Result<Report, Error> {
        let target_lang = normalize_lang(&config.provider, &config.target_lang)?;
        let credentials = Credentials::load(&config.credentials_path, &config.provider)?;
        let translator = build_translator(&config, &credentials);

        Self::translate_with(
            &Config {
                target_lang,
                ..config
            },
            &translator,
            io::stderr(),
        )
    }

    /// Same as [`LineTranslator::translate`] with an already built client,
    /// metering progress on `writer`
    pub fn translate_with<T, W>(config: &Config, translator: &T, writer: W) -> Result<Report, Error>
    where
        T: Translate + ?Sized,
        W: Write,
    {
        let lines = load_file(&config.input_file).map_err(|source| Error::ReadInput {
            path: config.input_file.clone(),
            source,
        })?;

        let (translated, report) = translate_lines(
            translator,
            lines,
            &config.target_lang,
            config.meter.clone(),
            writer,
        );

        write_output(&config.output_file, &translated).map_err(|source| Error::WriteOutput {
            path: config.output_file.clone(),
            source,
        })?;

        info!(
            "Translated {} lines into {} ({} using the sentence fallback, {} sentences dropped)",
            report.lines,
            config.output_file.display(),
            report.fallback_lines,
            report.dropped_sentences
        );

        Ok(report)
    }
}

/// Translate every line, metering progress on `writer`.
///
/// Returns one translated string per line, empty when nothing of the line
/// could be translated.
pub fn translate_lines<T, W>(
    translator: &T,
    lines: Vec<String>,
    target_lang: &str,
    meter: MeterOptions,
    writer: W,
) -> (Vec<String>, Report)
where
    T: Translate + ?Sized,
    W: Write,
{
    let mut report = Report {
        lines: lines.len(),
        ..Default::default()
    };
    let mut translated = Vec::with_capacity(lines.len());

    for line in ProgressMeter::new(lines, meter, writer) {
        match translator.translate(&line, target_lang) {
            Ok(text) => translated.push(text),
            Err(e) => {
                debug!("Line failed, retrying per sentence: {e}");
                report.fallback_lines += 1;

                let mut sentences = Vec::new();
                for sentence in split_sentences(&line) {
                    match translator.translate(sentence, target_lang) {
                        Ok(text) => sentences.push(text),
                        Err(e) => {
                            //best effort, the sentence is left out
                            debug!("Dropping sentence {sentence:?}: {e}");
                            report.dropped_sentences += 1;
                        }
                    }
                }

                translated.push(sentences.join("."));
            }
        }
    }

    (translated, report)
}

#[cfg(test)]
struct MockTranslator(std::collections::HashMap<&'static str, &'static str>);

#[cfg(test)]
impl MockTranslator {
    fn new() -> Self {
        Self(
            [
                ("hola", "hello"),
                ("uno", "one"),
                (" dos", " two"),
                ("adiós", "goodbye"),
            ]
            .into_iter()
            .collect(),
        )
    }
}

#[cfg(test)]
impl Translate for MockTranslator {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, api::TranslateError> {
        assert_eq!(target_lang, "en");
        self.0
            .get(text)
            .map(|t| t.to_string())
            .ok_or(api::TranslateError::MissingTranslation)
    }
}

#[test]
fn test_translate_lines_with_fallback() {
    let lines = vec![
        "hola".to_string(),
        "uno. dos. ???".to_string(),
        "???".to_string(),
        "adiós".to_string(),
    ];
    let mut out = Vec::new();

    let (translated, report) = translate_lines(
        &MockTranslator::new(),
        lines,
        "en",
        MeterOptions::new().label("Input Text Loop"),
        &mut out,
    );

    assert_eq!(translated, vec!["hello", "one. two", "", "goodbye"]);
    assert_eq!(
        report,
        Report {
            lines: 4,
            fallback_lines: 2,
            dropped_sentences: 2,
        }
    );

    let status = String::from_utf8(out).unwrap();
    assert!(status.starts_with("\rInput Text Loop: |----------| 0/4   0%"));
    assert!(status.ends_with('\r'));
}

#[test]
fn test_translate_with_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let output = dir.path().join("output.txt");
    std::fs::write(&input, "hola\nuno. dos\n\nadiós\n").unwrap();
    std::fs::write(&output, "stale output from a previous run").unwrap();

    let cfg = Config::new()
        .input_file(&input)
        .output_file(&output)
        .meter(MeterOptions::new().min_interval(std::time::Duration::from_secs(3600)))
        .build();

    let mut status = Vec::new();
    let report = LineTranslator::translate_with(&cfg, &MockTranslator::new(), &mut status).unwrap();

    let initial = "|----------| 0/4   0% [elapsed: 00:00 left: ?, ? iters/sec]";
    assert_eq!(
        String::from_utf8(status).unwrap(),
        format!("\r{initial}\r{}\r", " ".repeat(initial.len()))
    );
    assert_eq!(report.lines, 4);
    assert_eq!(report.fallback_lines, 2);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "hello\none. two\n\ngoodbye"
    );
}

#[test]
fn test_translate_with_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config::new()
        .input_file(dir.path().join("missing.txt"))
        .output_file(dir.path().join("out.txt"))
        .build();

    let err =
        LineTranslator::translate_with(&cfg, &MockTranslator::new(), io::sink()).unwrap_err();

    assert!(matches!(err, Error::ReadInput { .. }));
    assert!(!dir.path().join("out.txt").exists());
}

#[test]
fn test_translate_rejects_unknown_language() {
    let cfg = Config::new().target_lang("klingon").build();

    assert!(matches!(
        LineTranslator::translate(cfg),
        Err(Error::Language(_))
    ));
}
