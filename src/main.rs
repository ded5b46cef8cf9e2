use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use line_translate::{
    LineTranslator,
    config::{Config, DEFAULT_CREDENTIALS_PATH},
};

/// Shown when RUST_LOG is unset, keeps the keyless fallback warning visible
const DEFAULT_LOG_FILTER: &str = "warn";

/// Translate a text file line by line into English
#[derive(Parser, Debug)]
#[command(
    name = "line-translate",
    version,
    about,
    long_about = "Translate a text file line by line into English.\n\n\
        The Google api key is read from `api_key` in ./creds.json, then from \
        GOOGLE_API_KEY (a .env file is honored). A service account file has no \
        api key: without one the unauthenticated google translate web page is \
        used instead."
)]
struct Args {
    /// Input text file name/path
    input_file: PathBuf,

    /// Output text file name/path
    output_file: PathBuf,
}

fn logger() -> env_logger::Builder {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER))
}

fn main() -> anyhow::Result<()> {
    logger().init();

    let args = Args::parse();

    let cfg = Config::new()
        .input_file(&args.input_file)
        .output_file(&args.output_file)
        .target_lang("en")
        .credentials_path(DEFAULT_CREDENTIALS_PATH)
        .build();

    LineTranslator::translate(cfg)
        .with_context(|| format!("failed to translate {}", args.input_file.display()))?;

    Ok(())
}

#[test]
fn test_default_filter_shows_warnings() {
    let logger = env_logger::Builder::new()
        .parse_filters(DEFAULT_LOG_FILTER)
        .build();

    assert_eq!(logger.filter(), log::LevelFilter::Warn);
}

#[test]
fn test_help_mentions_web_fallback() {
    use clap::CommandFactory;

    let help = Args::command().render_long_help().to_string();

    assert!(help.contains("creds.json"));
    assert!(help.contains("GOOGLE_API_KEY"));
    assert!(help.contains("unauthenticated google translate web page"));
}

#[test]
fn test_args_two_positionals() {
    let args = Args::try_parse_from(["line-translate", "in.txt", "out.txt"]).unwrap();
    assert_eq!(args.input_file, PathBuf::from("in.txt"));
    assert_eq!(args.output_file, PathBuf::from("out.txt"));

    assert!(Args::try_parse_from(["line-translate", "in.txt"]).is_err());
}
