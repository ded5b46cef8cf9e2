use std::{io, path::PathBuf};

use thiserror::Error;

use crate::{config::CredentialsError, utils::languages::LanguageNormalizeError};

/// Errors that stop a translation run
#[derive(Error, Debug)]
pub enum Error {
    /// The input file could not be read
    #[error("could not read `{}`: {source}", .path.display())]
    ReadInput {
        /// Input file
        path: PathBuf,
        /// Underlying io error
        source: io::Error,
    },
    /// The output file could not be written
    #[error("could not write `{}`: {source}", .path.display())]
    WriteOutput {
        /// Output file
        path: PathBuf,
        /// Underlying io error
        source: io::Error,
    },
    /// Credentials could not be loaded
    #[error(transparent)]
    Credentials(#[from] CredentialsError),
    /// The target language is not supported by the provider
    #[error(transparent)]
    Language(#[from] LanguageNormalizeError),
}
