//! CLI support for rdd-translate
//!
//! The file and stdin handling behind the `rdd2df` binary, usable on its own
//! by tools that embed the translator.

mod docs;
mod translate;

pub use docs::get_grammar_reference;
pub use translate::{
    CheckOptions, DEFAULT_SUFFIX, FileOutcome, TranslateOptions, execute_check, output_path_for,
    translate_file,
};

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::TranslateError;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Translation of an inline or piped source failed
    #[error("Parsing error: {0}")]
    Translate(#[from] TranslateError),

    /// Translation of a file failed; nothing was written for it
    #[error("{}: parsing error: {source}", path.display())]
    TranslateFile {
        path: PathBuf,
        #[source]
        source: TranslateError,
    },

    #[error("Could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not create output file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot derive an output file name from {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No input provided. Pass a pipeline as an argument or pipe it to stdin.")]
    NoInput,

    #[error("{failed} of {total} file(s) failed to translate")]
    Failed { failed: usize, total: usize },
}
