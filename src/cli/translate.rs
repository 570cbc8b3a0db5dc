//! Translate pipeline files and inline sources

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::CliError;
use crate::{Translation, TranslatorConfig, translate_with};

/// Appended to the input's file stem to name the output file.
pub const DEFAULT_SUFFIX: &str = "_output_in_dataframe";

/// Options for translating files
#[derive(Debug, Clone)]
pub struct TranslateOptions {
    pub config: TranslatorConfig,
    /// Output file name suffix, placed before the `.scala` extension
    pub suffix: String,
    /// Skip writing output files
    pub to_stdout: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        TranslateOptions {
            config: TranslatorConfig::default(),
            suffix: DEFAULT_SUFFIX.to_string(),
            to_stdout: false,
        }
    }
}

/// Result of translating one file
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    /// Where the translation was written, unless writing was skipped
    pub output: Option<PathBuf>,
    pub translation: Translation,
}

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Pipeline source text
    pub source: String,
    pub config: TranslatorConfig,
}

/// `dir/job.scala` -> `dir/job<suffix>.scala`
pub fn output_path_for(input: &Path, suffix: &str) -> Result<PathBuf, CliError> {
    let stem = input
        .file_stem()
        .ok_or_else(|| CliError::InvalidPath(input.to_path_buf()))?;

    let mut name = stem.to_os_string();
    name.push(suffix);
    name.push(".scala");
    Ok(input.with_file_name(name))
}

/// Translate one file as an independent unit. A failed translation writes
/// nothing.
pub fn translate_file(input: &Path, options: &TranslateOptions) -> Result<FileOutcome, CliError> {
    let source = fs::read_to_string(input).map_err(|source| CliError::Read {
        path: input.to_path_buf(),
        source,
    })?;

    let translation = translate_with(&source, &options.config).map_err(|source| {
        warn!(input = %input.display(), kind = ?source.kind(), "translation failed");
        CliError::TranslateFile {
            path: input.to_path_buf(),
            source,
        }
    })?;

    let output = if options.to_stdout {
        None
    } else {
        let path = output_path_for(input, &options.suffix)?;
        fs::write(&path, translation.text()).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?;
        Some(path)
    };

    info!(
        input = %input.display(),
        transformations = translation.symbol_tables().len(),
        "translated file"
    );

    Ok(FileOutcome {
        input: input.to_path_buf(),
        output,
        translation,
    })
}

/// Translate an inline source
pub fn execute_check(options: &CheckOptions) -> Result<Translation, CliError> {
    Ok(translate_with(&options.source, &options.config)?)
}
