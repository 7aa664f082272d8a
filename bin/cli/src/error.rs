//! Domain error types for CLI commands.

use std::fmt;
use std::path::PathBuf;

/// Errors surfaced by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded from the environment.
    Config { details: String },
    /// The input file could not be read.
    ReadFailed { path: PathBuf, details: String },
    /// The input file is not a valid workflow document.
    InvalidWorkflow { path: PathBuf, details: String },
    /// The document could not be serialized.
    SerializeFailed { details: String },
    /// The output file could not be written.
    WriteFailed { path: PathBuf, details: String },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { details } => write!(f, "failed to load configuration: {details}"),
            Self::ReadFailed { path, details } => {
                write!(f, "failed to read '{}': {details}", path.display())
            }
            Self::InvalidWorkflow { path, details } => {
                write!(f, "'{}' is not a valid workflow: {details}", path.display())
            }
            Self::SerializeFailed { details } => {
                write!(f, "failed to serialize workflow: {details}")
            }
            Self::WriteFailed { path, details } => {
                write!(f, "failed to write '{}': {details}", path.display())
            }
        }
    }
}

impl std::error::Error for CliError {}
