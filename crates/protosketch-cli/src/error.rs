use std::path::PathBuf;

use protosketch_dsl::SketchError;

/// Exit codes for the CLI process.
///
/// - 0: success
/// - 1: general error (IO, file not readable)
/// - 2: invalid arguments / usage error (produced by clap)
/// - 3: translation error in the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidArguments = 2,
    TranslateError = 3,
}

/// Errors returned by the CLI entry point.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Scanning or translation failed inside the input file.
    #[error("translation failed in {file}")]
    Translate {
        error: SketchError,
        source_text: String,
        file: PathBuf,
    },

    /// IO errors (file not found, permission denied).
    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl CliError {
    /// Maps this error to the appropriate exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Translate { .. } => ExitCode::TranslateError,
            Self::Io { .. } => ExitCode::GeneralError,
        }
    }
}
