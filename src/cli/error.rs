//! CLI-level errors (wraps infrastructure errors)

use std::io;

use thiserror::Error;

use crate::application::ApplicationError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => exitcode::USAGE,
            CliError::Infra(InfraError::Application(e)) => match e {
                ApplicationError::Domain(_) => exitcode::DATAERR,
                ApplicationError::NoDocumentPath(_) => exitcode::USAGE,
                ApplicationError::Config { .. } => exitcode::CONFIG,
                ApplicationError::OperationFailed { source, .. } => {
                    match source.downcast_ref::<io::Error>().map(io::Error::kind) {
                        Some(io::ErrorKind::NotFound) => exitcode::NOINPUT,
                        // codecs report malformed documents as InvalidData
                        Some(io::ErrorKind::InvalidData) | None => exitcode::DATAERR,
                        Some(_) => exitcode::IOERR,
                    }
                }
            },
        }
    }
}
