//! Error taxonomy for the initialization workflow.

use std::path::PathBuf;

use thiserror::Error;

use crate::probe::ProbeError;

/// Failures the workflow reports to the operator.
///
/// All of these are caught inside `bootstrap::run`, printed, and turned into
/// an outcome. Nothing here is retried; every external check runs exactly
/// once per invocation.
#[derive(Debug, Error)]
pub enum InitError {
    /// The lock marker exists. Informational, not a defect.
    #[error("Already initialized. If you want to reinitialize, delete {}", lock_path.display())]
    AlreadyInitialized { lock_path: PathBuf },

    /// Candidate credentials failed to establish a live connection.
    #[error("Failed to connect to {system}: {message}")]
    Connectivity { system: &'static str, message: String },

    /// The server was reachable but the CREATE DATABASE statement failed.
    #[error("Failed to create database: {message}")]
    SchemaCreation { message: String },

    /// Neither the requested locale nor the fallback locale has a timezone
    /// entry. Surfaced explicitly rather than inventing a default.
    #[error("No timezone mapping for locale '{locale}'")]
    LookupMiss { locale: String },
}

impl From<ProbeError> for InitError {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::Connect { system, message } => InitError::Connectivity { system, message },
            ProbeError::Schema { message } => InitError::SchemaCreation { message },
        }
    }
}
