//! CLI error types with exit code handling
//!
//! Library errors are folded into `CliError`, which knows the exit code the
//! process should terminate with.

use miette::Diagnostic;
use thiserror::Error;
use tfk8s_fetch::FetchError;
use tfk8s_kube::KubeError;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Configuration failed validation
    #[error("Validation failed: {message}")]
    #[diagnostic(code(tfk8s::cli::validation))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Kubernetes API error or missing object
    #[error("Kubernetes error: {message}")]
    #[diagnostic(code(tfk8s::cli::kube))]
    Kube {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(tfk8s::cli::io))]
    Io { message: String },

    /// Wrapped error for passthrough (stores the formatted message)
    #[error("{message}")]
    #[diagnostic(code(tfk8s::cli::error))]
    Other { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Kube { .. } => exit_codes::KUBE_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            help: None,
        }
    }

    /// Create a validation error with help text
    pub fn validation_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a general error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<miette::Report> for CliError {
    fn from(err: miette::Report) -> Self {
        CliError::Other {
            message: format!("{:?}", err),
        }
    }
}

impl From<KubeError> for CliError {
    fn from(err: KubeError) -> Self {
        match err {
            KubeError::InvalidConfig { diagnostics } => CliError::Validation {
                message: format!("{} error(s)", diagnostics.error_count()),
                help: Some(diagnostics.to_string()),
            },
            KubeError::Io(e) => e.into(),
            e @ (KubeError::Api(_) | KubeError::ObjectNotFound { .. }) => {
                let help = e
                    .is_not_found()
                    .then(|| "Check the name, namespace and current kubectl context".to_string());
                CliError::Kube {
                    message: e.to_string(),
                    help,
                }
            }
            e => CliError::Other {
                message: e.to_string(),
            },
        }
    }
}

impl From<FetchError> for CliError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Io(e) => e.into(),
            e => CliError::Other {
                message: e.to_string(),
            },
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
