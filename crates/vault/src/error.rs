//! Vault error types.

/// Errors produced while resolving secret references.
///
/// Every variant is a secret-resolution failure: the credential write for the
/// affected user must be abandoned, and nothing on disk is touched.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// The resolver CLI is not installed or not on `PATH`.
    #[error("secret resolver '{program}' is not installed or not on PATH")]
    NotInstalled { program: String },

    /// The resolver ran but reported a failure.
    #[error("failed to resolve '{reference}': {reason}")]
    Failed { reference: String, reason: String },

    /// The resolver did not finish in time.
    #[error("timed out after {timeout_ms}ms resolving '{reference}'")]
    TimedOut { reference: String, timeout_ms: u64 },

    /// The resolver succeeded but printed nothing.
    #[error("'{reference}' resolved to an empty value")]
    Empty { reference: String },
}

impl VaultError {
    #[must_use]
    pub fn failed(reference: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Failed {
            reference: reference.into(),
            reason: reason.to_string(),
        }
    }

    /// The reference that failed, when one was being resolved.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::NotInstalled { .. } => None,
            Self::Failed { reference, .. }
            | Self::TimedOut { reference, .. }
            | Self::Empty { reference } => Some(reference),
        }
    }
}

pub type Result<T> = std::result::Result<T, VaultError>;
