//! Domain errors for the case access module.

use case_access_sdk::{CaseAccessError, DenialCode, DirectoryError, LookupError};

/// Internal domain errors.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    /// A check or precondition refused the caller.
    #[error("access denied: {code}")]
    Denied { code: DenialCode },

    /// Caller data cannot be turned into a usable context.
    #[error("unprocessable caller data: {code}")]
    Unprocessable { code: DenialCode },

    #[error("account not found for identity '{identity}'")]
    AccountNotFound { identity: String },

    #[error("account directory error: {0}")]
    Directory(String),

    #[error("case record lookup error: {0}")]
    Lookup(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    #[must_use]
    pub fn denied(code: DenialCode) -> Self {
        Self::Denied { code }
    }

    #[must_use]
    pub fn unprocessable(code: DenialCode) -> Self {
        Self::Unprocessable { code }
    }

    /// Denial code carried by refusals.
    #[must_use]
    pub fn code(&self) -> Option<DenialCode> {
        match self {
            Self::Denied { code } | Self::Unprocessable { code } => Some(*code),
            Self::AccountNotFound { .. }
            | Self::Directory(_)
            | Self::Lookup(_)
            | Self::Internal(_) => None,
        }
    }
}

impl From<DirectoryError> for DomainError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::AccountNotFound(identity) => Self::AccountNotFound { identity },
            DirectoryError::UnknownRoleKind(_) => Self::unprocessable(DenialCode::UnknownRoleKind),
            DirectoryError::Unavailable(msg) => Self::Directory(msg),
            DirectoryError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<LookupError> for DomainError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::Unavailable(msg) => Self::Lookup(msg),
            LookupError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<DomainError> for CaseAccessError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Denied { code } => Self::Forbidden(code),
            DomainError::Unprocessable { code } => Self::Unprocessable(code),
            DomainError::AccountNotFound { identity } => {
                Self::NotFound(format!("no account for identity '{identity}'"))
            }
            DomainError::Directory(msg) => {
                Self::ServiceUnavailable(format!("account directory: {msg}"))
            }
            DomainError::Lookup(msg) => Self::ServiceUnavailable(format!("case records: {msg}")),
            DomainError::Internal(msg) => Self::Internal(msg),
        }
    }
}
