//! Public API trait for the case access validator.

use async_trait::async_trait;

use crate::checks::ValidationRequest;
use crate::error::CaseAccessError;
use crate::models::VerifiedAccess;

/// Public API trait for the case access validator.
///
/// Request handlers build a [`ValidationRequest`] and hand it over:
///
/// ```ignore
/// let access = case_access
///     .verify(ValidationRequest::new(identity).require_assessor())
///     .await?;
///
/// let ctx = access.context();
/// ```
#[async_trait]
pub trait CaseAccessClient: Send + Sync {
    /// Resolve the caller and evaluate every registered check.
    ///
    /// # Errors
    ///
    /// - `Forbidden` carrying the denial code of the first failing check
    /// - `Unprocessable` if the caller's role data is unusable
    /// - `NotFound` if no account matches the identity
    /// - `ServiceUnavailable` if a collaborator is unreachable
    /// - `Internal` for unexpected errors
    async fn verify(&self, request: ValidationRequest) -> Result<VerifiedAccess, CaseAccessError>;
}
