//! Verification pipeline for the case access module.

use std::sync::Arc;

use case_access_sdk::{
    AccountDirectoryClient, CaseRecordLookupClient, DenialCode, ValidationRequest, VerifiedAccess,
};
use tracing::{debug, warn};

use super::context_builder::build_context;
use super::error::DomainError;
use super::evaluator::{evaluate_caller_check, evaluate_phase, evaluate_resource_check};
use super::state::{Stage, ValidationState};
use super::visibility::scope_for;
use crate::config::VisibilityConfig;

/// Case access service.
///
/// Holds only its collaborators and configuration; every call to
/// [`Service::verify`] works on its own [`ValidationState`].
pub struct Service {
    directory: Arc<dyn AccountDirectoryClient>,
    records: Arc<dyn CaseRecordLookupClient>,
    visibility: VisibilityConfig,
}

impl Service {
    #[must_use]
    pub fn new(
        directory: Arc<dyn AccountDirectoryClient>,
        records: Arc<dyn CaseRecordLookupClient>,
        visibility: VisibilityConfig,
    ) -> Self {
        Self {
            directory,
            records,
            visibility,
        }
    }

    /// Resolve the caller of `request` and evaluate its checks.
    ///
    /// Identity, role and context resolution always run and stop at the
    /// first failure. Caller-level checks run if any are registered.
    /// Resource-level checks run if any are registered and a target
    /// resource is set.
    ///
    /// # Errors
    ///
    /// - `Denied` with the code of the failed precondition or phase
    /// - `Unprocessable` for unusable role data
    /// - `AccountNotFound`, `Directory`, `Lookup`, `Internal` from collaborators
    #[tracing::instrument(
        skip_all,
        fields(
            role_id = ?request.role_id(),
            target_resource_id = ?request.target_resource_id(),
            caller_checks = request.caller_checks().len(),
            resource_checks = request.resource_checks().len(),
        )
    )]
    pub async fn verify(&self, request: &ValidationRequest) -> Result<VerifiedAccess, DomainError> {
        self.run(request).await.inspect_err(|e| {
            if let Some(code) = e.code() {
                warn!(code = %code, "case access denied");
            }
        })
    }

    async fn run(&self, request: &ValidationRequest) -> Result<VerifiedAccess, DomainError> {
        let mut state = ValidationState::new();

        if request.identity().is_empty() {
            return Err(DomainError::denied(DenialCode::CallerNotLoaded));
        }
        let caller = self.directory.get_account(request.identity()).await?;
        if !caller.is_active {
            return Err(DomainError::denied(DenialCode::CallerNotActive));
        }
        let account_id = caller.id;
        state.set_caller(caller)?;
        debug!(%account_id, "caller resolved");

        let role = self
            .directory
            .get_active_role(account_id, request.role_id())
            .await?
            .filter(|r| r.is_active)
            .ok_or_else(|| DomainError::denied(DenialCode::MissingCurrentRole))?;
        state.set_role(role)?;

        let context = build_context(state.caller()?, state.role()?)?;
        debug!(
            role_id = %context.current_role.id,
            role_kind = %context.current_role.kind,
            "domain context built"
        );
        state.set_context(context)?;

        if !request.caller_checks().is_empty() {
            let caller = state.caller()?;
            let context = state.context()?;
            evaluate_phase(request.caller_checks(), |check| {
                evaluate_caller_check(check, caller, context)
            })
            .map_err(DomainError::denied)?;
            state.advance(Stage::CallerChecksEvaluated)?;
            debug!("caller checks passed");
        }

        if !request.resource_checks().is_empty() {
            if let Some(resource_id) = request.target_resource_id() {
                let scope = scope_for(state.context()?, resource_id, &self.visibility)?;
                let resource = self.records.find_visible(&scope).await?;
                debug!(%resource_id, visible = resource.is_some(), "resource looked up");
                state.set_resource(resource)?;

                let context = state.context()?;
                let resource = state.resource()?;
                evaluate_phase(request.resource_checks(), |check| {
                    evaluate_resource_check(check, context, resource)
                })
                .map_err(DomainError::denied)?;
                state.advance(Stage::ResourceChecksEvaluated)?;
                debug!("resource checks passed");
            } else {
                debug!("resource checks registered without a target resource, skipping");
            }
        }

        state.into_verified()
    }
}
