//! Per-verification pipeline state.

use case_access_sdk::{
    CallerAccount, DenialCode, DomainContext, ResourceSummary, RoleAssignment, VerifiedAccess,
};

use super::error::DomainError;

/// Pipeline stages, in the only order they can be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Unresolved,
    IdentityResolved,
    RoleResolved,
    ContextBuilt,
    CallerChecksEvaluated,
    ResourceLoaded,
    ResourceChecksEvaluated,
    Verified,
}

/// Data resolved so far for one verification.
///
/// Created per call and dropped at the end of it; never shared.
#[derive(Debug)]
pub struct ValidationState {
    stage: Stage,
    caller: Option<CallerAccount>,
    role: Option<RoleAssignment>,
    context: Option<DomainContext>,
    resource: Option<ResourceSummary>,
}

impl Default for ValidationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stage: Stage::Unresolved,
            caller: None,
            role: None,
            context: None,
            resource: None,
        }
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Move forward to `next`.
    ///
    /// # Errors
    ///
    /// `Internal` if `next` is not after the current stage.
    pub fn advance(&mut self, next: Stage) -> Result<(), DomainError> {
        if next <= self.stage {
            return Err(DomainError::Internal(format!(
                "invalid stage transition {:?} -> {next:?}",
                self.stage
            )));
        }
        tracing::trace!(from = ?self.stage, to = ?next, "validation stage");
        self.stage = next;
        Ok(())
    }

    /// Record the resolved caller account.
    ///
    /// # Errors
    ///
    /// See [`ValidationState::advance`].
    pub fn set_caller(&mut self, caller: CallerAccount) -> Result<(), DomainError> {
        self.advance(Stage::IdentityResolved)?;
        self.caller = Some(caller);
        Ok(())
    }

    /// Record the selected role assignment.
    ///
    /// # Errors
    ///
    /// See [`ValidationState::advance`].
    pub fn set_role(&mut self, role: RoleAssignment) -> Result<(), DomainError> {
        self.advance(Stage::RoleResolved)?;
        self.role = Some(role);
        Ok(())
    }

    /// Record the built domain context.
    ///
    /// # Errors
    ///
    /// See [`ValidationState::advance`].
    pub fn set_context(&mut self, context: DomainContext) -> Result<(), DomainError> {
        self.advance(Stage::ContextBuilt)?;
        self.context = Some(context);
        Ok(())
    }

    /// Record the outcome of the role-scoped lookup. `None` means not
    /// visible.
    ///
    /// # Errors
    ///
    /// See [`ValidationState::advance`].
    pub fn set_resource(&mut self, resource: Option<ResourceSummary>) -> Result<(), DomainError> {
        self.advance(Stage::ResourceLoaded)?;
        self.resource = resource;
        Ok(())
    }

    /// # Errors
    ///
    /// `Denied(CallerNotLoaded)` before identity resolution.
    pub fn caller(&self) -> Result<&CallerAccount, DomainError> {
        self.caller
            .as_ref()
            .ok_or_else(|| DomainError::denied(DenialCode::CallerNotLoaded))
    }

    /// # Errors
    ///
    /// `Denied(MissingCurrentRole)` before role resolution.
    pub fn role(&self) -> Result<&RoleAssignment, DomainError> {
        self.role
            .as_ref()
            .ok_or_else(|| DomainError::denied(DenialCode::MissingCurrentRole))
    }

    /// # Errors
    ///
    /// `Denied(MissingDomainContext)` before the context is built.
    pub fn context(&self) -> Result<&DomainContext, DomainError> {
        self.context
            .as_ref()
            .ok_or_else(|| DomainError::denied(DenialCode::MissingDomainContext))
    }

    /// The looked-up resource, `None` if it was not visible.
    ///
    /// # Errors
    ///
    /// `Denied(ResourceNotLoaded)` before the lookup ran.
    pub fn resource(&self) -> Result<Option<&ResourceSummary>, DomainError> {
        if self.stage < Stage::ResourceLoaded {
            return Err(DomainError::denied(DenialCode::ResourceNotLoaded));
        }
        Ok(self.resource.as_ref())
    }

    /// Finish the pipeline and hand out the verified view.
    ///
    /// # Errors
    ///
    /// `Denied(CallerNotLoaded)` / `Denied(MissingDomainContext)` if the
    /// unconditional stages did not complete, or a transition error.
    pub fn into_verified(mut self) -> Result<VerifiedAccess, DomainError> {
        self.advance(Stage::Verified)?;
        let caller = self
            .caller
            .ok_or_else(|| DomainError::denied(DenialCode::CallerNotLoaded))?;
        let context = self
            .context
            .ok_or_else(|| DomainError::denied(DenialCode::MissingDomainContext))?;
        Ok(VerifiedAccess::new(caller, context, self.resource))
    }
}
