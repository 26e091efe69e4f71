//! Pure evaluation of registered checks.
//!
//! Every function here returns `None` when the check passes and the denial
//! code otherwise. Nothing here performs I/O or raises.

use case_access_sdk::{
    AccessorCheck, AdminCheck, CallerAccount, CallerCheck, DenialCode, DomainContext, OwnerCheck,
    ResourceCheck, ResourceStateCheck, ResourceSummary, RoleKind,
};

/// Evaluate one caller-level check.
#[must_use]
pub fn evaluate_caller_check(
    check: &CallerCheck,
    caller: &CallerAccount,
    context: &DomainContext,
) -> Option<DenialCode> {
    match check {
        CallerCheck::SelfOnly { target_id } => {
            (caller.id != *target_id).then_some(DenialCode::CallerNotSelf)
        }
        CallerCheck::Admin(opts) => check_admin(opts, caller, context),
        CallerCheck::Assessor => {
            (context.role_kind() != RoleKind::Assessor).then_some(DenialCode::RoleKindNotAllowed)
        }
        CallerCheck::Accessor(opts) => check_accessor(opts, caller, context),
        CallerCheck::Owner(opts) => check_owner(opts, caller, context),
    }
}

// `any_of_roles` is matched against every held assignment, not only the current one.
fn check_admin(
    opts: &AdminCheck,
    caller: &CallerAccount,
    context: &DomainContext,
) -> Option<DenialCode> {
    if context.role_kind() != RoleKind::Admin {
        return Some(DenialCode::RoleKindNotAllowed);
    }
    if let Some(roles) = &opts.any_of_roles
        && !caller.holds_any_role(roles)
    {
        return Some(DenialCode::RoleKindNotAllowed);
    }
    None
}

fn check_accessor(
    opts: &AccessorCheck,
    caller: &CallerAccount,
    context: &DomainContext,
) -> Option<DenialCode> {
    let kind = context.role_kind();
    if !kind.is_accessor() {
        return Some(DenialCode::RoleKindNotAllowed);
    }
    let (Some(organisation), Some(unit)) = (context.organisation(), context.organisation_unit())
    else {
        return Some(DenialCode::MissingOrganisationUnitContext);
    };
    if !caller.holds_organisation_role() {
        return Some(DenialCode::CallerWithoutOrganisation);
    }
    if let Some(org_roles) = &opts.org_roles
        && !org_roles.contains(&kind)
    {
        return Some(DenialCode::OrgRoleNotAllowed);
    }
    if opts.organisation_id.is_some_and(|id| id != organisation.id) {
        return Some(DenialCode::OrganisationNotAllowed);
    }
    if opts.organisation_unit_id.is_some_and(|id| id != unit.id) {
        return Some(DenialCode::OrganisationUnitNotAllowed);
    }
    None
}

fn check_owner(
    opts: &OwnerCheck,
    caller: &CallerAccount,
    context: &DomainContext,
) -> Option<DenialCode> {
    if context.role_kind() != RoleKind::Owner {
        return Some(DenialCode::RoleKindNotAllowed);
    }
    let Some(organisation) = context.organisation() else {
        return Some(DenialCode::MissingOrganisationContext);
    };
    if !caller.holds_organisation_role() {
        return Some(DenialCode::CallerWithoutOrganisation);
    }
    if opts.organisation_id.is_some_and(|id| id != organisation.id) {
        return Some(DenialCode::OrganisationNotAllowed);
    }
    None
}

/// Evaluate one resource-level check. `resource` is `None` when the
/// role-scoped lookup found nothing.
#[must_use]
pub fn evaluate_resource_check(
    check: &ResourceCheck,
    context: &DomainContext,
    resource: Option<&ResourceSummary>,
) -> Option<DenialCode> {
    match check {
        ResourceCheck::State(opts) => check_resource_state(opts, context, resource),
    }
}

fn check_resource_state(
    opts: &ResourceStateCheck,
    context: &DomainContext,
    resource: Option<&ResourceSummary>,
) -> Option<DenialCode> {
    let Some(resource) = resource else {
        return Some(DenialCode::ResourceUnauthorized);
    };
    if opts.is_owner && resource.owner_id != Some(context.caller_id) {
        return Some(DenialCode::ResourceNotOwner);
    }
    if let Some(rule) = &opts.status {
        let allowed = rule
            .allowed_for(context.role_kind())
            .is_some_and(|statuses| statuses.contains(&resource.status));
        if !allowed {
            return Some(DenialCode::ResourceStatusNotAllowed);
        }
    }
    None
}

/// Evaluate every check of a phase.
///
/// The phase passes if at least one check passes. Otherwise the first denial
/// in registration order is returned, falling back to `Unauthorized`.
///
/// # Errors
///
/// The denial code surfaced for the failed phase.
pub fn evaluate_phase<T>(
    checks: &[T],
    mut eval: impl FnMut(&T) -> Option<DenialCode>,
) -> Result<(), DenialCode> {
    let outcomes: Vec<Option<DenialCode>> = checks.iter().map(&mut eval).collect();

    if outcomes.iter().any(Option::is_none) {
        return Ok(());
    }
    Err(outcomes
        .into_iter()
        .flatten()
        .next()
        .unwrap_or(DenialCode::Unauthorized))
}
