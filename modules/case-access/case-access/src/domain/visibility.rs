//! Role-scoped visibility of case records.

use case_access_sdk::{
    ContextScope, DenialCode, DomainContext, RoleKind, VisibilityConstraint, VisibilityFilter,
    VisibilityScope,
};
use uuid::Uuid;

use super::error::DomainError;
use crate::config::VisibilityConfig;

/// Build the lookup scope for `resource_id` as seen by `context`.
///
/// | Role | Visible when |
/// |---|---|
/// | Owner | owned by the caller, or the caller is an active collaborator |
/// | Assessor | status in `assessor_statuses` |
/// | Accessor | shared with the caller's organisation, status in `accessor_statuses`, and supported by the caller's unit with a status in `support_statuses` |
/// | Qualifying accessor | as accessor, without the unit support requirement |
/// | Admin | always |
///
/// # Errors
///
/// `Unprocessable(MissingOrganisationUnitContext)` if an accessor context
/// carries no organisation or unit.
pub fn scope_for(
    context: &DomainContext,
    resource_id: Uuid,
    config: &VisibilityConfig,
) -> Result<VisibilityScope, DomainError> {
    let scope = match context.role_kind() {
        RoleKind::Owner => VisibilityScope::from_constraints(
            resource_id,
            vec![
                VisibilityConstraint::new(vec![VisibilityFilter::OwnedBy {
                    account_id: context.caller_id,
                }]),
                VisibilityConstraint::new(vec![VisibilityFilter::ActiveCollaborator {
                    account_id: context.caller_id,
                }]),
            ],
        ),
        RoleKind::Assessor => VisibilityScope::single(
            resource_id,
            VisibilityConstraint::new(vec![VisibilityFilter::StatusIn {
                statuses: config.assessor_statuses.clone(),
            }]),
        ),
        kind @ (RoleKind::Accessor | RoleKind::QualifyingAccessor) => {
            let ContextScope::Accessor {
                organisation,
                organisation_unit,
            } = &context.scope
            else {
                return Err(DomainError::unprocessable(
                    DenialCode::MissingOrganisationUnitContext,
                ));
            };

            let mut constraint = VisibilityConstraint::new(vec![
                VisibilityFilter::SharedWithOrganisation {
                    organisation_id: organisation.id,
                },
                VisibilityFilter::StatusIn {
                    statuses: config.accessor_statuses.clone(),
                },
            ]);
            if kind == RoleKind::Accessor {
                constraint = constraint.and(VisibilityFilter::SupportedByUnit {
                    organisation_unit_id: organisation_unit.id,
                    statuses: config.support_statuses.clone(),
                });
            }
            VisibilityScope::single(resource_id, constraint)
        }
        RoleKind::Admin => VisibilityScope::allow_all(resource_id),
    };

    Ok(scope)
}
