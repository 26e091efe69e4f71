//! Role assignment to domain context mapping.

use case_access_sdk::{
    CallerAccount, ContextScope, CurrentRole, DenialCode, DomainContext, RoleAssignment, RoleKind,
};

use super::error::DomainError;

/// Build the domain context for `caller` operating under `role`.
///
/// Owners need an organisation; accessors and qualifying accessors need an
/// organisation and an organisation unit; assessors and admins need neither.
///
/// # Errors
///
/// `Denied(MissingOrganisationContext)` or
/// `Denied(MissingOrganisationUnitContext)` when the assignment lacks the
/// organisational data its kind requires.
pub fn build_context(
    caller: &CallerAccount,
    role: &RoleAssignment,
) -> Result<DomainContext, DomainError> {
    let scope = match role.kind {
        RoleKind::Owner => {
            let organisation = role
                .organisation
                .clone()
                .ok_or_else(|| DomainError::denied(DenialCode::MissingOrganisationContext))?;
            ContextScope::Owner { organisation }
        }
        RoleKind::Accessor | RoleKind::QualifyingAccessor => {
            match (&role.organisation, &role.organisation_unit) {
                (Some(organisation), Some(organisation_unit)) => ContextScope::Accessor {
                    organisation: organisation.clone(),
                    organisation_unit: organisation_unit.clone(),
                },
                _ => {
                    return Err(DomainError::denied(
                        DenialCode::MissingOrganisationUnitContext,
                    ));
                }
            }
        }
        RoleKind::Assessor | RoleKind::Admin => ContextScope::Unscoped,
    };

    Ok(DomainContext {
        caller_id: caller.id,
        caller_identity: caller.external_identity.clone(),
        current_role: CurrentRole {
            id: role.id,
            kind: role.kind,
        },
        scope,
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use case_access_sdk::{OrganisationRef, OrganisationUnitRef};
    use uuid::Uuid;

    use super::*;

    fn caller() -> CallerAccount {
        CallerAccount {
            id: Uuid::new_v4(),
            external_identity: "ext-1".to_owned(),
            display_name: "Sam".to_owned(),
            email: "sam@example.com".to_owned(),
            phone: None,
            is_active: true,
            role_assignments: vec![],
        }
    }

    fn org() -> OrganisationRef {
        OrganisationRef {
            id: Uuid::new_v4(),
            name: "Health Org".to_owned(),
            acronym: Some("HO".to_owned()),
        }
    }

    fn unit(org: &OrganisationRef) -> OrganisationUnitRef {
        OrganisationUnitRef {
            id: Uuid::new_v4(),
            organisation_id: org.id,
            name: "Unit A".to_owned(),
            acronym: None,
        }
    }

    fn role(
        kind: RoleKind,
        organisation: Option<OrganisationRef>,
        organisation_unit: Option<OrganisationUnitRef>,
    ) -> RoleAssignment {
        RoleAssignment {
            id: Uuid::new_v4(),
            kind,
            is_active: true,
            organisation,
            organisation_unit,
        }
    }

    #[test]
    fn every_role_kind_satisfies_its_organisation_shape() {
        let caller = caller();
        let o = org();
        let u = unit(&o);

        for kind in [
            RoleKind::Owner,
            RoleKind::Accessor,
            RoleKind::QualifyingAccessor,
            RoleKind::Assessor,
            RoleKind::Admin,
        ] {
            let r = role(kind, Some(o.clone()), Some(u.clone()));
            let ctx = build_context(&caller, &r).unwrap();
            assert_eq!(ctx.current_role.kind, kind);
            assert_eq!(ctx.current_role.id, r.id);
            assert_eq!(ctx.caller_id, caller.id);
            match kind {
                RoleKind::Owner => {
                    assert_eq!(ctx.organisation(), Some(&o));
                    assert!(ctx.organisation_unit().is_none());
                }
                RoleKind::Accessor | RoleKind::QualifyingAccessor => {
                    assert_eq!(ctx.organisation(), Some(&o));
                    assert_eq!(ctx.organisation_unit(), Some(&u));
                }
                RoleKind::Assessor | RoleKind::Admin => {
                    assert_eq!(ctx.scope, ContextScope::Unscoped);
                }
            }
        }
    }

    #[test]
    fn owner_without_organisation_fails() {
        let err = build_context(&caller(), &role(RoleKind::Owner, None, None)).unwrap_err();
        assert_eq!(err.code(), Some(DenialCode::MissingOrganisationContext));
    }

    #[test]
    fn accessor_without_unit_fails() {
        let err = build_context(&caller(), &role(RoleKind::Accessor, Some(org()), None))
            .unwrap_err();
        assert_eq!(err.code(), Some(DenialCode::MissingOrganisationUnitContext));

        let o = org();
        let err = build_context(
            &caller(),
            &role(RoleKind::QualifyingAccessor, None, Some(unit(&o))),
        )
        .unwrap_err();
        assert_eq!(err.code(), Some(DenialCode::MissingOrganisationUnitContext));
    }

    #[test]
    fn assessor_ignores_missing_organisation() {
        let ctx = build_context(&caller(), &role(RoleKind::Assessor, None, None)).unwrap();
        assert!(ctx.organisation().is_none());
    }
}
