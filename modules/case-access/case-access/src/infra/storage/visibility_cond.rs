use case_access_sdk::{CollaboratorStatus, VisibilityFilter, VisibilityScope};
use sea_orm::sea_query::{Expr, Query, SimpleExpr};
use sea_orm::{ColumnTrait, Condition};

use super::entity::{case_collaborator, case_record, case_share, case_support};

/// Build a deny-all condition (`WHERE false`).
fn deny_all() -> Condition {
    Condition::all().add(Expr::value(false))
}

/// Builds the `WHERE` condition on `case_records` for a [`VisibilityScope`].
///
/// # OR/AND Semantics
///
/// - Constraints are OR-ed
/// - Filters within a constraint are AND-ed
/// - The resource id predicate is always AND-ed on top
///
/// | Scope | Behavior |
/// |-------|----------|
/// | deny-all | `WHERE id = ? AND false` |
/// | unconstrained | `WHERE id = ?` |
/// | constrained | `WHERE id = ? AND (c1 OR c2 ...)` |
#[must_use]
pub fn build_visibility_condition(scope: &VisibilityScope) -> Condition {
    let by_id = Condition::all().add(case_record::Column::Id.eq(scope.resource_id()));

    if scope.is_unconstrained() {
        return by_id;
    }
    if scope.is_deny_all() {
        return by_id.add(deny_all());
    }

    let mut or_cond = Condition::any();
    for constraint in scope.constraints() {
        let mut and_cond = Condition::all();
        for filter in constraint.filters() {
            and_cond = and_cond.add(filter_expr(filter));
        }
        or_cond = or_cond.add(and_cond);
    }
    by_id.add(or_cond)
}

fn filter_expr(filter: &VisibilityFilter) -> SimpleExpr {
    match filter {
        VisibilityFilter::OwnedBy { account_id } => case_record::Column::OwnerId.eq(*account_id),
        VisibilityFilter::ActiveCollaborator { account_id } => {
            case_record::Column::Id.in_subquery(
                Query::select()
                    .column(case_collaborator::Column::CaseId)
                    .from(case_collaborator::Entity)
                    .and_where(case_collaborator::Column::AccountId.eq(*account_id))
                    .and_where(
                        case_collaborator::Column::Status.eq(CollaboratorStatus::Active.as_str()),
                    )
                    .to_owned(),
            )
        }
        VisibilityFilter::StatusIn { statuses } => {
            case_record::Column::Status.is_in(statuses.iter().map(|s| s.as_str()))
        }
        VisibilityFilter::SharedWithOrganisation { organisation_id } => {
            case_record::Column::Id.in_subquery(
                Query::select()
                    .column(case_share::Column::CaseId)
                    .from(case_share::Entity)
                    .and_where(case_share::Column::OrganisationId.eq(*organisation_id))
                    .to_owned(),
            )
        }
        VisibilityFilter::SupportedByUnit {
            organisation_unit_id,
            statuses,
        } => case_record::Column::Id.in_subquery(
            Query::select()
                .column(case_support::Column::CaseId)
                .from(case_support::Entity)
                .and_where(case_support::Column::OrganisationUnitId.eq(*organisation_unit_id))
                .and_where(case_support::Column::Status.is_in(statuses.iter().map(|s| s.as_str())))
                .to_owned(),
        ),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use case_access_sdk::{CaseStatus, SupportStatus, VisibilityConstraint};
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};
    use uuid::Uuid;

    use super::*;

    fn render(scope: &VisibilityScope) -> String {
        case_record::Entity::find()
            .filter(build_visibility_condition(scope))
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn allow_all_only_filters_by_id() {
        let sql = render(&VisibilityScope::allow_all(Uuid::new_v4()));
        assert!(sql.contains("\"case_records\".\"id\" ="));
        assert!(!sql.contains("case_shares"));
        assert!(!sql.contains(" OR "));
    }

    #[test]
    fn owner_scope_is_or_of_owner_and_collaborator() {
        let account = Uuid::new_v4();
        let scope = VisibilityScope::from_constraints(
            Uuid::new_v4(),
            vec![
                VisibilityConstraint::new(vec![VisibilityFilter::OwnedBy {
                    account_id: account,
                }]),
                VisibilityConstraint::new(vec![VisibilityFilter::ActiveCollaborator {
                    account_id: account,
                }]),
            ],
        );
        let sql = render(&scope);
        assert!(sql.contains("\"owner_id\""));
        assert!(sql.contains(" OR "));
        assert!(sql.contains("case_collaborators"));
        assert!(sql.contains("'ACTIVE'"));
    }

    #[test]
    fn accessor_scope_ands_share_status_and_support() {
        let scope = VisibilityScope::single(
            Uuid::new_v4(),
            VisibilityConstraint::new(vec![
                VisibilityFilter::SharedWithOrganisation {
                    organisation_id: Uuid::new_v4(),
                },
                VisibilityFilter::StatusIn {
                    statuses: vec![CaseStatus::InProgress, CaseStatus::Complete],
                },
                VisibilityFilter::SupportedByUnit {
                    organisation_unit_id: Uuid::new_v4(),
                    statuses: vec![SupportStatus::Active, SupportStatus::Closed],
                },
            ]),
        );
        let sql = render(&scope);
        assert!(sql.contains("case_shares"));
        assert!(sql.contains("case_supports"));
        assert!(sql.contains("'IN_PROGRESS'"));
        assert!(sql.contains("'CLOSED'"));
        assert!(!sql.contains(" OR "));
    }
}
