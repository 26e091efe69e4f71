//! `SeaORM` entities backing the account directory and case record lookup.

pub mod account;
pub mod case_collaborator;
pub mod case_record;
pub mod case_share;
pub mod case_support;
pub mod organisation;
pub mod organisation_unit;
pub mod role_assignment;
