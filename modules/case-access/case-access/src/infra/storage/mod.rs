//! SQL storage for accounts, role assignments and case records.

pub mod entity;
pub mod migrations;
pub mod sea_orm_repo;
pub mod visibility_cond;

pub use sea_orm_repo::SeaOrmCaseAccessRepository;
pub use visibility_cond::build_visibility_condition;
