//! Collaborator backends.

pub mod memory;
pub mod storage;

pub use memory::StaticCaseStore;
pub use storage::SeaOrmCaseAccessRepository;
