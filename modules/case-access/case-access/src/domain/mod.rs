//! Domain layer for the case access module.

pub mod context_builder;
pub mod error;
pub mod evaluator;
pub mod local_client;
pub mod service;
pub mod state;
pub mod visibility;

pub use error::DomainError;
pub use local_client::CaseAccessLocalClient;
pub use service::Service;
