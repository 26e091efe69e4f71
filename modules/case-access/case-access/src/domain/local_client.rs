//! Local (in-process) client for the case access module.

use std::sync::Arc;

use async_trait::async_trait;
use case_access_sdk::{CaseAccessClient, CaseAccessError, ValidationRequest, VerifiedAccess};

use super::{DomainError, Service};

/// Local client wrapping the service.
pub struct CaseAccessLocalClient {
    svc: Arc<Service>,
}

impl CaseAccessLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

// Refusals are already logged by the service; only failures are errors here.
fn log_and_convert(op: &str, e: DomainError) -> CaseAccessError {
    if e.code().is_none() {
        tracing::error!(operation = op, error = ?e, "case_access call failed");
    }
    e.into()
}

#[async_trait]
impl CaseAccessClient for CaseAccessLocalClient {
    async fn verify(&self, request: ValidationRequest) -> Result<VerifiedAccess, CaseAccessError> {
        self.svc
            .verify(&request)
            .await
            .map_err(|e| log_and_convert("verify", e))
    }
}
