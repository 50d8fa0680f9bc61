//! Caller identity extraction.
//!
//! Authentication happens upstream: an external identity provider (or API
//! gateway) verifies the caller and injects an opaque id plus a capability
//! header. The handlers trust these headers the way the ledger trusts its
//! store — as an external collaborator's contract.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use miner_ledger::{Capability, LedgerError};

use crate::ApiError;

/// Header carrying the opaque caller id.
pub const CALLER_ID_HEADER: &str = "x-miner-id";
/// Header carrying the caller capability (`user` or `admin`).
pub const CAPABILITY_HEADER: &str = "x-miner-capability";

/// Authenticated caller, as asserted by the identity provider.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: String,
    pub capability: Capability,
}

impl Identity {
    /// Callers may act on their own records; admins on anyone's.
    pub fn authorize_user(&self, user_id: &str) -> Result<(), ApiError> {
        if self.id == user_id || self.capability.is_admin() {
            Ok(())
        } else {
            Err(ApiError(LedgerError::Forbidden))
        }
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(CALLER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ApiError(LedgerError::Unauthorized))?
            .to_string();

        let capability = match parts.headers.get(CAPABILITY_HEADER) {
            None => Capability::User,
            Some(v) => v
                .to_str()
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .ok_or(ApiError(LedgerError::Unauthorized))?,
        };

        Ok(Identity { id, capability })
    }
}
