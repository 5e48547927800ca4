//! Caller identity guard.
//!
//! The transport layer resolves the caller and passes `Some(user_id)` or `None`;
//! shopper operations refuse anonymous callers before touching any store.

use storefront_core::UserId;
use storefront_infra::{ServiceError, ServiceResult};

/// The authenticated user, or `Unauthorized` for anonymous callers.
pub fn require_user(user_id: Option<UserId>) -> ServiceResult<UserId> {
    user_id.ok_or(ServiceError::Unauthorized)
}
