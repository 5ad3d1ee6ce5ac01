//! Read-only vs. write gates applied by the handlers.
//!
//! Both predicates are pure: they look only at the request method, the
//! requesting user (if any) and, for the author gate, the owner of the
//! resource.

use crate::api::{ApiError, ApiResult};
use crate::models::User;
use axum::http::Method;

pub fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Anyone may read; only staff may write.
pub fn admin_or_read_only(method: &Method, user: Option<&User>) -> bool {
    is_safe_method(method) || user.is_some_and(User::is_admin)
}

/// Anyone may read; the owner or an administrator may write.
pub fn author_or_admin_or_read_only(method: &Method, user: Option<&User>, owner_id: i32) -> bool {
    is_safe_method(method) || user.is_some_and(|u| u.id == owner_id || u.is_admin())
}

/// Turns a denied check into 401 for anonymous callers and 403 otherwise.
pub fn require(allowed: bool, user: Option<&User>) -> ApiResult<()> {
    match (allowed, user) {
        (true, _) => Ok(()),
        (false, None) => Err(ApiError::Unauthorized),
        (false, Some(_)) => Err(ApiError::Forbidden),
    }
}
