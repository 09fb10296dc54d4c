//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the minimum requirement.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use formhist_core::error::CoreError;
use formhist_core::roles::can_access_history;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires `admin` or `clinician`. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn history(RequireHistoryAccess(user): RequireHistoryAccess) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireHistoryAccess(pub AuthUser);

impl FromRequestParts<AppState> for RequireHistoryAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !can_access_history(&user.role) {
            tracing::warn!(actor = %user.actor, role = %user.role, "History access denied");
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin or Clinician role required".into(),
            )));
        }
        Ok(RequireHistoryAccess(user))
    }
}

/// Requires any authenticated user (any valid role).
///
/// Equivalent to [`AuthUser`] but named for route handlers where "this
/// route requires authentication" should read explicitly.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}
