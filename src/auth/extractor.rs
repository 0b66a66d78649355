use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use super::{Claims, SESSION_COOKIE};
use crate::app::state::AppState;
use crate::error::ApiError;

/// Gate for routes that need a signed-in user. Rejects with 401 when the
/// session cookie is missing or its token does not verify.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            warn!(path = %parts.uri.path(), "Request without session cookie");
            return Err(ApiError::Unauthorized("missing session token".into()));
        };

        let claims = state.sessions.verify(cookie.value())?;
        Ok(Self(claims))
    }
}
