pub mod app_error_impl;
pub mod app_state;
pub mod routes;

use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::jwt,
};

use app_state::AppState;

/// Resolve the caller from the `access_token` cookie. Every billing route
/// is authenticated; the token subject is the user id.
pub(crate) fn current_user(jar: &CookieJar, app_state: &AppState) -> AppResult<Uuid> {
    let Some(access_cookie) = jar.get("access_token") else {
        return Err(AppError::InvalidCredentials);
    };
    let claims = jwt::verify(access_cookie.value(), &app_state.config.jwt_secret)?;
    claims.sub.parse().map_err(|_| AppError::InvalidCredentials)
}
