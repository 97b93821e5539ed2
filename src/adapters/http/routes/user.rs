use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use axum_extra::extract::CookieJar;

use crate::{
    adapters::http::{app_state::AppState, current_user},
    app_error::AppResult,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile))
}

async fn get_profile(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let user_id = current_user(&jar, &app_state)?;

    let profile = app_state.user_use_cases.get_profile(user_id).await?;

    Ok(Json(profile))
}
