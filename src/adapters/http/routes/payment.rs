use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::CookieJar;

use crate::{
    adapters::http::{app_state::AppState, current_user},
    app_error::AppResult,
    application::use_cases::payment::RefundInput,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/refund", post(refund))
        .route("/latest", get(get_latest_payment))
}

/// Refund the caller's latest payment through the gateway.
async fn refund(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<RefundInput>,
) -> AppResult<impl IntoResponse> {
    let user_id = current_user(&jar, &app_state)?;

    let output = app_state.payment_use_cases.refund(user_id, input).await?;

    Ok(Json(output))
}

async fn get_latest_payment(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let user_id = current_user(&jar, &app_state)?;

    let latest = app_state.payment_use_cases.get_latest_payment(user_id).await?;

    Ok(Json(latest))
}
