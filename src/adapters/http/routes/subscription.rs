use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    adapters::http::{app_state::AppState, current_user},
    app_error::AppResult,
    domain::entities::subscription::Subscription,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reissue", post(reissue_subscription))
        .route("/current", get(get_current_subscription))
}

/// Issue the subscription for the caller's latest completed payment, for
/// cases where payment succeeded but issuance did not happen.
async fn reissue_subscription(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let user_id = current_user(&jar, &app_state)?;

    let output = app_state
        .subscription_use_cases
        .reissue_subscription(user_id)
        .await?;

    Ok(Json(output))
}

#[derive(Serialize)]
struct CurrentSubscriptionResponse {
    id: Uuid,
    product_id: Uuid,
    payment_id: Uuid,
    expired_at: DateTime<Utc>,
}

impl From<Subscription> for CurrentSubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        CurrentSubscriptionResponse {
            id: subscription.id,
            product_id: subscription.product_id,
            payment_id: subscription.payment_id,
            expired_at: subscription.expired_at,
        }
    }
}

/// The caller's unexpired subscription; JSON `null` when there is none.
async fn get_current_subscription(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let user_id = current_user(&jar, &app_state)?;

    let current = app_state
        .subscription_use_cases
        .get_current_subscription(user_id)
        .await?;

    Ok(Json(current.map(CurrentSubscriptionResponse::from)))
}
