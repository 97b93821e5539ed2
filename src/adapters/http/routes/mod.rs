pub mod payment;
pub mod subscription;
pub mod user;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/subscription", subscription::router())
        .nest("/payment", payment::router())
        .nest("/user", user::router())
}
