use std::sync::Arc;

use crate::{
    application::use_cases::{
        payment::PaymentUseCases, subscription::SubscriptionUseCases, user::UserUseCases,
    },
    infra::config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub subscription_use_cases: Arc<SubscriptionUseCases>,
    pub payment_use_cases: Arc<PaymentUseCases>,
    pub user_use_cases: Arc<UserUseCases>,
}
