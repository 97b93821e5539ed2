use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::user::{User, UserRole},
};

use super::{
    payment::{PaymentRepo, PaymentSummary},
    subscription::{SubscriptionRepo, SubscriptionSummary, UserLookup},
};

/// How many history rows the profile shows per list.
const RECENT_LIMIT: i64 = 10;

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>>;
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileOutput {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub subscriptions: Vec<SubscriptionSummary>,
    pub payments: Vec<PaymentSummary>,
    pub active_subscription_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct UserUseCases {
    user_repo: Arc<dyn UserRepo>,
    subscription_repo: Arc<dyn SubscriptionRepo>,
    payment_repo: Arc<dyn PaymentRepo>,
}

impl UserUseCases {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        subscription_repo: Arc<dyn SubscriptionRepo>,
        payment_repo: Arc<dyn PaymentRepo>,
    ) -> Self {
        Self {
            user_repo,
            subscription_repo,
            payment_repo,
        }
    }

    pub async fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user does not exist".into()))
    }

    /// Account overview: recent subscriptions and payments, newest first,
    /// plus the currently active subscription if one exists.
    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<ProfileOutput> {
        let user = self.get_user(user_id).await?;

        let subscriptions = self
            .subscription_repo
            .recent_by_user_id(user_id, RECENT_LIMIT)
            .await?;
        let payments = self
            .payment_repo
            .recent_by_user_id(user_id, RECENT_LIMIT)
            .await?;
        let active = self
            .subscription_repo
            .find_active_by_user_id(user_id, Utc::now())
            .await?;

        Ok(ProfileOutput {
            id: user.id,
            email: user.email,
            role: user.role,
            subscriptions,
            payments,
            active_subscription_id: active.map(|s| s.id),
        })
    }
}

#[async_trait]
impl UserLookup for UserUseCases {
    async fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        UserUseCases::get_user(self, user_id).await
    }
}
