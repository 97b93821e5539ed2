use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Months, Utc};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::{
        product::{PeriodType, Product},
        subscription::Subscription,
        user::User,
    },
};

use super::payment::PaymentWithProduct;

// ============================================================================
// Repository Traits
// ============================================================================

#[async_trait]
pub trait SubscriptionRepo: Send + Sync {
    async fn find_by_payment_id(&self, payment_id: Uuid) -> AppResult<Option<Subscription>>;

    /// The unexpired subscription for a user, if any. When several exist,
    /// the most recently created one wins.
    async fn find_active_by_user_id(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Subscription>>;

    async fn recent_by_user_id(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<SubscriptionSummary>>;

    /// Persist a new subscription. Storage enforces at most one
    /// subscription per payment; a second insert for the same payment id
    /// fails with `AppError::Conflict` regardless of any earlier check.
    async fn create(&self, input: &NewSubscription) -> AppResult<Subscription>;
}

#[async_trait]
pub trait ProductRepo: Send + Sync {
    async fn find_by_id(&self, product_id: Uuid) -> AppResult<Option<Product>>;
}

// ============================================================================
// Collaborator Capabilities
// ============================================================================

/// Narrow read-only view of the user collaborator.
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// Fails with `AppError::NotFound` when the user does not exist.
    async fn get_user(&self, user_id: Uuid) -> AppResult<User>;
}

/// Narrow read-only view of the payment collaborator. The collaborator
/// owns the "latest" ordering and its zero-payments failure mode.
#[async_trait]
pub trait LatestPaymentLookup: Send + Sync {
    /// Fails with `AppError::NotFound` when the user has no payments.
    async fn latest_payment(&self, user_id: Uuid) -> AppResult<PaymentWithProduct>;
}

// ============================================================================
// Inputs & Projections
// ============================================================================

#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub payment_id: Uuid,
    pub expired_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateSubscriptionInput {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub period: PeriodType,
    pub payment_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductOutput {
    pub id: Uuid,
    pub name: String,
    pub period: PeriodType,
    pub price_cents: i64,
}

impl From<Product> for ProductOutput {
    fn from(product: Product) -> Self {
        ProductOutput {
            id: product.id,
            name: product.name,
            period: product.period,
            price_cents: product.price_cents,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionOutput {
    pub id: Uuid,
    pub expired_at: DateTime<Utc>,
    pub product: ProductOutput,
}

/// One row of a user's subscription history, joined with its product.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionSummary {
    pub id: Uuid,
    pub product_name: String,
    pub expired_at: DateTime<Utc>,
    pub price_cents: i64,
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct SubscriptionUseCases {
    subscription_repo: Arc<dyn SubscriptionRepo>,
    product_repo: Arc<dyn ProductRepo>,
    users: Arc<dyn UserLookup>,
    payments: Arc<dyn LatestPaymentLookup>,
}

impl SubscriptionUseCases {
    pub fn new(
        subscription_repo: Arc<dyn SubscriptionRepo>,
        product_repo: Arc<dyn ProductRepo>,
        users: Arc<dyn UserLookup>,
        payments: Arc<dyn LatestPaymentLookup>,
    ) -> Self {
        Self {
            subscription_repo,
            product_repo,
            users,
            payments,
        }
    }

    /// Issue a subscription for a completed payment.
    ///
    /// Validation order is fixed: the duplicate-payment check runs before
    /// the product lookup, so a repeated payment id always surfaces as
    /// `Conflict` even when the product is gone.
    #[instrument(skip(self))]
    pub async fn create_subscription(
        &self,
        input: CreateSubscriptionInput,
    ) -> AppResult<SubscriptionOutput> {
        let CreateSubscriptionInput {
            user_id,
            product_id,
            period,
            payment_id,
        } = input;

        if self
            .subscription_repo
            .find_by_payment_id(payment_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "a subscription was already issued for this payment".into(),
            ));
        }

        let product = self
            .product_repo
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("product does not exist".into()))?;

        let expired_at = calculate_expiration(Utc::now(), period);

        let subscription = self
            .subscription_repo
            .create(&NewSubscription {
                user_id,
                product_id,
                payment_id,
                expired_at,
            })
            .await?;

        tracing::info!(
            subscription_id = %subscription.id,
            payment_id = %payment_id,
            "Subscription issued"
        );

        Ok(SubscriptionOutput {
            id: subscription.id,
            expired_at: subscription.expired_at,
            product: ProductOutput::from(product),
        })
    }

    /// Re-run issuance for a user whose latest payment completed without a
    /// subscription (e.g. a crash between payment confirmation and
    /// issuance). Safe to retry: a latest payment that already has a
    /// subscription deterministically hits the `Conflict` path.
    #[instrument(skip(self))]
    pub async fn reissue_subscription(&self, user_id: Uuid) -> AppResult<SubscriptionOutput> {
        self.users.get_user(user_id).await?;

        let payment = self.payments.latest_payment(user_id).await?;

        self.create_subscription(CreateSubscriptionInput {
            user_id,
            product_id: payment.product.id,
            period: payment.product.period,
            payment_id: payment.payment.id,
        })
        .await
    }

    /// The user's unexpired subscription. `None` is a normal outcome, not
    /// an error.
    #[instrument(skip(self))]
    pub async fn get_current_subscription(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<Subscription>> {
        self.subscription_repo
            .find_active_by_user_id(user_id, Utc::now())
            .await
    }
}

/// Expiration date for a subscription starting at `start`.
///
/// `Yearly` adds 12 calendar months, anything else adds one. chrono clamps
/// to the last valid day of the target month: Jan 31 + 1 month lands on
/// Feb 28 (29 in leap years), Feb 29 + 1 year on Feb 28.
pub fn calculate_expiration(start: DateTime<Utc>, period: PeriodType) -> DateTime<Utc> {
    match period {
        PeriodType::Yearly => start + Months::new(12),
        _ => start + Months::new(1),
    }
}
