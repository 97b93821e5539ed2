use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::payment_gateway::{
        CancelRequest, CancellationResult, CancellationStatus, PaymentGatewayPort,
    },
    domain::entities::{payment::Payment, payment::PaymentStatus, product::Product},
};

use super::subscription::LatestPaymentLookup;

// ============================================================================
// Repository Trait
// ============================================================================

#[async_trait]
pub trait PaymentRepo: Send + Sync {
    /// Newest payment first; `created_at` is the recency order and its
    /// tie-break.
    async fn latest_by_user_id(&self, user_id: Uuid) -> AppResult<Option<PaymentWithProduct>>;

    async fn recent_by_user_id(&self, user_id: Uuid, limit: i64)
    -> AppResult<Vec<PaymentSummary>>;
}

// ============================================================================
// Projections
// ============================================================================

/// A payment joined with the product it bought.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentWithProduct {
    pub payment: Payment,
    pub product: Product,
}

/// One row of a user's payment history. `issued_subscription` says whether
/// a subscription was ever created from this payment.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentSummary {
    pub id: Uuid,
    pub status: PaymentStatus,
    pub amount_cents: i64,
    pub payment_date: Option<DateTime<Utc>>,
    pub issued_subscription: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefundInput {
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefundOutput {
    pub request_amount_cents: i64,
    /// Set only when the gateway settled the cancellation.
    pub refund_amount_cents: Option<i64>,
    pub result_message: String,
    pub result_status: CancellationStatus,
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct PaymentUseCases {
    payment_repo: Arc<dyn PaymentRepo>,
    gateway: Arc<dyn PaymentGatewayPort>,
}

impl PaymentUseCases {
    pub fn new(payment_repo: Arc<dyn PaymentRepo>, gateway: Arc<dyn PaymentGatewayPort>) -> Self {
        Self {
            payment_repo,
            gateway,
        }
    }

    #[instrument(skip(self))]
    pub async fn get_latest_payment(&self, user_id: Uuid) -> AppResult<PaymentWithProduct> {
        self.payment_repo
            .latest_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("no payment found for this user".into()))
    }

    pub async fn recent_payments(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<PaymentSummary>> {
        self.payment_repo.recent_by_user_id(user_id, limit).await
    }

    /// Request a refund of the user's latest payment through the gateway
    /// and fold the gateway's tagged result into a flat output.
    #[instrument(skip(self))]
    pub async fn refund(&self, user_id: Uuid, input: RefundInput) -> AppResult<RefundOutput> {
        let latest = self.get_latest_payment(user_id).await?;

        if !latest.payment.status.is_paid() {
            return Err(AppError::InvalidInput(
                "only a paid payment can be refunded".into(),
            ));
        }

        let gateway_payment_id = latest
            .payment
            .gateway_payment_id
            .as_deref()
            .ok_or_else(|| {
                AppError::InvalidInput("payment has no gateway transaction".into())
            })?;

        let request = CancelRequest {
            reason: input.reason,
            amount_cents: latest.payment.amount_cents,
        };

        let result = self.gateway.cancel_payment(gateway_payment_id, &request).await?;

        tracing::info!(
            payment_id = %latest.payment.id,
            status = %result.status(),
            "Refund result received"
        );

        let refund_amount_cents = match &result {
            CancellationResult::Succeeded { details, .. } => Some(details.total_amount_cents),
            _ => None,
        };
        let result_message = match result.status() {
            CancellationStatus::Succeed => "refund completed",
            CancellationStatus::Requested => "refund requested",
            CancellationStatus::Failed => "refund failed",
        };

        Ok(RefundOutput {
            request_amount_cents: request.amount_cents,
            refund_amount_cents,
            result_message: result_message.to_string(),
            result_status: result.status(),
        })
    }
}

#[async_trait]
impl LatestPaymentLookup for PaymentUseCases {
    async fn latest_payment(&self, user_id: Uuid) -> AppResult<PaymentWithProduct> {
        self.get_latest_payment(user_id).await
    }
}
