use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    app_error::AppResult,
    application::ports::payment_gateway::{
        CancelRequest, CancellationDetails, CancellationResult, PaymentGatewayPort,
        SimulatedOutcome,
    },
};

/// In-process stand-in for the payment gateway.
///
/// Simulates cancellation responses locally without any external call; the
/// configured outcome selects which variant of the response contract is
/// produced.
#[derive(Clone)]
pub struct MockGatewayClient {
    outcome: SimulatedOutcome,
}

impl MockGatewayClient {
    pub fn new(outcome: SimulatedOutcome) -> Self {
        Self { outcome }
    }
}

/// Build the gateway's cancellation response for a request.
///
/// Tax-free gets 90% of the requested amount in integer cents and VAT the
/// remainder, so the split always sums to the requested amount. Only a
/// succeeded cancellation carries the gateway reference, a receipt, and a
/// settled timestamp.
pub fn build_cancellation_result(
    gateway_payment_id: &str,
    request: &CancelRequest,
    outcome: SimulatedOutcome,
    now: DateTime<Utc>,
) -> CancellationResult {
    let tax_free_amount_cents = request.amount_cents * 9 / 10;
    let details = CancellationDetails {
        id: Uuid::new_v4(),
        total_amount_cents: request.amount_cents,
        tax_free_amount_cents,
        vat_amount_cents: request.amount_cents - tax_free_amount_cents,
        reason: request.reason.clone(),
        requested_at: now,
    };

    match outcome {
        SimulatedOutcome::Success => CancellationResult::Succeeded {
            gateway_cancellation_id: gateway_payment_id.to_string(),
            receipt_url: format!("https://receipts.gateway.test/{}", details.id),
            cancelled_at: now,
            details,
        },
        SimulatedOutcome::Requested => CancellationResult::Requested { details },
        SimulatedOutcome::Fail => CancellationResult::Failed { details },
    }
}

#[async_trait]
impl PaymentGatewayPort for MockGatewayClient {
    async fn cancel_payment(
        &self,
        gateway_payment_id: &str,
        request: &CancelRequest,
    ) -> AppResult<CancellationResult> {
        tracing::debug!(
            gateway_payment_id,
            outcome = ?self.outcome,
            "Mock gateway: cancellation request"
        );

        Ok(build_cancellation_result(
            gateway_payment_id,
            request,
            self.outcome,
            Utc::now(),
        ))
    }
}
