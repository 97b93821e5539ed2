use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{app_error::AppResult, domain::entities::payment::PaymentStatus};

// ============================================================================
// Port Types - Gateway-agnostic response contracts
// ============================================================================

/// Which outcome the mock gateway should produce for a cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatedOutcome {
    Success,
    Fail,
    Requested,
}

impl std::str::FromStr for SimulatedOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "success" => Ok(SimulatedOutcome::Success),
            "fail" => Ok(SimulatedOutcome::Fail),
            "requested" => Ok(SimulatedOutcome::Requested),
            _ => Err(format!("Invalid simulated outcome: {}", s)),
        }
    }
}

/// Cancellation request sent to the gateway.
#[derive(Debug, Clone)]
pub struct CancelRequest {
    pub reason: String,
    pub amount_cents: i64,
}

/// Status tag of a cancellation result, in the gateway's own vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancellationStatus {
    Succeed,
    Requested,
    Failed,
}

impl CancellationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CancellationStatus::Succeed => "SUCCEED",
            CancellationStatus::Requested => "REQUESTED",
            CancellationStatus::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for CancellationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fields shared by every cancellation outcome. Tax-free and VAT amounts
/// always sum to `total_amount_cents`.
#[derive(Debug, Clone, Serialize)]
pub struct CancellationDetails {
    pub id: Uuid,
    pub total_amount_cents: i64,
    pub tax_free_amount_cents: i64,
    pub vat_amount_cents: i64,
    pub reason: String,
    pub requested_at: DateTime<Utc>,
}

/// Outcome of a cancellation request. The receipt and the settled
/// timestamp exist only on `Succeeded`; a failed cancellation carries no
/// gateway cancellation reference at all.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status")]
pub enum CancellationResult {
    #[serde(rename = "SUCCEED")]
    Succeeded {
        #[serde(flatten)]
        details: CancellationDetails,
        gateway_cancellation_id: String,
        receipt_url: String,
        cancelled_at: DateTime<Utc>,
    },
    #[serde(rename = "REQUESTED")]
    Requested {
        #[serde(flatten)]
        details: CancellationDetails,
    },
    #[serde(rename = "FAILED")]
    Failed {
        #[serde(flatten)]
        details: CancellationDetails,
    },
}

impl CancellationResult {
    pub fn status(&self) -> CancellationStatus {
        match self {
            CancellationResult::Succeeded { .. } => CancellationStatus::Succeed,
            CancellationResult::Requested { .. } => CancellationStatus::Requested,
            CancellationResult::Failed { .. } => CancellationStatus::Failed,
        }
    }

    pub fn details(&self) -> &CancellationDetails {
        match self {
            CancellationResult::Succeeded { details, .. }
            | CancellationResult::Requested { details }
            | CancellationResult::Failed { details } => details,
        }
    }
}

/// Result of a purchase as reported by the gateway (mocking-sized schema).
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseResult {
    pub gateway_payment_id: Option<String>,
    pub status: PaymentStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub fail_reason: Option<String>,
}

impl PurchaseResult {
    pub fn paid(gateway_payment_id: impl Into<String>, paid_at: DateTime<Utc>) -> Self {
        PurchaseResult {
            gateway_payment_id: Some(gateway_payment_id.into()),
            status: PaymentStatus::Paid,
            paid_at: Some(paid_at),
            fail_reason: None,
        }
    }

    /// A charge that never reached settlement has no transaction id.
    pub fn failed(fail_reason: impl Into<String>) -> Self {
        PurchaseResult {
            gateway_payment_id: None,
            status: PaymentStatus::Failed,
            paid_at: None,
            fail_reason: Some(fail_reason.into()),
        }
    }
}

// ============================================================================
// Port Trait
// ============================================================================

#[async_trait]
pub trait PaymentGatewayPort: Send + Sync {
    /// Request cancellation of a settled payment, identified by the
    /// gateway's own transaction id.
    async fn cancel_payment(
        &self,
        gateway_payment_id: &str,
        request: &CancelRequest,
    ) -> AppResult<CancellationResult>;
}
