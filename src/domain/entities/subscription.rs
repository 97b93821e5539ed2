use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A user's entitlement window for one product, created by exactly one
/// payment. Never mutated after creation; expiry is computed from
/// `expired_at`, not stored as a flag.
#[derive(Debug, Clone, Serialize)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub payment_id: Uuid,
    pub expired_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expired_at > now
    }
}
