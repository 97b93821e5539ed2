use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::subscription::{
        NewSubscription, SubscriptionRepo, SubscriptionSummary,
    },
    domain::entities::subscription::Subscription,
};

// Unique index on payment_id backs the one-subscription-per-payment
// invariant; see `create`.
const PAYMENT_UNIQUE_CONSTRAINT: &str = "subscriptions_payment_id_key";

const SELECT_COLS: &str = "id, user_id, product_id, payment_id, expired_at, created_at";

fn row_to_subscription(row: &sqlx::postgres::PgRow) -> Subscription {
    Subscription {
        id: row.get("id"),
        user_id: row.get("user_id"),
        product_id: row.get("product_id"),
        payment_id: row.get("payment_id"),
        expired_at: row.get("expired_at"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl SubscriptionRepo for PostgresPersistence {
    async fn find_by_payment_id(&self, payment_id: Uuid) -> AppResult<Option<Subscription>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM subscriptions WHERE payment_id = $1",
            SELECT_COLS
        ))
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_subscription))
    }

    async fn find_active_by_user_id(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Subscription>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM subscriptions
             WHERE user_id = $1 AND expired_at > $2
             ORDER BY created_at DESC
             LIMIT 1",
            SELECT_COLS
        ))
        .bind(user_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_subscription))
    }

    async fn recent_by_user_id(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<SubscriptionSummary>> {
        let rows = sqlx::query(
            "SELECT s.id, p.name AS product_name, s.expired_at, p.price_cents
             FROM subscriptions s
             JOIN products p ON p.id = s.product_id
             WHERE s.user_id = $1
             ORDER BY s.created_at DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(rows
            .iter()
            .map(|row| SubscriptionSummary {
                id: row.get("id"),
                product_name: row.get("product_name"),
                expired_at: row.get("expired_at"),
                price_cents: row.get("price_cents"),
            })
            .collect())
    }

    async fn create(&self, input: &NewSubscription) -> AppResult<Subscription> {
        let id = Uuid::new_v4();
        let result = sqlx::query(&format!(
            "INSERT INTO subscriptions (id, user_id, product_id, payment_id, expired_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            SELECT_COLS
        ))
        .bind(id)
        .bind(input.user_id)
        .bind(input.product_id)
        .bind(input.payment_id)
        .bind(input.expired_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row_to_subscription(&row)),
            // Two concurrent issuances for one payment can both pass the
            // use-case pre-check; the index makes exactly one of them win.
            Err(sqlx::Error::Database(db_err))
                if db_err.constraint() == Some(PAYMENT_UNIQUE_CONSTRAINT) =>
            {
                Err(AppError::Conflict(
                    "a subscription was already issued for this payment".into(),
                ))
            }
            Err(err) => Err(err.into()),
        }
    }
}
