use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::payment::{PaymentRepo, PaymentSummary, PaymentWithProduct},
    domain::entities::{payment::Payment, product::Product},
};

fn row_to_payment_with_product(row: &sqlx::postgres::PgRow) -> PaymentWithProduct {
    PaymentWithProduct {
        payment: Payment {
            id: row.get("id"),
            user_id: row.get("user_id"),
            product_id: row.get("product_id"),
            gateway_payment_id: row.get("gateway_payment_id"),
            status: row.get("status"),
            amount_cents: row.get("amount_cents"),
            paid_at: row.get("paid_at"),
            fail_reason: row.get("fail_reason"),
            created_at: row.get("created_at"),
        },
        product: Product {
            id: row.get("pr_id"),
            name: row.get("pr_name"),
            period: row.get("pr_period"),
            price_cents: row.get("pr_price_cents"),
            created_at: row.get("pr_created_at"),
        },
    }
}

#[async_trait]
impl PaymentRepo for PostgresPersistence {
    async fn latest_by_user_id(&self, user_id: Uuid) -> AppResult<Option<PaymentWithProduct>> {
        let row = sqlx::query(
            "SELECT p.id, p.user_id, p.product_id, p.gateway_payment_id, p.status,
                    p.amount_cents, p.paid_at, p.fail_reason, p.created_at,
                    pr.id AS pr_id, pr.name AS pr_name, pr.period AS pr_period,
                    pr.price_cents AS pr_price_cents, pr.created_at AS pr_created_at
             FROM payments p
             JOIN products pr ON pr.id = p.product_id
             WHERE p.user_id = $1
             ORDER BY p.created_at DESC
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_payment_with_product))
    }

    async fn recent_by_user_id(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<PaymentSummary>> {
        let rows = sqlx::query(
            "SELECT p.id, p.status, p.amount_cents, p.paid_at,
                    EXISTS(SELECT 1 FROM subscriptions s WHERE s.payment_id = p.id)
                        AS issued_subscription
             FROM payments p
             WHERE p.user_id = $1
             ORDER BY p.created_at DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(rows
            .iter()
            .map(|row| PaymentSummary {
                id: row.get("id"),
                status: row.get("status"),
                amount_cents: row.get("amount_cents"),
                payment_date: row.get("paid_at"),
                issued_subscription: row.get("issued_subscription"),
            })
            .collect())
    }
}
