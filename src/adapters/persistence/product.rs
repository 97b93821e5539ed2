use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::subscription::ProductRepo,
    domain::entities::product::Product,
};

const SELECT_COLS: &str = "id, name, period, price_cents, created_at";

fn row_to_product(row: &sqlx::postgres::PgRow) -> Product {
    Product {
        id: row.get("id"),
        name: row.get("name"),
        period: row.get("period"),
        price_cents: row.get("price_cents"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl ProductRepo for PostgresPersistence {
    async fn find_by_id(&self, product_id: Uuid) -> AppResult<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM products WHERE id = $1",
            SELECT_COLS
        ))
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_product))
    }
}
