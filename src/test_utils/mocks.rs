//! In-memory mock implementations for the repository and collaborator
//! traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::{
        payment::{PaymentRepo, PaymentSummary, PaymentWithProduct},
        subscription::{
            LatestPaymentLookup, NewSubscription, ProductRepo, SubscriptionRepo,
            SubscriptionSummary, UserLookup,
        },
        user::UserRepo,
    },
    domain::entities::{
        payment::Payment, product::Product, subscription::Subscription, user::User,
    },
};

// ============================================================================
// InMemorySubscriptionRepo
// ============================================================================

#[derive(Default)]
pub struct InMemorySubscriptionRepo {
    pub subscriptions: Mutex<Vec<Subscription>>,
    // Product catalog for history summaries (joined in SQL in production).
    pub products: Mutex<HashMap<Uuid, Product>>,
}

impl InMemorySubscriptionRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, subscription: Subscription) {
        self.subscriptions.lock().unwrap().push(subscription);
    }

    pub fn set_product(&self, product: Product) {
        self.products.lock().unwrap().insert(product.id, product);
    }

    pub fn len(&self) -> usize {
        self.subscriptions.lock().unwrap().len()
    }
}

#[async_trait]
impl SubscriptionRepo for InMemorySubscriptionRepo {
    async fn find_by_payment_id(&self, payment_id: Uuid) -> AppResult<Option<Subscription>> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.payment_id == payment_id)
            .cloned())
    }

    async fn find_active_by_user_id(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Subscription>> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id && s.expired_at > now)
            .max_by_key(|s| s.created_at)
            .cloned())
    }

    async fn recent_by_user_id(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<SubscriptionSummary>> {
        let products = self.products.lock().unwrap();
        let mut rows: Vec<Subscription> = self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(rows
            .into_iter()
            .take(limit as usize)
            .map(|s| {
                let product = products.get(&s.product_id);
                SubscriptionSummary {
                    id: s.id,
                    product_name: product.map(|p| p.name.clone()).unwrap_or_default(),
                    expired_at: s.expired_at,
                    price_cents: product.map(|p| p.price_cents).unwrap_or(0),
                }
            })
            .collect())
    }

    async fn create(&self, input: &NewSubscription) -> AppResult<Subscription> {
        let mut subscriptions = self.subscriptions.lock().unwrap();

        // Models the unique index on payment_id.
        if subscriptions
            .iter()
            .any(|s| s.payment_id == input.payment_id)
        {
            return Err(AppError::Conflict(
                "a subscription was already issued for this payment".into(),
            ));
        }

        let subscription = Subscription {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            product_id: input.product_id,
            payment_id: input.payment_id,
            expired_at: input.expired_at,
            created_at: Utc::now(),
        };
        subscriptions.push(subscription.clone());
        Ok(subscription)
    }
}

// ============================================================================
// InMemoryProductRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryProductRepo {
    pub products: Mutex<HashMap<Uuid, Product>>,
}

impl InMemoryProductRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, product: Product) {
        self.products.lock().unwrap().insert(product.id, product);
    }
}

#[async_trait]
impl ProductRepo for InMemoryProductRepo {
    async fn find_by_id(&self, product_id: Uuid) -> AppResult<Option<Product>> {
        Ok(self.products.lock().unwrap().get(&product_id).cloned())
    }
}

// ============================================================================
// InMemoryPaymentRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryPaymentRepo {
    pub payments: Mutex<Vec<Payment>>,
    pub products: Mutex<HashMap<Uuid, Product>>,
    pub issued_payment_ids: Mutex<HashSet<Uuid>>,
}

impl InMemoryPaymentRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, payment: Payment, product: Product) {
        self.products.lock().unwrap().insert(product.id, product);
        self.payments.lock().unwrap().push(payment);
    }

    /// Flag a payment as having produced a subscription.
    pub fn mark_issued(&self, payment_id: Uuid) {
        self.issued_payment_ids.lock().unwrap().insert(payment_id);
    }
}

#[async_trait]
impl PaymentRepo for InMemoryPaymentRepo {
    async fn latest_by_user_id(&self, user_id: Uuid) -> AppResult<Option<PaymentWithProduct>> {
        let products = self.products.lock().unwrap();
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == user_id)
            .max_by_key(|p| p.created_at)
            .and_then(|payment| {
                products.get(&payment.product_id).map(|product| PaymentWithProduct {
                    payment: payment.clone(),
                    product: product.clone(),
                })
            }))
    }

    async fn recent_by_user_id(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<PaymentSummary>> {
        let issued = self.issued_payment_ids.lock().unwrap();
        let mut rows: Vec<Payment> = self
            .payments
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(rows
            .into_iter()
            .take(limit as usize)
            .map(|p| PaymentSummary {
                id: p.id,
                status: p.status,
                amount_cents: p.amount_cents,
                payment_date: p.paid_at,
                issued_subscription: issued.contains(&p.id),
            })
            .collect())
    }
}

#[async_trait]
impl LatestPaymentLookup for InMemoryPaymentRepo {
    async fn latest_payment(&self, user_id: Uuid) -> AppResult<PaymentWithProduct> {
        self.latest_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("no payment found for this user".into()))
    }
}

// ============================================================================
// InMemoryUserRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepo {
    pub users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().insert(user.id, user);
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }
}

#[async_trait]
impl UserLookup for InMemoryUserRepo {
    async fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        self.find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user does not exist".into()))
    }
}
