//! Test app state builder for HTTP-level testing.
//!
//! Creates a minimal `AppState` wired over the in-memory mocks, mirroring
//! the production wiring in `infra::setup`.

use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;

use crate::{
    adapters::http::app_state::AppState,
    application::ports::payment_gateway::{PaymentGatewayPort, SimulatedOutcome},
    domain::entities::{
        payment::Payment, product::Product, subscription::Subscription, user::User,
    },
    infra::{config::AppConfig, mock_gateway::MockGatewayClient},
    test_utils::{
        InMemoryPaymentRepo, InMemoryProductRepo, InMemorySubscriptionRepo, InMemoryUserRepo,
    },
    use_cases::{
        payment::{PaymentRepo, PaymentUseCases},
        subscription::{
            LatestPaymentLookup, ProductRepo, SubscriptionRepo, SubscriptionUseCases, UserLookup,
        },
        user::{UserRepo, UserUseCases},
    },
};

pub struct TestAppStateBuilder {
    users: Vec<User>,
    products: Vec<Product>,
    payments: Vec<Payment>,
    subscriptions: Vec<Subscription>,
    gateway_outcome: SimulatedOutcome,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            products: Vec::new(),
            payments: Vec::new(),
            subscriptions: Vec::new(),
            gateway_outcome: SimulatedOutcome::Success,
        }
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }

    /// The payment's product must also be added via `with_product`.
    pub fn with_payment(mut self, payment: Payment) -> Self {
        self.payments.push(payment);
        self
    }

    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.subscriptions.push(subscription);
        self
    }

    pub fn with_gateway_outcome(mut self, outcome: SimulatedOutcome) -> Self {
        self.gateway_outcome = outcome;
        self
    }

    pub fn build(self) -> AppState {
        let user_repo = Arc::new(InMemoryUserRepo::new());
        for user in self.users {
            user_repo.insert(user);
        }

        let product_repo = Arc::new(InMemoryProductRepo::new());
        let subscription_repo = Arc::new(InMemorySubscriptionRepo::new());
        let payment_repo = Arc::new(InMemoryPaymentRepo::new());
        for product in &self.products {
            product_repo.insert(product.clone());
            subscription_repo.set_product(product.clone());
        }
        for payment in self.payments {
            let product = self
                .products
                .iter()
                .find(|p| p.id == payment.product_id)
                .expect("payment's product must be added to the builder")
                .clone();
            payment_repo.insert(payment, product);
        }
        for subscription in self.subscriptions {
            payment_repo.mark_issued(subscription.payment_id);
            subscription_repo.insert(subscription);
        }

        let gateway =
            Arc::new(MockGatewayClient::new(self.gateway_outcome)) as Arc<dyn PaymentGatewayPort>;

        let payment_use_cases = Arc::new(PaymentUseCases::new(
            payment_repo.clone() as Arc<dyn PaymentRepo>,
            gateway,
        ));
        let user_use_cases = Arc::new(UserUseCases::new(
            user_repo.clone() as Arc<dyn UserRepo>,
            subscription_repo.clone() as Arc<dyn SubscriptionRepo>,
            payment_repo.clone() as Arc<dyn PaymentRepo>,
        ));
        let subscription_use_cases = Arc::new(SubscriptionUseCases::new(
            subscription_repo as Arc<dyn SubscriptionRepo>,
            product_repo as Arc<dyn ProductRepo>,
            user_use_cases.clone() as Arc<dyn UserLookup>,
            payment_use_cases.clone() as Arc<dyn LatestPaymentLookup>,
        ));

        AppState {
            config: Arc::new(test_config(self.gateway_outcome)),
            subscription_use_cases,
            payment_use_cases,
            user_use_cases,
        }
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn test_config(gateway_outcome: SimulatedOutcome) -> AppConfig {
    AppConfig {
        jwt_secret: SecretString::from("test-jwt-secret"),
        cors_origin: HeaderValue::from_static("http://localhost:3000"),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        database_url: "postgres://unused".to_string(),
        gateway_outcome,
    }
}
