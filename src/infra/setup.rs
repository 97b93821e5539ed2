use std::fs::File;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{http::app_state::AppState, persistence::PostgresPersistence},
    application::ports::payment_gateway::PaymentGatewayPort,
    infra::{config::AppConfig, db::init_db, mock_gateway::MockGatewayClient},
    use_cases::{
        payment::{PaymentRepo, PaymentUseCases},
        subscription::{
            LatestPaymentLookup, ProductRepo, SubscriptionRepo, SubscriptionUseCases, UserLookup,
        },
        user::{UserRepo, UserUseCases},
    },
};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let postgres_arc = Arc::new(PostgresPersistence::new(
        init_db(&config.database_url).await?,
    ));

    let subscription_repo = postgres_arc.clone() as Arc<dyn SubscriptionRepo>;
    let product_repo = postgres_arc.clone() as Arc<dyn ProductRepo>;
    let payment_repo = postgres_arc.clone() as Arc<dyn PaymentRepo>;
    let user_repo = postgres_arc.clone() as Arc<dyn UserRepo>;

    let gateway =
        Arc::new(MockGatewayClient::new(config.gateway_outcome)) as Arc<dyn PaymentGatewayPort>;

    let payment_use_cases = Arc::new(PaymentUseCases::new(payment_repo.clone(), gateway));
    let user_use_cases = Arc::new(UserUseCases::new(
        user_repo,
        subscription_repo.clone(),
        payment_repo,
    ));
    let subscription_use_cases = Arc::new(SubscriptionUseCases::new(
        subscription_repo,
        product_repo,
        user_use_cases.clone() as Arc<dyn UserLookup>,
        payment_use_cases.clone() as Arc<dyn LatestPaymentLookup>,
    ));

    Ok(AppState {
        config: Arc::new(config),
        subscription_use_cases,
        payment_use_cases,
        user_use_cases,
    })
}

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "subly=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false) // don’t show target (module path)
        .with_level(true) // show log level
        .pretty(); // human-friendly, with colors

    // File (structured JSON logs)
    let file = File::create("app.log").expect("cannot create log file");
    let json_layer = fmt::layer()
        .json()
        .with_writer(file)
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
