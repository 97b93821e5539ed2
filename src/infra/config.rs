use std::net::SocketAddr;

use axum::http::HeaderValue;
use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;

use crate::application::ports::payment_gateway::SimulatedOutcome;

pub struct AppConfig {
    pub jwt_secret: SecretString,
    pub cors_origin: HeaderValue,
    pub bind_addr: SocketAddr,
    pub database_url: String,
    /// Which outcome the in-process gateway mock produces for
    /// cancellations. Real gateway integration is out of scope.
    pub gateway_outcome: SimulatedOutcome,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret: SecretString = SecretString::new(get_env::<String>("JWT_SECRET").into());

        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");

        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", "127.0.0.1:3001".parse().unwrap());
        let database_url: String = get_env("DATABASE_URL");

        let gateway_outcome: SimulatedOutcome =
            get_env_default("GATEWAY_SIMULATED_OUTCOME", String::from("success"))
                .parse()
                .expect("GATEWAY_SIMULATED_OUTCOME must be one of success, fail, requested");

        Self {
            jwt_secret,
            cors_origin,
            bind_addr,
            database_url,
            gateway_outcome,
        }
    }
}
