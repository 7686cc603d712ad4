pub mod adapters;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod ports;
pub mod services;
pub mod startup;
pub mod use_cases;
pub mod validation;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::adapters::{InMemoryStore, PostgresStore};
use crate::health::{HealthService, PostgresChecker};
use crate::ports::{AccountRepository, Ledger, TransactionRepository};
use crate::services::AccountService;
use crate::use_cases::{check_sufficient_funds, TransactionEngine};

#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub engine: TransactionEngine,
    pub transactions: Arc<dyn TransactionRepository>,
    pub health: HealthService,
}

impl AppState {
    /// Wires services over a store that implements every storage port.
    pub fn new<S>(store: S, health: HealthService) -> Self
    where
        S: AccountRepository + TransactionRepository + Ledger + Clone + 'static,
    {
        Self {
            accounts: AccountService::new(Arc::new(store.clone())),
            engine: TransactionEngine::new(Arc::new(store.clone()), check_sufficient_funds),
            transactions: Arc::new(store),
            health,
        }
    }

    pub fn postgres(store: PostgresStore) -> Self {
        let health = HealthService::new().with_checker(
            "postgres",
            Arc::new(PostgresChecker::new(store.pool().clone())),
        );
        Self::new(store, health)
    }

    pub fn in_memory(store: InMemoryStore) -> Self {
        Self::new(store, HealthService::new())
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/accounts",
            get(handlers::accounts::list_accounts).post(handlers::accounts::create_account),
        )
        .route(
            "/accounts/:key",
            get(handlers::accounts::get_account).put(handlers::accounts::update_account),
        )
        .route(
            "/accounts/:key/transactions",
            get(handlers::accounts::list_account_transactions),
        )
        .route("/transaction/deposit", post(handlers::transactions::deposit))
        .route("/transaction/withdraw", post(handlers::transactions::withdraw))
        .route("/transaction/transfer", post(handlers::transactions::transfer))
        .route(
            "/transactions/:id",
            get(handlers::transactions::get_transaction),
        )
        .layer(axum::middleware::from_fn(
            middleware::request_logger::request_logger_middleware,
        ))
        .with_state(state)
}
