use std::sync::Arc;

use questline_db::LedgerStore;
use questline_engine::Engine;

use crate::auth::jwt::TokenVerifier;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the store and config are behind `Arc`, and the engine
/// components only hold `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Ledger store handle, shared with every engine component.
    pub ledger: Arc<dyn LedgerStore>,
    pub engine: Engine,
    pub config: Arc<ServerConfig>,
    pub tokens: TokenVerifier,
}

impl AppState {
    pub fn new(ledger: Arc<dyn LedgerStore>, config: ServerConfig) -> Self {
        Self {
            engine: Engine::new(Arc::clone(&ledger)),
            ledger,
            tokens: TokenVerifier::new(&config.jwt),
            config: Arc::new(config),
        }
    }
}
