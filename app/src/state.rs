// vitrin/src/state.rs

use crate::bus::ChangeBus;
use crate::config::AppConfig;
use crate::sessions::CartSessions;
use crate::store::PgCartStore;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: PgPool,
  pub config: Arc<AppConfig>,
  pub change_bus: ChangeBus,
  pub cart_sessions: Arc<CartSessions>,
}

impl AppState {
  pub fn new(db_pool: PgPool, config: Arc<AppConfig>) -> Self {
    let change_bus = ChangeBus::new();
    let cart_store = Arc::new(PgCartStore::new(db_pool.clone(), change_bus.clone()));
    let cart_sessions = Arc::new(CartSessions::new(cart_store, change_bus.clone()));
    AppState {
      db_pool,
      config,
      change_bus,
      cart_sessions,
    }
  }
}
