//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ClienteleConfig;
use crate::db::{CustomerStore, PgCustomerStore, PgUserStore, UserStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Handlers reach the stores only through the
/// trait objects, so the same router runs against Postgres in production
/// and the in-memory fakes in tests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ClienteleConfig,
    customers: Arc<dyn CustomerStore>,
    users: Arc<dyn UserStore>,
    pool: Option<PgPool>,
}

impl AppState {
    /// Create application state backed by `PostgreSQL` stores.
    #[must_use]
    pub fn new(config: ClienteleConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                customers: Arc::new(PgCustomerStore::new(pool.clone())),
                users: Arc::new(PgUserStore::new(pool.clone())),
                pool: Some(pool),
            }),
        }
    }

    /// Create application state over caller-supplied stores.
    ///
    /// Used by tests to run the full router against the in-memory fakes.
    #[must_use]
    pub fn with_stores(
        config: ClienteleConfig,
        customers: Arc<dyn CustomerStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                customers,
                users,
                pool: None,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &ClienteleConfig {
        &self.inner.config
    }

    /// Get the customer store.
    #[must_use]
    pub fn customers(&self) -> &dyn CustomerStore {
        self.inner.customers.as_ref()
    }

    /// Get the user store.
    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.users.as_ref()
    }

    /// Get the database pool, if this state is Postgres-backed.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }
}
