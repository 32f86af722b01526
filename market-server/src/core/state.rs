//! Server state
//!
//! [`ServerState`] holds shared references to every service; `Clone` is a
//! shallow Arc copy, so handlers take it by value.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::notify::OutboxWorker;

#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// JWT validation service
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            pool,
            jwt_service,
        }
    }

    /// Initialize server state: work dir structure, database, services.
    ///
    /// # Panics
    ///
    /// Panics when the database cannot be initialized.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("market.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self::new(config.clone(), db_service.pool, jwt_service)
    }

    /// Start background tasks. Must be called before `Server::run()`.
    ///
    /// Tasks started:
    /// - notification outbox dispatch worker
    pub fn start_background_tasks(&self) {
        OutboxWorker::new(self.pool.clone()).spawn();
    }
}
