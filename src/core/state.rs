use std::sync::Arc;

use dashmap::DashMap;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::Mutex;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;

/// Per-subtree reparent locks
///
/// Category reparenting walks and rewrites a whole subtree with no cross-node
/// transaction. Overlapping walks would interleave, so every reparent takes the
/// mutex of each root subtree it touches before writing. Locks are keyed by the
/// root category id and created lazily.
#[derive(Debug, Default)]
pub struct ReparentLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ReparentLocks {
    /// Create an empty lock map
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Get (or create) the mutex for a root subtree
    pub fn for_root(&self, root_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(root_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Application state - holds shared references to every service
///
/// Cloning is shallow; all fields are either `Arc`s or cheap handles.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | config | Config | Configuration (immutable) |
/// | db | Surreal<Db> | Embedded database |
/// | jwt_service | Arc<JwtService> | JWT issue/verify |
/// | reparent_locks | Arc<ReparentLocks> | Category subtree serialization |
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT service (shared ownership)
    pub jwt_service: Arc<JwtService>,
    /// Per-root-category mutexes for reparent cascades
    pub reparent_locks: Arc<ReparentLocks>,
}

impl AppState {
    /// Manual construction; prefer [`AppState::initialize`]
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        jwt_service: Arc<JwtService>,
        reparent_locks: Arc<ReparentLocks>,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            reparent_locks,
        }
    }

    /// Initialize application state
    ///
    /// Opens the on-disk database under `data_dir/database/storefront.db`,
    /// applies the schema (unique indexes) and wires up services.
    pub async fn initialize(config: &Config) -> Self {
        let db_path = format!("{}/database/storefront.db", config.data_dir);
        let db_service = DbService::new(&db_path)
            .await
            .expect("Failed to initialize database");

        Self::from_parts(config.clone(), db_service)
    }

    /// Initialize against an in-memory database (tests)
    pub async fn initialize_in_memory(config: &Config) -> Self {
        let db_service = DbService::memory()
            .await
            .expect("Failed to initialize in-memory database");

        Self::from_parts(config.clone(), db_service)
    }

    fn from_parts(config: Config, db_service: DbService) -> Self {
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        Self::new(
            config,
            db_service.db,
            jwt_service,
            Arc::new(ReparentLocks::new()),
        )
    }

}
