//! Database Module
//!
//! Embedded SurrealDB connection and schema bootstrap.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "storefront";
const DATABASE: &str = "main";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at the given path
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        if let Some(parent) = std::path::Path::new(db_path).parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Database(format!("Failed to create db dir: {e}")))?;
        }

        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {e}")))?;

        Self::finish_setup(db).await
    }

    /// Open an in-memory database (tests)
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::Database(format!("Failed to open in-memory database: {e}")))?;

        Self::finish_setup(db).await
    }

    async fn finish_setup(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::Database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;

        tracing::info!("Database connection established");
        Ok(Self { db })
    }
}

/// Apply unique indexes for slugs, order numbers and user identities
///
/// DEFINE statements are idempotent with IF NOT EXISTS, so this runs on every
/// startup.
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    const STATEMENTS: &[&str] = &[
        "DEFINE INDEX IF NOT EXISTS category_slug ON TABLE category COLUMNS slug UNIQUE",
        "DEFINE INDEX IF NOT EXISTS product_slug ON TABLE product COLUMNS slug UNIQUE",
        "DEFINE INDEX IF NOT EXISTS brand_slug ON TABLE brand COLUMNS slug UNIQUE",
        "DEFINE INDEX IF NOT EXISTS order_number ON TABLE order_record COLUMNS order_number UNIQUE",
        "DEFINE INDEX IF NOT EXISTS user_username ON TABLE user COLUMNS username UNIQUE",
        "DEFINE INDEX IF NOT EXISTS user_email ON TABLE user COLUMNS email UNIQUE",
    ];

    for stmt in STATEMENTS {
        db.query(*stmt)
            .await
            .map_err(|e| AppError::Database(format!("Failed to apply schema: {e}")))?;
    }
    Ok(())
}
