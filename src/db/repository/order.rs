//! Order Repository
//!
//! Orders are append-only: created once, then rewritten in full through
//! `save` by the fulfillment engine's defined transitions. No delete.

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::Order;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

// ORDER is reserved in SurrealQL
const TABLE: &str = "order_record";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List orders, newest first (paginated)
    pub async fn find_all(&self, limit: i64, offset: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order_record ORDER BY created_at DESC LIMIT $limit START $offset")
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// List one user's orders, newest first (paginated)
    pub async fn find_by_user(
        &self,
        user: &RecordId,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order_record WHERE user = $user ORDER BY created_at DESC LIMIT $limit START $offset")
            .bind(("user", user.clone()))
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let order: Option<Order> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(order)
    }

    /// Find order by its human-readable number
    pub async fn find_by_number(&self, order_number: &str) -> RepoResult<Option<Order>> {
        let number = order_number.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order_record WHERE order_number = $number LIMIT 1")
            .bind(("number", number))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Persist a new order
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Rewrite an existing order document
    pub async fn save(&self, order: Order) -> RepoResult<Order> {
        let record = order
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Order has no id".to_string()))?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $record CONTENT $data RETURN AFTER")
            .bind(("record", record.clone()))
            .bind(("data", order))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", record)))
    }
}
