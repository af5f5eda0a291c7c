//! Category Repository

use super::{BaseRepository, RepoError, RepoResult, make_record_id, strip_table_prefix};
use crate::catalog::slug::slugify;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::utils::time::now_millis;
use serde::Serialize;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "category";

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active categories ordered by level then sort_order
    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category WHERE is_active = true ORDER BY level, sort_order")
            .await?
            .take(0)?;
        Ok(categories)
    }

    /// Find category by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Category>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let category: Option<Category> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(category)
    }

    /// Find category by slug
    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Category>> {
        let slug_owned = slug.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM category WHERE slug = $slug LIMIT 1")
            .bind(("slug", slug_owned))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(categories.into_iter().next())
    }

    /// Find root categories (no parent)
    pub async fn find_roots(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category WHERE parent IS NONE AND is_active = true ORDER BY sort_order")
            .await?
            .take(0)?;
        Ok(categories)
    }

    /// Find categories at an exact depth
    pub async fn find_by_level(&self, level: i32) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category WHERE level = $level AND is_active = true ORDER BY sort_order")
            .bind(("level", level))
            .await?
            .take(0)?;
        Ok(categories)
    }

    /// Find featured categories
    pub async fn find_featured(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category WHERE is_featured = true AND is_active = true ORDER BY sort_order")
            .await?
            .take(0)?;
        Ok(categories)
    }

    /// Find direct children of a category
    pub async fn find_children(&self, parent: &RecordId) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category WHERE parent = $parent ORDER BY sort_order")
            .bind(("parent", parent.clone()))
            .await?
            .take(0)?;
        Ok(categories)
    }

    /// Resolve a list of ids to full records, preserving the input order
    pub async fn find_many(&self, ids: &[RecordId]) -> RepoResult<Vec<Category>> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            let record: Option<Category> = self.base.db().select(id.clone()).await?;
            if let Some(category) = record {
                out.push(category);
            }
        }
        Ok(out)
    }

    /// Create a new category
    ///
    /// `ancestors`/`level` are seeded from the parent, if any. Later parent
    /// changes must go through the hierarchy manager so the subtree cascades.
    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        let slug = data.slug.unwrap_or_else(|| slugify(&data.name));
        if slug.is_empty() {
            return Err(RepoError::Validation(
                "slug derives to an empty string".to_string(),
            ));
        }
        if self.find_by_slug(&slug).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Category slug '{}' already exists",
                slug
            )));
        }

        let (parent, ancestors, level) = match data.parent.as_deref() {
            Some(parent_id) => {
                let parent = self
                    .find_by_id(parent_id)
                    .await?
                    .ok_or_else(|| RepoError::NotFound(format!("Parent {} not found", parent_id)))?;
                let parent_record = parent
                    .id
                    .clone()
                    .ok_or_else(|| RepoError::Database("Parent has no id".to_string()))?;
                let mut ancestors = parent.ancestors.clone();
                ancestors.push(parent_record.clone());
                let level = ancestors.len() as i32;
                (Some(parent_record), ancestors, level)
            }
            None => (None, Vec::new(), 0),
        };

        let category = Category {
            id: None,
            name: data.name,
            slug,
            description: data.description,
            parent,
            ancestors,
            level,
            is_featured: data.is_featured.unwrap_or(false),
            is_active: true,
            sort_order: data.sort_order.unwrap_or(0),
            created_at: now_millis(),
        };

        let created: Option<Category> = self.base.db().create(TABLE).content(category).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    /// Update scalar fields of a category (parent changes go through reparent)
    pub async fn update(&self, id: &str, data: CategoryUpdate) -> RepoResult<Category> {
        let pure_id = strip_table_prefix(TABLE, id);
        self.find_by_id(pure_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))?;

        #[derive(Serialize)]
        struct CategoryUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            description: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_featured: Option<bool>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_active: Option<bool>,
            #[serde(skip_serializing_if = "Option::is_none")]
            sort_order: Option<i32>,
        }

        let update_data = CategoryUpdateDb {
            name: data.name,
            description: data.description,
            is_featured: data.is_featured,
            is_active: data.is_active,
            sort_order: data.sort_order,
        };

        let record = make_record_id(TABLE, pure_id);
        self.base
            .db()
            .query("UPDATE $record MERGE $data")
            .bind(("record", record))
            .bind(("data", update_data))
            .await?;

        self.find_by_id(pure_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    /// Rewrite the denormalized hierarchy fields of one node
    ///
    /// One write per visited node during a cascade.
    pub async fn set_hierarchy(
        &self,
        id: &RecordId,
        parent: Option<RecordId>,
        ancestors: Vec<RecordId>,
        level: i32,
    ) -> RepoResult<Category> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $record SET parent = $parent, ancestors = $ancestors, level = $level RETURN AFTER")
            .bind(("record", id.clone()))
            .bind(("parent", parent))
            .bind(("ancestors", ancestors))
            .bind(("level", level))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        categories
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }
}
