//! Brand Repository

use super::{BaseRepository, RepoError, RepoResult, make_record_id, strip_table_prefix};
use crate::catalog::slug::slugify;
use crate::db::models::{Brand, BrandCreate, BrandUpdate};
use crate::utils::time::now_millis;
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "brand";

#[derive(Clone)]
pub struct BrandRepository {
    base: BaseRepository,
}

impl BrandRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active brands ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Brand>> {
        let brands: Vec<Brand> = self
            .base
            .db()
            .query("SELECT * FROM brand WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(brands)
    }

    /// Find brand by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Brand>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let brand: Option<Brand> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(brand)
    }

    /// Find brand by slug
    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Brand>> {
        let slug_owned = slug.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM brand WHERE slug = $slug LIMIT 1")
            .bind(("slug", slug_owned))
            .await?;
        let brands: Vec<Brand> = result.take(0)?;
        Ok(brands.into_iter().next())
    }

    /// Create a new brand
    pub async fn create(&self, data: BrandCreate) -> RepoResult<Brand> {
        let slug = data.slug.unwrap_or_else(|| slugify(&data.name));
        if self.find_by_slug(&slug).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Brand slug '{}' already exists",
                slug
            )));
        }

        let brand = Brand {
            id: None,
            name: data.name,
            slug,
            description: data.description,
            logo_url: data.logo_url,
            is_active: true,
            is_featured: data.is_featured.unwrap_or(false),
            created_at: now_millis(),
        };

        let created: Option<Brand> = self.base.db().create(TABLE).content(brand).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create brand".to_string()))
    }

    /// Update a brand
    pub async fn update(&self, id: &str, data: BrandUpdate) -> RepoResult<Brand> {
        let pure_id = strip_table_prefix(TABLE, id);
        self.find_by_id(pure_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Brand {} not found", id)))?;

        #[derive(Serialize)]
        struct BrandUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            description: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            logo_url: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_active: Option<bool>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_featured: Option<bool>,
        }

        let update_data = BrandUpdateDb {
            name: data.name,
            description: data.description,
            logo_url: data.logo_url,
            is_active: data.is_active,
            is_featured: data.is_featured,
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
            .ok_or_else(|| RepoError::NotFound(format!("Brand {} not found", id)))
    }
}
