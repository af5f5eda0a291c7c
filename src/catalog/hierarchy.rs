//! Catalog Hierarchy Manager
//!
//! Keeps the denormalized `ancestors`/`level` fields correct under arbitrary
//! parent reassignment so reads never need recursive traversal.
//!
//! Reparenting is an explicit orchestration: first the category's own fields
//! are rewritten, then every transitive descendant is rewritten level by
//! level. The walk is breadth-first, one write per node, and deliberately
//! non-atomic: a store failure mid-cascade surfaces the error and leaves the
//! already-visited prefix written (at-least-once; re-running the reparent
//! converges). Overlapping cascades are serialized through per-root mutexes.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::OwnedMutexGuard;

use crate::core::ReparentLocks;
use crate::db::models::{Category, CategoryNode};
use crate::db::repository::{CategoryRepository, RepoError, RepoResult};

#[derive(Clone)]
pub struct HierarchyManager {
    repo: CategoryRepository,
    locks: Arc<ReparentLocks>,
}

impl HierarchyManager {
    pub fn new(db: Surreal<Db>, locks: Arc<ReparentLocks>) -> Self {
        Self {
            repo: CategoryRepository::new(db),
            locks,
        }
    }

    /// Move a category under a new parent (or make it a root) and cascade the
    /// hierarchy fields through its whole subtree.
    ///
    /// Cycle formation (reparenting under one's own descendant) is not
    /// validated; the walk's visited set only guarantees termination.
    pub async fn reparent(&self, id: &str, new_parent: Option<&str>) -> RepoResult<Category> {
        // Resolve both endpoints once to learn which root subtrees are
        // involved, then lock those before re-reading and writing.
        let category = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))?;
        let category_id = category
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Category has no id".to_string()))?;

        let parent = match new_parent {
            Some(pid) => Some(
                self.repo
                    .find_by_id(pid)
                    .await?
                    .ok_or_else(|| RepoError::NotFound(format!("Parent {} not found", pid)))?,
            ),
            None => None,
        };

        let _guards = self.lock_roots(&category, parent.as_ref()).await;

        // Re-read under the lock; a concurrent reparent may have moved either
        // endpoint while we were waiting.
        let category = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))?;
        let parent = match new_parent {
            Some(pid) => Some(
                self.repo
                    .find_by_id(pid)
                    .await?
                    .ok_or_else(|| RepoError::NotFound(format!("Parent {} not found", pid)))?,
            ),
            None => None,
        };

        let (parent_link, ancestors, level) = match &parent {
            Some(p) => {
                let parent_id = p
                    .id
                    .clone()
                    .ok_or_else(|| RepoError::Database("Parent has no id".to_string()))?;
                let mut ancestors = p.ancestors.clone();
                ancestors.push(parent_id.clone());
                let level = ancestors.len() as i32;
                (Some(parent_id), ancestors, level)
            }
            None => (None, Vec::new(), 0),
        };

        let updated = self
            .repo
            .set_hierarchy(&category_id, parent_link, ancestors, level)
            .await?;

        self.cascade(&updated).await?;

        Ok(updated)
    }

    /// Rewrite `ancestors`/`level` of every transitive descendant of `root`
    ///
    /// Breadth-first; order does not affect the result. The visited set makes
    /// the walk terminate even if the stored tree already contains a cycle.
    async fn cascade(&self, root: &Category) -> RepoResult<()> {
        let root_id = root
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Category has no id".to_string()))?;

        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(root_id.to_string());

        let mut queue: VecDeque<Category> = VecDeque::new();
        queue.push_back(root.clone());

        while let Some(current) = queue.pop_front() {
            let current_id = match current.id.clone() {
                Some(id) => id,
                None => continue,
            };
            let children = self.repo.find_children(&current_id).await?;

            let mut child_ancestors = current.ancestors.clone();
            child_ancestors.push(current_id.clone());
            let child_level = child_ancestors.len() as i32;

            for child in children {
                let child_id = match child.id.clone() {
                    Some(id) => id,
                    None => continue,
                };
                if !visited.insert(child_id.to_string()) {
                    continue;
                }

                let rewritten = self
                    .repo
                    .set_hierarchy(
                        &child_id,
                        Some(current_id.clone()),
                        child_ancestors.clone(),
                        child_level,
                    )
                    .await?;
                queue.push_back(rewritten);
            }
        }

        Ok(())
    }

    /// Lock every root subtree a reparent touches, in sorted key order
    async fn lock_roots(
        &self,
        category: &Category,
        new_parent: Option<&Category>,
    ) -> Vec<OwnedMutexGuard<()>> {
        let mut keys: Vec<String> = Vec::new();
        keys.push(root_key(category));
        match new_parent {
            Some(p) => keys.push(root_key(p)),
            // Becoming a root: the category itself is the new root
            None => {
                if let Some(id) = &category.id {
                    keys.push(id.to_string());
                }
            }
        }
        keys.sort();
        keys.dedup();

        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            let lock = self.locks.for_root(&key);
            guards.push(lock.lock_owned().await);
        }
        guards
    }

    // ========== Read helpers ==========

    /// Root categories
    pub async fn roots(&self) -> RepoResult<Vec<Category>> {
        self.repo.find_roots().await
    }

    /// Categories at an exact depth
    pub async fn at_level(&self, level: i32) -> RepoResult<Vec<Category>> {
        self.repo.find_by_level(level).await
    }

    /// Featured categories
    pub async fn featured(&self) -> RepoResult<Vec<Category>> {
        self.repo.find_featured().await
    }

    /// Flat tree of all active categories annotated with `has_children`
    pub async fn tree(&self) -> RepoResult<Vec<CategoryNode>> {
        let categories = self.repo.find_all().await?;

        let parent_ids: HashSet<String> = categories
            .iter()
            .filter_map(|c| c.parent.as_ref().map(|p| p.to_string()))
            .collect();

        Ok(categories
            .into_iter()
            .map(|category| {
                let has_children = category
                    .id
                    .as_ref()
                    .map(|id| parent_ids.contains(&id.to_string()))
                    .unwrap_or(false);
                CategoryNode {
                    category,
                    has_children,
                }
            })
            .collect())
    }

    /// Display path for a category: its ancestors resolved to full records,
    /// root first, followed by the category itself
    pub async fn path(&self, id: &str) -> RepoResult<Vec<Category>> {
        let category = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))?;

        let mut path = self.repo.find_many(&category.ancestors).await?;
        path.push(category);
        Ok(path)
    }
}

/// Root-subtree lock key for a category: its first ancestor, or itself when it
/// is a root
fn root_key(category: &Category) -> String {
    category
        .ancestors
        .first()
        .map(|r: &RecordId| r.to_string())
        .or_else(|| category.id.as_ref().map(|id| id.to_string()))
        .unwrap_or_default()
}
