//! In-memory store double for unit tests.

use super::entities::{Category, NewCategory, Product};
use super::{InventoryStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::sync::Mutex;

/// Persistence double holding everything in process memory.
///
/// Implements the same boundary as [`super::PgStore`], so code under test
/// cannot tell the difference.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

struct Inner {
    categories: Vec<Category>,
    products: Vec<Product>,
    next_category_id: i32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                categories: Vec::new(),
                products: Vec::new(),
                next_category_id: 1,
            }),
        }
    }

    /// Seed a product directly, bypassing the insert path.
    pub fn seed_product(&self, product: Product) {
        self.inner.lock().unwrap().products.push(product);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn get_category(&self, id: i32) -> StoreResult<Option<Category>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn category_by_slug(&self, slug: &str) -> StoreResult<Option<Category>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.categories.iter().find(|c| c.slug == slug).cloned())
    }

    async fn category_by_name_level(
        &self,
        name: &str,
        level: i32,
    ) -> StoreResult<Option<Category>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .categories
            .iter()
            .find(|c| c.name == name && c.level == level)
            .cloned())
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.categories.clone())
    }

    async fn insert_category(&self, new: NewCategory) -> StoreResult<Category> {
        let mut inner = self.inner.lock().unwrap();
        let category = Category {
            id: inner.next_category_id,
            name: new.name,
            slug: new.slug,
            is_active: new.is_active,
            level: new.level,
            parent_id: new.parent_id,
        };
        inner.next_category_id += 1;
        inner.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(&self, category: &Category) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        match inner.categories.iter_mut().find(|c| c.id == category.id) {
            Some(existing) => {
                *existing = category.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: "category",
                id: category.id,
            }),
        }
    }

    async fn delete_category(&self, id: i32) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.categories.len();
        inner.categories.retain(|c| c.id != id);
        if inner.categories.len() == before {
            return Err(StoreError::NotFound {
                entity: "category",
                id,
            });
        }
        Ok(())
    }

    async fn get_product(&self, id: i32) -> StoreResult<Option<Product>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.products.iter().find(|p| p.id == id).cloned())
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.products.clone())
    }
}
