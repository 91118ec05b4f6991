//! PostgreSQL implementation of the persistence boundary.

use super::entities::{Category, NewCategory, Product, StockStatus};
use super::{InventoryStore, StoreError, StoreResult};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

/// Store backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_category(row: &PgRow) -> StoreResult<Category> {
    Ok(Category {
        id: row.try_get("id").map_err(StoreError::from)?,
        name: row.try_get("name").map_err(StoreError::from)?,
        slug: row.try_get("slug").map_err(StoreError::from)?,
        is_active: row.try_get("is_active").map_err(StoreError::from)?,
        level: row.try_get("level").map_err(StoreError::from)?,
        parent_id: row.try_get("parent_id").map_err(StoreError::from)?,
    })
}

fn row_to_product(row: &PgRow) -> StoreResult<Product> {
    let status_raw: String = row.try_get("stock_status").map_err(StoreError::from)?;
    let stock_status = StockStatus::parse(&status_raw).ok_or_else(|| StoreError::Database {
        message: format!("unknown stock_status label '{}'", status_raw),
    })?;
    Ok(Product {
        id: row.try_get("id").map_err(StoreError::from)?,
        pid: row.try_get("pid").map_err(StoreError::from)?,
        name: row.try_get("name").map_err(StoreError::from)?,
        slug: row.try_get("slug").map_err(StoreError::from)?,
        description: row.try_get("description").map_err(StoreError::from)?,
        is_digital: row.try_get("is_digital").map_err(StoreError::from)?,
        is_active: row.try_get("is_active").map_err(StoreError::from)?,
        stock_status,
        category_id: row.try_get("category_id").map_err(StoreError::from)?,
        seasonal_event: row.try_get("seasonal_event").map_err(StoreError::from)?,
        created_at: row.try_get("created_at").map_err(StoreError::from)?,
        updated_at: row.try_get("updated_at").map_err(StoreError::from)?,
    })
}

const CATEGORY_COLUMNS: &str = "id, name, slug, is_active, level, parent_id";

const PRODUCT_COLUMNS: &str = "id, pid, name, slug, description, is_digital, is_active, \
     stock_status::text AS stock_status, category_id, seasonal_event, created_at, updated_at";

#[async_trait]
impl InventoryStore for PgStore {
    async fn get_category(&self, id: i32) -> StoreResult<Option<Category>> {
        let query = format!("SELECT {} FROM category WHERE id = $1", CATEGORY_COLUMNS);
        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(row_to_category).transpose()
    }

    async fn category_by_slug(&self, slug: &str) -> StoreResult<Option<Category>> {
        let query = format!("SELECT {} FROM category WHERE slug = $1", CATEGORY_COLUMNS);
        let row = sqlx::query(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_category).transpose()
    }

    async fn category_by_name_level(
        &self,
        name: &str,
        level: i32,
    ) -> StoreResult<Option<Category>> {
        let query = format!(
            "SELECT {} FROM category WHERE name = $1 AND level = $2",
            CATEGORY_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(name)
            .bind(level)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_category).transpose()
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let query = format!("SELECT {} FROM category ORDER BY id", CATEGORY_COLUMNS);
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_category).collect()
    }

    async fn insert_category(&self, new: NewCategory) -> StoreResult<Category> {
        let query = format!(
            "INSERT INTO category (name, slug, is_active, level, parent_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            CATEGORY_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(&new.name)
            .bind(&new.slug)
            .bind(new.is_active)
            .bind(new.level)
            .bind(new.parent_id)
            .fetch_one(&self.pool)
            .await?;
        row_to_category(&row)
    }

    async fn update_category(&self, category: &Category) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE category
             SET name = $2, slug = $3, is_active = $4, level = $5, parent_id = $6
             WHERE id = $1",
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(category.is_active)
        .bind(category.level)
        .bind(category.parent_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "category",
                id: category.id,
            });
        }
        Ok(())
    }

    async fn delete_category(&self, id: i32) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM category WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "category",
                id,
            });
        }
        Ok(())
    }

    async fn get_product(&self, id: i32) -> StoreResult<Option<Product>> {
        let query = format!("SELECT {} FROM product WHERE id = $1", PRODUCT_COLUMNS);
        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(row_to_product).transpose()
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let query = format!("SELECT {} FROM product ORDER BY id", PRODUCT_COLUMNS);
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_product).collect()
    }
}
