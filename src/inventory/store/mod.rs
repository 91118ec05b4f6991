//! Persistence boundary
//!
//! The backend talks to storage exclusively through [`InventoryStore`]
//! (query-one, query-all, insert, update, delete), so test doubles implement
//! the boundary directly instead of patching a driver's internals at
//! runtime. [`PgStore`] is the production implementation; [`MemoryStore`] is
//! the double the unit tests run against.

pub mod entities;
pub mod memory;
pub mod postgres;
pub mod rules;

pub use entities::{Category, NewCategory, Product, StockStatus};
pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use std::fmt;

/// Errors crossing the persistence boundary.
#[derive(Debug, Clone)]
pub enum StoreError {
    /// Driver or connection failure
    Database { message: String },
    /// A uniqueness rule would be violated
    Conflict { detail: String },
    /// The addressed row does not exist
    NotFound { entity: &'static str, id: i32 },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Database { message } => write!(f, "Store error: {}", message),
            StoreError::Conflict { detail } => write!(f, "{}", detail),
            StoreError::NotFound { entity, id } => {
                write!(f, "{} with id {} does not exist", entity, id)
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database {
            message: err.to_string(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The persistence boundary of the inventory backend.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn get_category(&self, id: i32) -> StoreResult<Option<Category>>;
    async fn category_by_slug(&self, slug: &str) -> StoreResult<Option<Category>>;
    async fn category_by_name_level(&self, name: &str, level: i32)
        -> StoreResult<Option<Category>>;
    async fn list_categories(&self) -> StoreResult<Vec<Category>>;
    async fn insert_category(&self, new: NewCategory) -> StoreResult<Category>;
    async fn update_category(&self, category: &Category) -> StoreResult<()>;
    async fn delete_category(&self, id: i32) -> StoreResult<()>;

    async fn get_product(&self, id: i32) -> StoreResult<Option<Product>>;
    async fn list_products(&self) -> StoreResult<Vec<Product>>;
}
