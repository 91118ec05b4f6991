//! Entity types backing the inventory schema.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A category in the hierarchy. `level` disambiguates same-named categories
/// on different tiers; `parent_id` points at the enclosing category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub is_active: bool,
    pub level: i32,
    pub parent_id: Option<i32>,
}

/// Input for creating a category; defaults mirror the schema's server
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default = "default_level")]
    pub level: i32,
    #[serde(default)]
    pub parent_id: Option<i32>,
}

fn default_level() -> i32 {
    100
}

impl NewCategory {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            is_active: false,
            level: default_level(),
            parent_id: None,
        }
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    pub fn with_parent(mut self, parent_id: i32) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// Stock availability of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Out of stock
    OutOfStock,
    /// In stock
    InStock,
    /// On back order
    OnBackOrder,
}

impl StockStatus {
    /// Database representation (the `status_enum` labels).
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "oos",
            StockStatus::InStock => "is",
            StockStatus::OnBackOrder => "obo",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "oos" => Some(StockStatus::OutOfStock),
            "is" => Some(StockStatus::InStock),
            "obo" => Some(StockStatus::OnBackOrder),
            _ => None,
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A product catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    /// Public identity, generated by the database
    pub pid: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_digital: bool,
    pub is_active: bool,
    pub stock_status: StockStatus,
    pub category_id: i32,
    pub seasonal_event: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
