//! Business rules enforced above the persistence boundary.

use super::{InventoryStore, NewCategory, StoreError, StoreResult};

/// Reject a new category that collides with an existing one.
///
/// Two rules, checked in order: the name+level pair must be unique, and the
/// slug must be unique. The name+level collision wins when both apply so the
/// caller sees the more specific message.
pub async fn ensure_category_available(
    store: &dyn InventoryStore,
    new: &NewCategory,
) -> StoreResult<()> {
    if store
        .category_by_name_level(&new.name, new.level)
        .await?
        .is_some()
    {
        return Err(StoreError::Conflict {
            detail: "Category name and level already exists".to_string(),
        });
    }
    if store.category_by_slug(&new.slug).await?.is_some() {
        return Err(StoreError::Conflict {
            detail: "Category slug already exists".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::store::MemoryStore;

    #[tokio::test]
    async fn test_fresh_category_is_available() {
        let store = MemoryStore::new();
        let new = NewCategory::new("Electronics", "electronics");
        assert!(ensure_category_available(&store, &new).await.is_ok());
    }

    #[tokio::test]
    async fn test_name_and_level_collision_is_rejected() {
        let store = MemoryStore::new();
        store
            .insert_category(NewCategory::new("Electronics", "electronics"))
            .await
            .unwrap();

        // Same name and level, different slug
        let new = NewCategory::new("Electronics", "electronics-2");
        let err = ensure_category_available(&store, &new).await.unwrap_err();
        assert_eq!(err.to_string(), "Category name and level already exists");
    }

    #[tokio::test]
    async fn test_same_name_different_level_is_allowed() {
        let store = MemoryStore::new();
        store
            .insert_category(NewCategory::new("Electronics", "electronics"))
            .await
            .unwrap();

        let new = NewCategory::new("Electronics", "electronics-l2").with_level(200);
        assert!(ensure_category_available(&store, &new).await.is_ok());
    }

    #[tokio::test]
    async fn test_slug_collision_is_rejected() {
        let store = MemoryStore::new();
        store
            .insert_category(NewCategory::new("Electronics", "electronics"))
            .await
            .unwrap();

        // Different name, same slug
        let new = NewCategory::new("Gadgets", "electronics");
        let err = ensure_category_available(&store, &new).await.unwrap_err();
        assert_eq!(err.to_string(), "Category slug already exists");
    }
}
