//! Persistence-boundary smoke tests against the provisioned database.

use crate::harness::shared_db;
use inventory::inventory::store::rules::ensure_category_available;
use inventory::inventory::store::{InventoryStore, NewCategory, PgStore, StoreError};

#[tokio::test]
async fn test_pg_store_category_round_trip() {
    let Some(db) = shared_db().await else { return };
    let store = PgStore::new(db.pool().clone());

    let inserted = store
        .insert_category(NewCategory::new("Harness Smoke", "harness-smoke").with_level(950))
        .await
        .expect("insert");
    assert!(inserted.id > 0);
    assert_eq!(inserted.level, 950);
    assert!(!inserted.is_active);

    let fetched = store
        .get_category(inserted.id)
        .await
        .expect("query")
        .expect("row must exist");
    assert_eq!(fetched, inserted);

    // The availability rules see the freshly-inserted row
    let conflicting = NewCategory::new("Harness Smoke", "harness-smoke-2").with_level(950);
    let err = ensure_category_available(&store, &conflicting)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict { .. }));

    store.delete_category(inserted.id).await.expect("cleanup");
    assert!(store
        .get_category(inserted.id)
        .await
        .expect("query")
        .is_none());
}

#[tokio::test]
async fn test_pg_store_update_missing_row_is_not_found() {
    let Some(db) = shared_db().await else { return };
    let store = PgStore::new(db.pool().clone());

    let phantom = inventory::inventory::store::Category {
        id: 999_999,
        name: "Phantom".to_string(),
        slug: "phantom".to_string(),
        is_active: false,
        level: 100,
        parent_id: None,
    };
    let err = store.update_category(&phantom).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { id: 999_999, .. }));
}
