use anyhow::Result;
use uuid::Uuid;

use super::setup_test_db;
use crate::errors::ModelError;
use crate::listing::{self, ImageChange, ListingChanges};

#[tokio::test]
async fn create_without_image_has_no_image() -> Result<()> {
    let db = setup_test_db().await?;

    let created = listing::create(&db, "Loft", "Bright loft near the river", None).await?;
    assert_eq!(created.name, "Loft");
    assert!(created.image.is_none());
    assert_eq!(created.created_at, created.updated_at);

    let json = serde_json::to_value(&created)?;
    assert!(json.get("image").is_none());
    assert_eq!(json["_id"], created.id.to_string());
    assert!(json.get("createdAt").is_some());
    assert!(json.get("updatedAt").is_some());
    Ok(())
}

#[tokio::test]
async fn empty_image_url_is_not_stored() -> Result<()> {
    let db = setup_test_db().await?;
    let created = listing::create(&db, "Cabin", "Quiet", Some(String::new())).await?;
    assert!(created.image.is_none());
    Ok(())
}

#[tokio::test]
async fn blank_required_fields_are_rejected() -> Result<()> {
    let db = setup_test_db().await?;

    let err = listing::create(&db, "   ", "about", None).await.unwrap_err();
    assert!(matches!(err, ModelError::Validation(ref m) if m == "name is required"));
    let err = listing::create(&db, "name", "", None).await.unwrap_err();
    assert!(matches!(err, ModelError::Validation(ref m) if m == "about is required"));

    assert!(listing::find_all(&db).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn find_all_lists_every_listing_once() -> Result<()> {
    let db = setup_test_db().await?;
    let a = listing::create(&db, "A", "first", None).await?;
    let b = listing::create(&db, "B", "second", None).await?;

    let all = listing::find_all(&db).await?;
    let ids: Vec<Uuid> = all.iter().map(|m| m.id).collect();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids.iter().filter(|id| **id == a.id).count(), 1);
    assert_eq!(ids.iter().filter(|id| **id == b.id).count(), 1);
    assert_ne!(a.id, b.id);
    Ok(())
}

#[tokio::test]
async fn update_applies_only_supplied_fields() -> Result<()> {
    let db = setup_test_db().await?;
    let created = listing::create(&db, "Old", "Keep me", Some("https://cdn.example.com/a.png".into())).await?;

    let changes = ListingChanges { name: Some("New".into()), ..Default::default() };
    let updated = listing::update(&db, created.id, changes).await?.expect("listing exists");
    assert_eq!(updated.name, "New");
    assert_eq!(updated.about, "Keep me");
    assert_eq!(updated.image.as_deref(), Some("https://cdn.example.com/a.png"));
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(updated.created_at, created.created_at);
    Ok(())
}

#[tokio::test]
async fn update_clears_and_replaces_image() -> Result<()> {
    let db = setup_test_db().await?;
    let created = listing::create(&db, "Pic", "Has image", Some("https://cdn.example.com/1.png".into())).await?;

    let cleared = listing::update(&db, created.id, ListingChanges { image: ImageChange::Clear, ..Default::default() })
        .await?
        .expect("listing exists");
    assert!(cleared.image.is_none());

    let replaced = listing::update(
        &db,
        created.id,
        ListingChanges { image: ImageChange::Replace("https://cdn.example.com/2.png".into()), ..Default::default() },
    )
    .await?
    .expect("listing exists");
    assert_eq!(replaced.image.as_deref(), Some("https://cdn.example.com/2.png"));
    Ok(())
}

#[tokio::test]
async fn update_unknown_id_returns_none() -> Result<()> {
    let db = setup_test_db().await?;
    let existing = listing::create(&db, "Stay", "Unchanged", None).await?;

    let res = listing::update(&db, Uuid::new_v4(), ListingChanges { name: Some("x".into()), ..Default::default() }).await?;
    assert!(res.is_none());

    let still = listing::find(&db, existing.id).await?.expect("listing exists");
    assert_eq!(still, existing);
    Ok(())
}

#[tokio::test]
async fn delete_is_idempotent() -> Result<()> {
    let db = setup_test_db().await?;
    let created = listing::create(&db, "Gone", "Soon", None).await?;

    assert_eq!(listing::delete(&db, created.id).await?, 1);
    assert_eq!(listing::delete(&db, created.id).await?, 0);
    assert!(listing::find(&db, created.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn update_of_row_deleted_after_read_returns_none() -> Result<()> {
    let db = setup_test_db().await?;
    let created = listing::create(&db, "Racy", "Deleted mid-update", None).await?;
    let read = listing::find(&db, created.id).await?.expect("listing exists");

    listing::delete(&db, created.id).await?;

    let res = listing::apply_changes(&db, read, ListingChanges { name: Some("x".into()), ..Default::default() }).await?;
    assert!(res.is_none());
    assert!(listing::find_all(&db).await?.is_empty());
    Ok(())
}
