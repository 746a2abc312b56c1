use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

/// A dashboard listing. Serialises as `{ _id, name, about, image?, createdAt, updatedAt }`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "listing")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub about: String,
    #[sea_orm(column_type = "Text", nullable)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// What an update does to the stored image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ImageChange {
    #[default]
    Keep,
    Clear,
    Replace(String),
}

/// Partial update. `None` leaves the column untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListingChanges {
    pub name: Option<String>,
    pub about: Option<String>,
    pub image: ImageChange,
}

pub fn validate_required(field: &str, value: &str) -> Result<(), errors::ModelError> {
    if value.trim().is_empty() {
        return Err(errors::ModelError::Validation(format!("{field} is required")));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    name: &str,
    about: &str,
    image: Option<String>,
) -> Result<Model, errors::ModelError> {
    validate_required("name", name)?;
    validate_required("about", about)?;

    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        about: Set(about.to_string()),
        image: Set(image.filter(|url| !url.is_empty())),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// All listings in insertion order.
pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id).one(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Apply `changes` to the listing with `id`; `Ok(None)` when no such listing exists.
pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    changes: ListingChanges,
) -> Result<Option<Model>, errors::ModelError> {
    let Some(existing) = find(db, id).await? else { return Ok(None) };
    apply_changes(db, existing, changes).await
}

/// Write `changes` over `existing`. `Ok(None)` when the row was deleted after it was read.
pub async fn apply_changes<C: ConnectionTrait>(
    db: &C,
    existing: Model,
    changes: ListingChanges,
) -> Result<Option<Model>, errors::ModelError> {
    let mut am: ActiveModel = existing.into();
    if let Some(name) = changes.name {
        validate_required("name", &name)?;
        am.name = Set(name);
    }
    if let Some(about) = changes.about {
        validate_required("about", &about)?;
        am.about = Set(about);
    }
    match changes.image {
        ImageChange::Keep => {}
        ImageChange::Clear => am.image = Set(None),
        ImageChange::Replace(url) => am.image = Set(Some(url)),
    }
    am.updated_at = Set(Utc::now().into());
    match am.update(db).await {
        Ok(updated) => Ok(Some(updated)),
        Err(DbErr::RecordNotUpdated) => Ok(None),
        Err(e) => Err(errors::ModelError::Db(e.to_string())),
    }
}

/// Delete by id without checking existence first. Returns affected rows.
pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, errors::ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}
