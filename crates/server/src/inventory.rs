//! # Inventory Handlers
//!
//! Plain CRUD over community-owned goods. DTOs are small enough to live
//! here rather than in `dto/`.

use ::auth::permissions::InventoryAction;
use ::auth::Permission;
use axum::Json;
use chrono::Utc;
use entity::inventory_items::{self, Entity as InventoryEntity};
use error::PaginationMeta;
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    Set,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::permissions::check_permission;
use crate::utils::escape_like_wildcards;
use crate::{AppError, AppState, Result};

/// Response type for an inventory item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryItemResponse {
    pub id:         String,
    pub name:       String,
    pub quantity:   i32,
    pub condition:  String,
    pub location:   Option<String>,
    pub note:       Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<inventory_items::Model> for InventoryItemResponse {
    fn from(model: inventory_items::Model) -> Self {
        Self {
            id:         model.id,
            name:       model.name,
            quantity:   model.quantity,
            condition:  model.condition,
            location:   model.location,
            note:       model.note,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Request to create an inventory item
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateInventoryItemRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: i32,

    /// Free-text condition, e.g. "baik", "rusak ringan"
    #[validate(length(min = 1, max = 128, message = "Condition must be between 1 and 128 characters"))]
    pub condition: String,

    #[validate(length(max = 255, message = "Location must not exceed 255 characters"))]
    pub location: Option<String>,

    #[validate(length(max = 512, message = "Note must not exceed 512 characters"))]
    pub note: Option<String>,
}

/// Request to update an inventory item
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateInventoryItemRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: Option<String>,

    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: Option<i32>,

    #[validate(length(min = 1, max = 128, message = "Condition must be between 1 and 128 characters"))]
    pub condition: Option<String>,

    #[validate(length(max = 255, message = "Location must not exceed 255 characters"))]
    pub location: Option<String>,

    #[validate(length(max = 512, message = "Note must not exceed 512 characters"))]
    pub note: Option<String>,
}

/// Query parameters for the inventory list
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryListQuery {
    pub page:     Option<u64>,
    pub per_page: Option<u64>,
    /// Search term matched against the name
    pub search:   Option<String>,
}

impl InventoryListQuery {
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(20).clamp(1, 100) }
}

/// Response for an inventory list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryListResponse {
    pub items:      Vec<InventoryItemResponse>,
    pub pagination: PaginationMeta,
}

/// Inner handler: create an inventory item.
pub async fn create_item_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    req: CreateInventoryItemRequest,
) -> Result<Json<InventoryItemResponse>> {
    req.validate().map_err(AppError::from)?;
    check_permission(user, Permission::Inventory(InventoryAction::Create))?;

    let now = Utc::now();
    let item = inventory_items::ActiveModel {
        id:         Set(entity::new_id("inv")),
        name:       Set(req.name),
        quantity:   Set(req.quantity),
        condition:  Set(req.condition),
        location:   Set(req.location),
        note:       Set(req.note),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    logging::info!(target: "inventory", item_id = %item.id, created_by = %user.id, "Inventory item created");

    Ok(Json(item.into()))
}

/// Inner handler: paginated inventory list.
pub async fn list_items_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    query: InventoryListQuery,
) -> Result<Json<InventoryListResponse>> {
    check_permission(user, Permission::Inventory(InventoryAction::Read))?;

    let mut select = InventoryEntity::find();
    if let Some(ref term) = query.search {
        let pattern = format!("%{}%", escape_like_wildcards(term.trim()));
        select = select.filter(inventory_items::Column::Name.like(pattern));
    }

    let total = select.clone().count(&state.db).await?;
    let pagination = PaginationMeta::new(query.page(), query.per_page(), total);

    let items = select
        .order_by_asc(inventory_items::Column::Name)
        .offset(pagination.offset())
        .limit(pagination.limit())
        .all(&state.db)
        .await?;

    Ok(Json(InventoryListResponse {
        items: items.into_iter().map(InventoryItemResponse::from).collect(),
        pagination,
    }))
}

/// Inner handler: fetch one inventory item.
pub async fn get_item_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    item_id: &str,
) -> Result<Json<InventoryItemResponse>> {
    check_permission(user, Permission::Inventory(InventoryAction::Read))?;
    let item = find_item(state, item_id).await?;
    Ok(Json(item.into()))
}

/// Inner handler: update an inventory item.
pub async fn update_item_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    item_id: &str,
    req: UpdateInventoryItemRequest,
) -> Result<Json<InventoryItemResponse>> {
    req.validate().map_err(AppError::from)?;
    check_permission(user, Permission::Inventory(InventoryAction::Update))?;

    let item = find_item(state, item_id).await?;
    let mut active: inventory_items::ActiveModel = item.into();
    if let Some(name) = req.name {
        active.name = Set(name);
    }
    if let Some(quantity) = req.quantity {
        active.quantity = Set(quantity);
    }
    if let Some(condition) = req.condition {
        active.condition = Set(condition);
    }
    if req.location.is_some() {
        active.location = Set(req.location);
    }
    if req.note.is_some() {
        active.note = Set(req.note);
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    Ok(Json(updated.into()))
}

/// Inner handler: delete an inventory item.
pub async fn delete_item_inner(state: &AppState, user: &AuthenticatedUser, item_id: &str) -> Result<()> {
    check_permission(user, Permission::Inventory(InventoryAction::Delete))?;

    find_item(state, item_id).await?;
    InventoryEntity::delete_by_id(item_id).exec(&state.db).await?;

    logging::info!(target: "inventory", item_id = %item_id, deleted_by = %user.id, "Inventory item deleted");

    Ok(())
}

async fn find_item(state: &AppState, item_id: &str) -> Result<inventory_items::Model> {
    InventoryEntity::find_by_id(item_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Inventory item not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let req = CreateInventoryItemRequest {
            name:      "Kursi lipat".to_string(),
            quantity:  40,
            condition: "baik".to_string(),
            location:  Some("Gudang pos ronda".to_string()),
            note:      None,
        };
        assert!(req.validate().is_ok());

        let req = CreateInventoryItemRequest {
            quantity: -1,
            ..req
        };
        assert!(req.validate().is_err());
    }
}
