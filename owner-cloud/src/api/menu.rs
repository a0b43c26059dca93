//! Menu item API
//!
//! Items belong to the owner's pool; `assign-restaurants` links an item to
//! any subset of the owner's own restaurants. The per-restaurant menu is
//! public and lists active linked items only.

use std::collections::HashSet;

use axum::Extension;
use axum::extract::{Path, State};
use http::StatusCode;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{AssignRestaurants, MenuItem, MenuItemCreate, MenuItemUpdate};

use super::extract::ApiJson;
use crate::auth::OwnerIdentity;
use crate::error::ServiceResult;
use crate::state::AppState;

async fn load_owned_item(
    state: &AppState,
    id: i64,
    identity: &OwnerIdentity,
) -> ServiceResult<MenuItem> {
    let item = state
        .catalog
        .find_item(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MenuItemNotFound))?;
    if item.owner_id != identity.user_id {
        return Err(AppError::new(ErrorCode::MenuItemNotOwned).into());
    }
    Ok(item)
}

/// POST /api/v1/menu
pub async fn create_item(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    ApiJson(payload): ApiJson<MenuItemCreate>,
) -> ServiceResult<(StatusCode, ApiResponse<MenuItem>)> {
    payload.validate()?;

    let item = state.catalog.create_item(identity.user_id, payload).await?;
    tracing::info!(owner_id = identity.user_id, item_id = item.id, name = %item.name, "Menu item created");

    Ok((StatusCode::CREATED, ApiResponse::success(item)))
}

/// GET /api/v1/menu
pub async fn list_mine(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
) -> ServiceResult<ApiResponse<Vec<MenuItem>>> {
    let items = state.catalog.list_items_by_owner(identity.user_id).await?;
    Ok(ApiResponse::success(items))
}

/// GET /api/v1/menu/restaurant/{restaurant_id} (public)
pub async fn restaurant_menu(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
) -> ServiceResult<ApiResponse<Vec<MenuItem>>> {
    if state.store.find_by_id(restaurant_id).await?.is_none() {
        return Err(AppError::new(ErrorCode::RestaurantNotFound).into());
    }
    let items = state.catalog.list_items_for_restaurant(restaurant_id).await?;
    Ok(ApiResponse::success(items))
}

/// PUT /api/v1/menu/{id}
pub async fn update_item(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<MenuItemUpdate>,
) -> ServiceResult<ApiResponse<MenuItem>> {
    payload.validate()?;
    load_owned_item(&state, id, &identity).await?;

    let item = state
        .catalog
        .update_item(id, payload)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MenuItemNotFound))?;
    Ok(ApiResponse::success(item))
}

/// PUT /api/v1/menu/{id}/assign-restaurants
///
/// Every id must name one of the caller's restaurants; otherwise nothing
/// changes.
pub async fn assign_restaurants(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<AssignRestaurants>,
) -> ServiceResult<ApiResponse<MenuItem>> {
    load_owned_item(&state, id, &identity).await?;

    let requested = payload.distinct_ids();
    let owned: HashSet<i64> = state
        .store
        .list_by_owner(identity.user_id)
        .await?
        .into_iter()
        .map(|r| r.id)
        .collect();
    let rejected: Vec<i64> = requested
        .iter()
        .copied()
        .filter(|rid| !owned.contains(rid))
        .collect();
    if !rejected.is_empty() {
        return Err(AppError::new(ErrorCode::InvalidRestaurantAssignment)
            .with_detail("restaurantIds", rejected)
            .into());
    }

    let item = state
        .catalog
        .assign_item(id, &requested)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MenuItemNotFound))?;
    tracing::info!(item_id = id, restaurants = requested.len(), "Menu item assigned");

    Ok(ApiResponse::success(item))
}

/// DELETE /api/v1/menu/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    Path(id): Path<i64>,
) -> ServiceResult<ApiResponse<()>> {
    load_owned_item(&state, id, &identity).await?;

    if !state.catalog.delete_item(id).await? {
        return Err(AppError::new(ErrorCode::MenuItemNotFound).into());
    }
    tracing::info!(item_id = id, owner_id = identity.user_id, "Menu item deleted");

    Ok(ApiResponse::done("Menu item deleted"))
}
