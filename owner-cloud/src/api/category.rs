//! Menu category API

use axum::Extension;
use axum::extract::{Path, State};
use http::StatusCode;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Category, CategoryCreate, CategoryUpdate};

use super::extract::ApiJson;
use crate::auth::OwnerIdentity;
use crate::error::ServiceResult;
use crate::state::AppState;

async fn load_owned(
    state: &AppState,
    id: i64,
    identity: &OwnerIdentity,
) -> ServiceResult<Category> {
    let category = state
        .catalog
        .find_category(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;
    if category.owner_id != identity.user_id {
        return Err(AppError::new(ErrorCode::CategoryNotOwned).into());
    }
    Ok(category)
}

/// The parent must be one of the caller's categories and must not sit
/// below `category_id` (no cycles)
async fn check_parent(
    state: &AppState,
    identity: &OwnerIdentity,
    category_id: Option<i64>,
    parent_id: i64,
) -> ServiceResult<()> {
    let mut cursor = Some(parent_id);
    while let Some(id) = cursor {
        if Some(id) == category_id {
            return Err(AppError::with_message(
                ErrorCode::InvalidRequest,
                "A category cannot be nested under itself",
            )
            .with_detail("field", "parentId")
            .into());
        }
        cursor = load_owned(state, id, identity).await?.parent_id;
    }
    Ok(())
}

/// POST /api/v1/menu/categories
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    ApiJson(payload): ApiJson<CategoryCreate>,
) -> ServiceResult<(StatusCode, ApiResponse<Category>)> {
    payload.validate()?;
    if let Some(parent_id) = payload.parent_id {
        check_parent(&state, &identity, None, parent_id).await?;
    }

    let category = state.catalog.create_category(identity.user_id, payload).await?;
    tracing::info!(owner_id = identity.user_id, category_id = category.id, "Category created");

    Ok((StatusCode::CREATED, ApiResponse::success(category)))
}

/// GET /api/v1/menu/categories
pub async fn list_mine(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
) -> ServiceResult<ApiResponse<Vec<Category>>> {
    let categories = state.catalog.list_categories_by_owner(identity.user_id).await?;
    Ok(ApiResponse::success(categories))
}

/// PUT /api/v1/menu/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<CategoryUpdate>,
) -> ServiceResult<ApiResponse<Category>> {
    payload.validate()?;
    load_owned(&state, id, &identity).await?;
    if let Some(Some(parent_id)) = payload.parent_id {
        check_parent(&state, &identity, Some(id), parent_id).await?;
    }

    let category = state
        .catalog
        .update_category(id, payload)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;
    Ok(ApiResponse::success(category))
}

/// DELETE /api/v1/menu/categories/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    Path(id): Path<i64>,
) -> ServiceResult<ApiResponse<()>> {
    load_owned(&state, id, &identity).await?;

    if !state.catalog.delete_category(id).await? {
        return Err(AppError::new(ErrorCode::CategoryNotFound).into());
    }
    tracing::info!(category_id = id, owner_id = identity.user_id, "Category deleted");

    Ok(ApiResponse::done("Category deleted"))
}
