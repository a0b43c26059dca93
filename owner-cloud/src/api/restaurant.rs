//! Restaurant profile API
//!
//! Profile edits that flip `is_open` engage the manual override, which
//! takes the restaurant out of automatic scheduling until the owner calls
//! `reset-override`.

use axum::extract::{Path, State};
use axum::Extension;
use http::StatusCode;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{LiveEvent, Restaurant, RestaurantCreate, RestaurantStatus, RestaurantUpdate};
use shared::util::now_millis;

use super::extract::ApiJson;
use crate::auth::OwnerIdentity;
use crate::error::ServiceResult;
use crate::state::AppState;

/// Load a restaurant and check it belongs to the caller
async fn load_owned(
    state: &AppState,
    id: i64,
    identity: &OwnerIdentity,
) -> ServiceResult<Restaurant> {
    let restaurant = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;
    if restaurant.owner_id != identity.user_id {
        return Err(AppError::new(ErrorCode::RestaurantNotOwned).into());
    }
    Ok(restaurant)
}

/// POST /api/v1/restaurants
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    ApiJson(payload): ApiJson<RestaurantCreate>,
) -> ServiceResult<(StatusCode, ApiResponse<Restaurant>)> {
    payload.validate()?;

    let restaurant = state.store.create(identity.user_id, payload).await?;
    tracing::info!(
        owner_id = identity.user_id,
        restaurant_id = restaurant.id,
        name = %restaurant.name,
        "Restaurant created"
    );

    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message("Restaurant created", restaurant),
    ))
}

/// GET /api/v1/restaurants/my-restaurants
pub async fn list_mine(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
) -> ServiceResult<ApiResponse<Vec<Restaurant>>> {
    let restaurants = state.store.list_by_owner(identity.user_id).await?;
    Ok(ApiResponse::success(restaurants))
}

/// GET /api/v1/restaurants/{id} (public)
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ServiceResult<ApiResponse<Restaurant>> {
    let restaurant = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;
    Ok(ApiResponse::success(restaurant))
}

/// PUT /api/v1/restaurants/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<RestaurantUpdate>,
) -> ServiceResult<ApiResponse<Restaurant>> {
    payload.validate()?;
    load_owned(&state, id, &identity).await?;

    let updated = state
        .store
        .update(id, payload)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;
    let restaurant = updated.restaurant;

    if updated.availability_changed {
        tracing::info!(
            restaurant_id = id,
            name = %restaurant.name,
            is_open = restaurant.is_open,
            "Owner set availability, manual override engaged"
        );
        state.live.publish(
            restaurant.owner_id,
            LiveEvent::AvailabilityChanged {
                restaurant_id: id,
                name: restaurant.name.clone(),
                is_open: restaurant.is_open,
                rule: None,
                at: now_millis(),
            },
        );
    }
    state.live.publish(
        restaurant.owner_id,
        LiveEvent::RestaurantUpdated {
            restaurant: Box::new(restaurant.clone()),
        },
    );

    Ok(ApiResponse::success_with_message("Restaurant updated", restaurant))
}

/// PUT /api/v1/restaurants/{id}/submit-verification
pub async fn submit_verification(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    Path(id): Path<i64>,
) -> ServiceResult<ApiResponse<Restaurant>> {
    let current = load_owned(&state, id, &identity).await?;

    if !current.status.can_submit_verification() {
        return Err(AppError::with_message(
            ErrorCode::InvalidStatusTransition,
            format!("Cannot submit verification while {}", current.status),
        )
        .with_detail("status", current.status.as_str())
        .into());
    }
    if !current.legal_docs.has_fssai_license() {
        return Err(AppError::new(ErrorCode::LegalDocsIncomplete)
            .with_detail("field", "legalDocs.fssaiLicenseNumber")
            .into());
    }

    let restaurant = state.store.set_status(id, RestaurantStatus::Pending).await?;
    tracing::info!(
        restaurant_id = id,
        previous = %current.status,
        "Restaurant submitted for verification"
    );
    state.live.publish(
        restaurant.owner_id,
        LiveEvent::RestaurantUpdated {
            restaurant: Box::new(restaurant.clone()),
        },
    );

    Ok(ApiResponse::success_with_message(
        "Restaurant submitted for verification",
        restaurant,
    ))
}

/// PUT /api/v1/restaurants/{id}/reset-override
pub async fn reset_override(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    Path(id): Path<i64>,
) -> ServiceResult<ApiResponse<Restaurant>> {
    load_owned(&state, id, &identity).await?;

    let restaurant = state
        .store
        .reset_override(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;
    tracing::info!(restaurant_id = id, "Manual override cleared, schedule resumes control");
    state
        .live
        .publish(restaurant.owner_id, LiveEvent::OverrideReset { restaurant_id: id });

    Ok(ApiResponse::success_with_message(
        "Schedule control restored",
        restaurant,
    ))
}

/// DELETE /api/v1/restaurants/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    Path(id): Path<i64>,
) -> ServiceResult<ApiResponse<()>> {
    load_owned(&state, id, &identity).await?;

    if !state.store.delete(id).await? {
        return Err(AppError::new(ErrorCode::RestaurantNotFound).into());
    }
    tracing::info!(restaurant_id = id, owner_id = identity.user_id, "Restaurant deleted");

    Ok(ApiResponse::done("Restaurant deleted"))
}
