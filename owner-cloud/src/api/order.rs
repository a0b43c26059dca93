//! Owner order and review API
//!
//! Both lists cover every restaurant the caller owns. Status updates are
//! refused once an order is delivered or cancelled.

use axum::Extension;
use axum::extract::{Path, State};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Order, OrderStatusUpdate, Review};

use super::extract::ApiJson;
use crate::auth::OwnerIdentity;
use crate::error::ServiceResult;
use crate::state::AppState;

async fn owned_restaurant_ids(state: &AppState, owner_id: i64) -> ServiceResult<Vec<i64>> {
    let restaurants = state.store.list_by_owner(owner_id).await?;
    Ok(restaurants.into_iter().map(|r| r.id).collect())
}

/// GET /api/v1/orders/my-orders
pub async fn list_mine(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
) -> ServiceResult<ApiResponse<Vec<Order>>> {
    let ids = owned_restaurant_ids(&state, identity.user_id).await?;
    if ids.is_empty() {
        return Ok(ApiResponse::success(Vec::new()));
    }
    let orders = state.orders.list_orders_for_restaurants(&ids).await?;
    Ok(ApiResponse::success(orders))
}

/// PUT /api/v1/orders/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<OrderStatusUpdate>,
) -> ServiceResult<ApiResponse<Order>> {
    let order = state
        .orders
        .find_order(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let owns_restaurant = state
        .store
        .find_by_id(order.restaurant_id)
        .await?
        .is_some_and(|r| r.owner_id == identity.user_id);
    if !owns_restaurant {
        return Err(AppError::new(ErrorCode::OrderNotOwned).into());
    }

    let final_status = || {
        AppError::new(ErrorCode::OrderStatusFinal).with_detail("status", order.status.as_str())
    };
    if order.status.is_final() {
        return Err(final_status().into());
    }
    // None: finalised between the read and the guarded write
    let updated = state
        .orders
        .set_order_status(id, payload.status)
        .await?
        .ok_or_else(final_status)?;

    tracing::info!(
        order_id = id,
        restaurant_id = updated.restaurant_id,
        previous = %order.status,
        current = %updated.status,
        "Order status updated"
    );
    Ok(ApiResponse::success(updated))
}

/// GET /api/v1/reviews/my-reviews
pub async fn list_my_reviews(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
) -> ServiceResult<ApiResponse<Vec<Review>>> {
    let ids = owned_restaurant_ids(&state, identity.user_id).await?;
    if ids.is_empty() {
        return Ok(ApiResponse::success(Vec::new()));
    }
    let reviews = state.orders.list_reviews_for_restaurants(&ids).await?;
    Ok(ApiResponse::success(reviews))
}
