//! Handlers for order endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/orders` | Body: `{"customer_id":"...","pincode":"..."}`; returns 201 |
//! | `GET`  | `/orders/:id` | 404 if not found |
//! | `GET`  | `/store/orders` | `?store_id` required; empty list if the store has none |
//! | `POST` | `/store/orders/:id/approve` | |
//! | `POST` | `/store/orders/:id/reject` | |
//! | `POST` | `/store/orders/:id/status` | Body: `{"status":"..."}` |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use medsetu_core::{
  order::{Order, OrderStatus},
  repo::Repository,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub customer_id: Uuid,
  pub pincode:     String,
}

/// `POST /orders`: returns 201 + the order, already assigned to a store.
pub async fn create<R: Repository>(
  State(state): State<ApiState<R>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let order = state
    .orders
    .create_order(body.customer_id, &body.pincode)
    .await?;
  Ok((StatusCode::CREATED, Json(order)))
}

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /orders/:id`
pub async fn get_one<R: Repository>(
  State(state): State<ApiState<R>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Order>, ApiError> {
  Ok(Json(state.orders.get_order(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct StoreOrdersParams {
  pub store_id: Uuid,
}

/// `GET /store/orders?store_id=<id>`
pub async fn for_store<R: Repository>(
  State(state): State<ApiState<R>>,
  Query(params): Query<StoreOrdersParams>,
) -> Result<Json<Vec<Order>>, ApiError> {
  Ok(Json(state.orders.orders_for_store(params.store_id).await?))
}

// ─── Transitions ──────────────────────────────────────────────────────────────

/// `POST /store/orders/:id/approve`
pub async fn approve<R: Repository>(
  State(state): State<ApiState<R>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Order>, ApiError> {
  Ok(Json(state.orders.approve(id).await?))
}

/// `POST /store/orders/:id/reject`
pub async fn reject<R: Repository>(
  State(state): State<ApiState<R>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Order>, ApiError> {
  Ok(Json(state.orders.reject(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: OrderStatus,
}

/// `POST /store/orders/:id/status` with body `{"status":"SHIPPED"}`
pub async fn set_status<R: Repository>(
  State(state): State<ApiState<R>>,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Json<Order>, ApiError> {
  Ok(Json(state.orders.set_status(id, body.status).await?))
}
