//! Handlers for `/admin/stores` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/admin/stores` | Body: [`StoreRegistration`]; returns 201, store is `PENDING` |
//! | `GET`    | `/admin/stores` | Optional `?status=PENDING\|APPROVED\|REJECTED\|SUSPENDED` |
//! | `GET`    | `/admin/stores/pending` | |
//! | `GET`    | `/admin/stores/:id` | 404 if not found |
//! | `POST`   | `/admin/stores/:id/approve` | also `reject`, `suspend` |
//! | `DELETE` | `/admin/stores/:id` | 204; 409 if the store has orders |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use medsetu_core::{
  admin::{self, StoreRegistration},
  repo::Repository,
  store::{Store, StoreStatus},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── Register ─────────────────────────────────────────────────────────────────

/// `POST /admin/stores`
pub async fn register<R: Repository>(
  State(state): State<ApiState<R>>,
  Json(body): Json<StoreRegistration>,
) -> Result<impl IntoResponse, ApiError> {
  if body.pincode.is_empty() {
    return Err(ApiError::BadRequest("pincode must not be empty".into()));
  }
  let store = admin::register_store(state.repo.as_ref(), body).await?;
  Ok((StatusCode::CREATED, Json(store)))
}

// ─── Reads ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<StoreStatus>,
}

/// `GET /admin/stores[?status=<status>]`
pub async fn list<R: Repository>(
  State(state): State<ApiState<R>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Store>>, ApiError> {
  Ok(Json(admin::list_stores(state.repo.as_ref(), params.status).await?))
}

/// `GET /admin/stores/pending`
pub async fn pending<R: Repository>(
  State(state): State<ApiState<R>>,
) -> Result<Json<Vec<Store>>, ApiError> {
  Ok(Json(admin::pending_stores(state.repo.as_ref()).await?))
}

/// `GET /admin/stores/:id`
pub async fn get_one<R: Repository>(
  State(state): State<ApiState<R>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Store>, ApiError> {
  Ok(Json(admin::get_store(state.repo.as_ref(), id).await?))
}

// ─── Status actions ───────────────────────────────────────────────────────────

pub async fn approve<R: Repository>(
  State(state): State<ApiState<R>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Store>, ApiError> {
  Ok(Json(admin::approve_store(state.repo.as_ref(), id).await?))
}

pub async fn reject<R: Repository>(
  State(state): State<ApiState<R>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Store>, ApiError> {
  Ok(Json(admin::reject_store(state.repo.as_ref(), id).await?))
}

pub async fn suspend<R: Repository>(
  State(state): State<ApiState<R>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Store>, ApiError> {
  Ok(Json(admin::suspend_store(state.repo.as_ref(), id).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /admin/stores/:id`
pub async fn delete<R: Repository>(
  State(state): State<ApiState<R>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  admin::delete_store(state.repo.as_ref(), id).await?;
  Ok(StatusCode::NO_CONTENT)
}
